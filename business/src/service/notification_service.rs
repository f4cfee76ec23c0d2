use std::sync::Arc;

use common::constants::topics;
use common::mq::message_queue::MessageQueue;
use orm::entities::AppNotification;
use rbatis::rbdc::datetime::DateTime;
use rbatis::RBatis;
use serde::{Deserialize, Serialize};

/// 通知载荷 (MQ 消息体)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationPayload {
    pub user_id: i64,
    pub title: String,
    pub message: String,
    pub category: Option<String>,
}

/// 站内通知服务
///
/// 写库 + 发 MQ 都是尽力而为: 任何失败只记日志,
/// 绝不把错误抛回调用方的业务事务
pub struct NotificationService {
    rb: Arc<RBatis>,
    mq: Arc<MessageQueue>,
}

impl NotificationService {
    pub fn new(rb: Arc<RBatis>, mq: Arc<MessageQueue>) -> Self {
        Self { rb, mq }
    }

    pub async fn notify(
        &self,
        user_id: i64,
        title: impl Into<String>,
        message: impl Into<String>,
        category: Option<String>,
    ) {
        let title = title.into();
        let message = message.into();

        let row = AppNotification {
            id: None,
            user_id,
            title: title.clone(),
            message: message.clone(),
            category: category.clone(),
            is_read: Some(false),
            created_at: Some(DateTime::now()),
        };

        if let Err(e) = AppNotification::insert(self.rb.as_ref(), &row).await {
            log::error!("❌ 通知写入失败 user={}: {}", user_id, e);
            return;
        }

        let payload = NotificationPayload {
            user_id,
            title,
            message,
            category,
        };
        if let Err(e) = self.mq.publish(topics::NOTIFICATION_CREATED, &payload).await {
            log::error!("❌ 通知消息发布失败 user={}: {}", user_id, e);
        }
    }
}
