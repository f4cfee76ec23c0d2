use async_trait::async_trait;
use common::constants::topics;
use common::error::AppError;
use common::mq::message_queue::Message;
use common::mq::subscriber_trait::MessageSubscriber;

use crate::service::notification_service::NotificationPayload;

/// 通知分发订阅者
///
/// 通知行已在发布侧落库, 这里只做投递记录; 真实推送渠道属于外部系统
#[derive(Clone)]
pub struct NotificationCreatedSubscriber;

#[async_trait]
impl MessageSubscriber for NotificationCreatedSubscriber {
    fn topic(&self) -> &str {
        topics::NOTIFICATION_CREATED
    }

    async fn handle(&self, message: Message) -> Result<(), AppError> {
        let payload: NotificationPayload = serde_json::from_value(message.payload)
            .map_err(|e| AppError::internal(format!("通知载荷解析失败: {}", e)))?;

        log::info!(
            "🔔 [通知] user={} title={} ({:?})",
            payload.user_id,
            payload.title,
            payload.category
        );
        Ok(())
    }
}
