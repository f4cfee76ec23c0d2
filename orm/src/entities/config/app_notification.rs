use rbatis::rbdc::datetime::DateTime;
use rbatis::{crud, impl_select};
use serde::{Deserialize, Serialize};

/// 站内通知表, 异步写入, 失败不影响业务事务
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppNotification {
    pub id: Option<i64>,
    pub user_id: i64,
    pub title: String,
    pub message: String,
    pub category: Option<String>,
    pub is_read: Option<bool>,
    pub created_at: Option<DateTime>,
}

crud!(AppNotification {}, "app_notification");
impl_select!(AppNotification{select_by_user(user_id: i64, limit: i64) -> Vec =>
    "`where user_id = #{user_id} order by created_at desc limit #{limit}`"});

impl AppNotification {
    pub const TABLE_NAME: &'static str = "app_notification";
}
