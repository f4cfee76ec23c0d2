pub mod notification;

use actix_web::web;
use common::mq::register_subscriber;

use crate::state::AppState;
use crate::subscribers::notification::NotificationCreatedSubscriber;

/// 注册所有订阅者
pub async fn init_subscribers(state: web::Data<AppState>) {
    log::info!("📋 注册消息队列订阅者...");

    register_subscriber(&state.mq, NotificationCreatedSubscriber).await;

    log::info!("✅ 消息队列订阅者注册完成");
}
