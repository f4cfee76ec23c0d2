pub mod app_responsible_limit;
pub mod app_notification;

pub use app_responsible_limit::*;
pub use app_notification::*;
