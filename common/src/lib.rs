// 公共模块
// 提供数据库、Redis、日志、错误处理、账本核心等通用功能

pub mod config;
pub mod database;
pub mod redis;
pub mod error;
pub mod logger;
pub mod enums;
pub mod response;
pub mod constants;
pub mod utils;
pub mod mq;
pub mod middleware;
pub mod services;

// 重新导出常用类型和函数
pub use error::{AppError, AppResult};
pub use config::{DbConfig, RedisConfig, AppConfig};
pub use logger::{init_logger, init_logger_with_level};
pub use enums::{TransactionCode, WalletKind};

// 数据库相关
pub use database::{init_db, get_db, test_connection as test_db_connection};

// Redis相关
pub use redis::{create_async_connection_from_config, test_connection as test_redis_connection};

/// 初始化公共模块
///
/// 这个函数可以用来初始化日志系统
pub fn init() {
    logger::init_logger();
    log::info!("✅ 公共模块初始化完成");
}
