// 配置模块

pub mod db_conf;
pub mod redis_conf;
pub mod app_config;

pub use db_conf::{DbConfig, init_db, get_db, test_connection};
pub use redis_conf::RedisConfig;
pub use app_config::{AppConfig, ServerConfig, DatabaseConfig, LogConfig};
