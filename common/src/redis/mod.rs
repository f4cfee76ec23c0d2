// Redis连接模块
use redis::aio::ConnectionManager;
use redis::{Client, RedisError};

// 重新导出配置
pub use crate::config::redis_conf::RedisConfig;

/// 创建 Redis 客户端
pub fn create_client(redis_url: &str) -> Result<Client, RedisError> {
    redis::Client::open(redis_url)
}

/// 创建异步连接管理器（推荐用于生产环境）
///
/// ConnectionManager 会自动重连，适合长期运行的应用
pub async fn create_async_connection(redis_url: &str) -> Result<ConnectionManager, RedisError> {
    let client = create_client(redis_url)?;
    ConnectionManager::new(client).await
}

/// 从配置创建异步连接
pub async fn create_async_connection_from_config(
    config: &RedisConfig,
) -> Result<ConnectionManager, RedisError> {
    create_async_connection(&config.url).await
}

/// 测试 Redis 连接
pub async fn test_connection(conn: &mut ConnectionManager) -> Result<bool, RedisError> {
    let pong: String = redis::cmd("PING").query_async(conn).await?;
    Ok(pong == "PONG")
}
