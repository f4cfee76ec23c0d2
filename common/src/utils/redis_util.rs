use crate::error::AppError;
use deadpool_redis::{redis::cmd, Config, Connection, Pool, Runtime};

/// Redis 工具类 - 封装 deadpool-redis 连接池
#[derive(Clone)]
pub struct RedisUtil {
    pool: Pool,
}

impl RedisUtil {
    /// 从 URL 创建 Redis 连接池
    pub fn from_url(url: String) -> Result<Self, AppError> {
        log::info!("Initializing Redis connection pool");

        let cfg = Config::from_url(url);

        let pool = cfg
            .create_pool(Some(Runtime::Tokio1))
            .map_err(|e| AppError::RedisError(format!("Failed to create Redis pool: {}", e)))?;

        log::info!("✅ Redis connection pool initialized successfully");

        Ok(RedisUtil { pool })
    }

    /// 获取连接池引用（用于注册到 Actix App Data）
    pub fn pool(&self) -> Pool {
        self.pool.clone()
    }

    async fn conn(&self) -> Result<Connection, AppError> {
        self.pool
            .get()
            .await
            .map_err(|e| AppError::RedisError(format!("Redis connection error: {}", e)))
    }

    /// SETEX - 设置带过期时间的键值 (秒)
    pub async fn set_ex(&self, key: &str, value: &str, seconds: i64) -> Result<(), AppError> {
        let mut conn = self.conn().await?;

        cmd("SETEX")
            .arg(&[key, &seconds.to_string(), value])
            .query_async::<()>(&mut conn)
            .await
            .map_err(|e| AppError::RedisError(format!("Redis SETEX error: {}", e)))?;

        Ok(())
    }

    // ==================== Redis Stream Operations ====================

    /// XADD - 添加消息到 Stream, 返回消息ID
    pub async fn xadd(
        &self,
        stream: &str,
        id: &str, // "*" 表示自动生成ID
        fields: &[(&str, &str)],
    ) -> Result<String, AppError> {
        let mut conn = self.conn().await?;

        let mut command = cmd("XADD");
        command.arg(stream).arg(id);

        for (key, value) in fields {
            command.arg(key).arg(value);
        }

        let message_id: String = command
            .query_async(&mut conn)
            .await
            .map_err(|e| AppError::RedisError(format!("Redis XADD error: {}", e)))?;

        Ok(message_id)
    }

    /// XGROUP CREATE - 创建消费者组
    pub async fn xgroup_create(&self, stream: &str, group: &str, id: &str) -> Result<(), AppError> {
        let mut conn = self.conn().await?;

        let result: Result<String, _> = cmd("XGROUP")
            .arg("CREATE")
            .arg(stream)
            .arg(group)
            .arg(id)
            .arg("MKSTREAM") // 如果 stream 不存在则创建
            .query_async(&mut conn)
            .await;

        match result {
            Ok(_) => Ok(()),
            // 忽略 "BUSYGROUP Consumer Group name already exists" 错误
            Err(e) if e.to_string().contains("BUSYGROUP") => Ok(()),
            Err(e) => Err(AppError::RedisError(format!("Redis XGROUP CREATE error: {}", e))),
        }
    }

    /// XREADGROUP - 消费者组读取消息
    pub async fn xreadgroup(
        &self,
        group: &str,
        consumer: &str,
        stream: &str,
        count: usize,
        block_millis: usize,
    ) -> Result<Vec<(String, Vec<(String, String)>)>, AppError> {
        let mut conn = self.conn().await?;

        let result: Vec<(String, Vec<(String, Vec<(String, String)>)>)> = cmd("XREADGROUP")
            .arg("GROUP")
            .arg(group)
            .arg(consumer)
            .arg("COUNT")
            .arg(count)
            .arg("BLOCK")
            .arg(block_millis)
            .arg("STREAMS")
            .arg(stream)
            .arg(">")
            .query_async(&mut conn)
            .await
            .map_err(|e| AppError::RedisError(format!("Redis XREADGROUP error: {}", e)))?;

        let messages = if let Some((_, stream_messages)) = result.first() {
            stream_messages.clone()
        } else {
            vec![]
        };

        Ok(messages)
    }

    /// XACK - 确认消息已处理
    pub async fn xack(&self, stream: &str, group: &str, id: &str) -> Result<(), AppError> {
        let mut conn = self.conn().await?;

        cmd("XACK")
            .arg(stream)
            .arg(group)
            .arg(id)
            .query_async::<i64>(&mut conn)
            .await
            .map_err(|e| AppError::RedisError(format!("Redis XACK error: {}", e)))?;

        Ok(())
    }

    /// XDEL - 删除消息
    pub async fn xdel(&self, stream: &str, id: &str) -> Result<(), AppError> {
        let mut conn = self.conn().await?;

        cmd("XDEL")
            .arg(stream)
            .arg(id)
            .query_async::<i64>(&mut conn)
            .await
            .map_err(|e| AppError::RedisError(format!("Redis XDEL error: {}", e)))?;

        Ok(())
    }
}
