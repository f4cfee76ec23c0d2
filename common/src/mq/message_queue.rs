use crate::error::AppError;
use crate::utils::redis_util::RedisUtil;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use tokio::sync::RwLock;

/// 消息结构
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message<T = serde_json::Value> {
    pub id: Option<String>,
    pub topic: String,
    pub payload: T,
    pub timestamp: i64,
}

impl<T> Message<T> {
    pub fn new(topic: impl Into<String>, payload: T) -> Self {
        Message {
            id: None,
            topic: topic.into(),
            payload,
            timestamp: chrono::Utc::now().timestamp(),
        }
    }
}

/// 消息处理器类型 - 接收消息并返回 Future
pub type MessageHandler = Arc<
    dyn Fn(Message<serde_json::Value>) -> Pin<Box<dyn Future<Output = Result<(), AppError>> + Send>>
        + Send
        + Sync,
>;

/// 订阅者信息
struct Subscriber {
    topic: String,
    handler: MessageHandler,
}

/// 消息队列 - 基于 Redis Stream（支持发布-订阅模式）
///
/// 通知分发等副作用走这里, 发布失败只记日志, 不影响核心事务
#[derive(Clone)]
pub struct MessageQueue {
    redis: Arc<RedisUtil>,
    subscribers: Arc<RwLock<Vec<Subscriber>>>,
    consumer_group: String,
}

impl MessageQueue {
    pub fn new(redis: Arc<RedisUtil>) -> Self {
        MessageQueue {
            redis,
            subscribers: Arc::new(RwLock::new(Vec::new())),
            consumer_group: "default-group".to_string(),
        }
    }

    fn stream_key(topic: &str) -> String {
        format!("mq:{}", topic)
    }

    /// 发布消息到指定主题
    pub async fn publish<T: Serialize>(&self, topic: &str, payload: &T) -> Result<String, AppError> {
        let body = serde_json::to_string(payload)
            .map_err(|e| AppError::internal(format!("Failed to serialize payload: {}", e)))?;
        let ts = chrono::Utc::now().timestamp().to_string();

        let id = self
            .redis
            .xadd(
                &Self::stream_key(topic),
                "*",
                &[("topic", topic), ("payload", &body), ("timestamp", &ts)],
            )
            .await?;

        log::debug!("📤 Published message {} to topic '{}'", id, topic);
        Ok(id)
    }

    /// 订阅特定主题的消息
    pub async fn subscribe<F>(&self, topic: impl Into<String>, handler: F)
    where
        F: Fn(Message<serde_json::Value>) -> Pin<Box<dyn Future<Output = Result<(), AppError>> + Send>>
            + Send
            + Sync
            + 'static,
    {
        let topic = topic.into();
        log::info!("📌 Subscribing to topic: '{}'", topic);

        let subscriber = Subscriber {
            topic: topic.clone(),
            handler: Arc::new(handler),
        };

        self.subscribers.write().await.push(subscriber);
    }

    /// 启动后台消费者（自动处理订阅的消息）
    ///
    /// 此方法会根据已订阅的主题自动创建对应的 stream 并启动消费者
    pub async fn start_consumer(&self) -> Result<(), AppError> {
        let redis = self.redis.clone();
        let subscribers = self.subscribers.clone();
        let group = self.consumer_group.clone();
        let consumer_name = format!("consumer-{}", uuid::Uuid::new_v4());

        let topics: Vec<String> = {
            let subs = subscribers.read().await;
            subs.iter().map(|s| s.topic.clone()).collect()
        };

        if topics.is_empty() {
            log::warn!("⚠️  No topics subscribed, consumer will not start");
            return Ok(());
        }

        log::info!("🚀 Starting background consumer for topics: {:?}", topics);

        // 为每个主题创建消费者组
        for topic in &topics {
            redis
                .xgroup_create(&Self::stream_key(topic), &group, "$")
                .await?;
        }

        tokio::spawn(async move {
            loop {
                for topic in &topics {
                    let stream = Self::stream_key(topic);
                    let entries = match redis
                        .xreadgroup(&group, &consumer_name, &stream, 16, 1000)
                        .await
                    {
                        Ok(entries) => entries,
                        Err(e) => {
                            log::error!("❌ MQ read failed on '{}': {}", stream, e);
                            tokio::time::sleep(std::time::Duration::from_secs(1)).await;
                            continue;
                        }
                    };

                    for (entry_id, fields) in entries {
                        let message = Self::parse_entry(topic, &entry_id, &fields);

                        let handlers: Vec<MessageHandler> = {
                            let subs = subscribers.read().await;
                            subs.iter()
                                .filter(|s| &s.topic == topic)
                                .map(|s| s.handler.clone())
                                .collect()
                        };

                        for handler in handlers {
                            if let Err(e) = handler(message.clone()).await {
                                log::error!("❌ MQ handler failed for '{}': {}", topic, e);
                            }
                        }

                        if let Err(e) = redis.xack(&stream, &group, &entry_id).await {
                            log::error!("❌ MQ ack failed for '{}': {}", entry_id, e);
                        }
                    }
                }
            }
        });

        Ok(())
    }

    fn parse_entry(
        topic: &str,
        entry_id: &str,
        fields: &[(String, String)],
    ) -> Message<serde_json::Value> {
        let payload = fields
            .iter()
            .find(|(k, _)| k == "payload")
            .and_then(|(_, v)| serde_json::from_str(v).ok())
            .unwrap_or(serde_json::Value::Null);
        let timestamp = fields
            .iter()
            .find(|(k, _)| k == "timestamp")
            .and_then(|(_, v)| v.parse().ok())
            .unwrap_or(0);

        Message {
            id: Some(entry_id.to_string()),
            topic: topic.to_string(),
            payload,
            timestamp,
        }
    }
}
