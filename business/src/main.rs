use std::sync::Arc;

use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};
use common::constants::{SA_TOKEN_AUTH_HEADER_NAME, SA_TOKEN_KEY_PREFIX};
use common::middleware::error_handler;
use common::middleware::sa_token::auth_checker::DefaultAuthChecker;
use common::middleware::sa_token::sa_token_middleware::SaTokenMiddleware;
use common::mq::message_queue::MessageQueue;
use common::utils::redis_util::RedisUtil;
use common::AppConfig;
use rbatis::RBatis;
use sa_token_plugin_actix_web::{RedisStorage, SaTokenConfig, SaTokenState};

use crate::service::bet_service::BetService;
use crate::service::bonus_service::BonusService;
use crate::service::game_session_service::GameSessionService;
use crate::service::notification_service::NotificationService;
use crate::service::raffle_service::RaffleService;
use crate::service::registration_service::RegistrationService;
use crate::service::responsible_gaming_service::ResponsibleGamingService;
use crate::service::wallet_service::WalletService;
use crate::service::withdrawal_service::WithdrawalService;

mod handle;
mod service;
mod state;
mod subscribers;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // 嵌入配置文件（编译时加载）
    const DEFAULT_CONFIG: &str = include_str!("../config.toml");
    const PROD_CONFIG: &str = include_str!("../config.production.toml");

    let config = AppConfig::from_file_or_embedded("business/config", DEFAULT_CONFIG, Some(PROD_CONFIG))
        .or_else(|_| AppConfig::from_env())
        .expect("配置加载失败");

    // 初始化日志（使用配置的日志级别）
    std::env::set_var("RUST_LOG", &config.log.level);
    common::init_logger();

    log::info!("启动钱包结算服务...");
    log::info!("配置加载成功 - 数据库: {}", config.database.url);

    // 初始化数据库连接
    let db_config = common::DbConfig::new(
        config.database.url.clone(),
        config.database.max_connections as u64,
    );
    common::init_db(&db_config)
        .await
        .expect("数据库连接池初始化失败");

    // 测试数据库连接
    if let Err(e) = common::test_db_connection().await {
        log::error!("数据库连接测试失败: {}", e);
    }

    // 初始化 Redis 连接
    let redis_config = common::RedisConfig::from_url(config.redis.url.clone(), config.redis.pool_size);
    let mut redis_conn = common::create_async_connection_from_config(&redis_config)
        .await
        .expect("Redis初始化失败");

    // 测试 Redis 连接
    if let Err(e) = common::test_redis_connection(&mut redis_conn).await {
        log::error!("Redis连接测试失败: {}", e);
    }

    // 初始化 sa-token (使用 Redis 存储)
    let redis_storage = RedisStorage::new(&config.redis.url, SA_TOKEN_KEY_PREFIX)
        .await
        .map_err(|e| {
            log::error!("Redis 连接失败: {}", e);
            std::io::Error::new(std::io::ErrorKind::Other, e)
        })?;

    let sa_token_manager = SaTokenConfig::builder()
        .storage(Arc::new(redis_storage))
        .token_name(SA_TOKEN_AUTH_HEADER_NAME)
        .timeout(86400) // 24 小时
        .build();

    let sa_token_middleware = SaTokenMiddleware::builder()
        .state(SaTokenState {
            manager: Arc::new(sa_token_manager.clone()),
        })
        .auth_checker(Arc::new(
            DefaultAuthChecker::builder()
                .add_match("/api/**")
                .add_exclude("/api/common/**")
                .add_exclude("/api/admin/**")
                .build(),
        ))
        .build();

    // 初始化 RBatis
    let rb = RBatis::new();
    rb.link(rbdc_mysql::MysqlDriver {}, &config.database.url)
        .await
        .map_err(|e| {
            log::error!("数据库连接失败: {}", e);
            std::io::Error::new(std::io::ErrorKind::Other, e)
        })?;
    log::info!("✅ 数据库连接成功");
    let rb = Arc::new(rb);

    // 初始化 Redis 连接池
    log::info!("⚡ 初始化 Redis 连接池...");
    let redis_util = RedisUtil::from_url(config.redis.url).expect("初始化 Redis连接池失败");
    let redis_util = Arc::new(redis_util);
    log::info!("📦 Redis 连接池已就绪");

    // redis-mq
    let mq = Arc::new(MessageQueue::new(redis_util.clone()));

    // 组装工程依赖
    let notification_service = Arc::new(NotificationService::new(rb.clone(), mq.clone()));
    let responsible_service = Arc::new(ResponsibleGamingService::new(rb.clone()));
    let bonus_service = Arc::new(BonusService::new(rb.clone()));
    let state = state::AppState {
        rb: rb.clone(),
        redis: redis_util,
        mq: mq.clone(),
        notification_service: notification_service.clone(),
        wallet_service: Arc::new(WalletService::new(rb.clone())),
        session_service: Arc::new(GameSessionService::new(rb.clone())),
        bet_service: Arc::new(BetService::new(
            rb.clone(),
            responsible_service.clone(),
            bonus_service.clone(),
        )),
        bonus_service,
        withdrawal_service: Arc::new(WithdrawalService::new(
            rb.clone(),
            notification_service.clone(),
        )),
        raffle_service: Arc::new(RaffleService::new(rb.clone(), notification_service.clone())),
        responsible_service,
        registration_service: Arc::new(RegistrationService::new(rb.clone(), mq.clone())),
    };
    let state_data = web::Data::new(state.clone());

    // 注册消息队列订阅者并启动后台消费
    subscribers::init_subscribers(state_data.clone()).await;
    if let Err(e) = mq.start_consumer().await {
        log::error!("❌ 消息队列消费者启动失败: {}", e);
    }

    let addr = format!("{}:{}", config.server.host, config.server.port);
    log::info!("🚀 启动 Actix Web 服务器: {}", addr);
    HttpServer::new(move || {
        App::new()
            // 全局中间件配置
            .wrap(Logger::default())
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            // Sa-Token 中间件
            .wrap(sa_token_middleware.clone())
            // 注册 JSON 和 Query 错误处理器
            .app_data(error_handler::json_config())
            .app_data(error_handler::query_config())
            // 注册全局数据
            .app_data(state_data.clone())
            .service(handle::common::health)
            .service(handle::wallet::list_wallets)
            .service(handle::wallet::deposit)
            .service(handle::wallet::list_transactions)
            .service(handle::session::start_session)
            .service(handle::session::end_session)
            .service(handle::game::play_coin_toss)
            .service(handle::game::play_dice)
            .service(handle::bonus::available)
            .service(handle::bonus::mine)
            .service(handle::bonus::activate)
            .service(handle::bonus::claim)
            .service(handle::bonus::cancel)
            .service(handle::bonus::admin_create)
            .service(handle::bonus::admin_cleanup_expired)
            .service(handle::withdrawal::request)
            .service(handle::withdrawal::list_mine)
            .service(handle::withdrawal::admin_list)
            .service(handle::withdrawal::admin_process)
            .service(handle::raffle::list_active)
            .service(handle::raffle::join)
            .service(handle::raffle::admin_create)
            .service(handle::raffle::admin_draw)
            .service(handle::raffle::admin_cancel)
            .service(handle::raffle::admin_list)
            .service(handle::responsible::get_limits)
            .service(handle::responsible::set_limits)
            .service(handle::responsible::self_exclude)
            .service(handle::responsible::usage)
            .service(handle::player::admin_create_player)
            .service(handle::player::admin_deactivate_wallet)
    })
    .bind(&addr)?
    .run()
    .await
}
