use std::sync::Arc;

use common::mq::message_queue::MessageQueue;
use common::utils::redis_util::RedisUtil;
use rbatis::RBatis;

use crate::service::bet_service::BetService;
use crate::service::bonus_service::BonusService;
use crate::service::game_session_service::GameSessionService;
use crate::service::notification_service::NotificationService;
use crate::service::raffle_service::RaffleService;
use crate::service::registration_service::RegistrationService;
use crate::service::responsible_gaming_service::ResponsibleGamingService;
use crate::service::wallet_service::WalletService;
use crate::service::withdrawal_service::WithdrawalService;

#[derive(Clone)]
pub struct AppState {
    pub rb: Arc<RBatis>,
    pub redis: Arc<RedisUtil>,
    pub mq: Arc<MessageQueue>,
    pub notification_service: Arc<NotificationService>,
    pub wallet_service: Arc<WalletService>,
    pub session_service: Arc<GameSessionService>,
    pub bet_service: Arc<BetService>,
    pub bonus_service: Arc<BonusService>,
    pub withdrawal_service: Arc<WithdrawalService>,
    pub raffle_service: Arc<RaffleService>,
    pub responsible_service: Arc<ResponsibleGamingService>,
    pub registration_service: Arc<RegistrationService>,
}
