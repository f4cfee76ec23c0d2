pub mod bet_service;
pub mod bonus_service;
pub mod game_session_service;
pub mod games;
pub mod notification_service;
pub mod raffle_service;
pub mod registration_service;
pub mod responsible_gaming_service;
pub mod wallet_service;
pub mod withdrawal_service;
