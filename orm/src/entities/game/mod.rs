pub mod app_game;
pub mod app_tenant_game;
pub mod app_game_session;
pub mod app_game_round;
pub mod app_bet;

pub use app_game::*;
pub use app_tenant_game::*;
pub use app_game_session::*;
pub use app_game_round::*;
pub use app_bet::*;
