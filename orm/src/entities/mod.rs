pub mod player;
pub mod wallet;
pub mod game;
pub mod bonus;
pub mod payout;
pub mod raffle;
pub mod config;

// Re-export all entities
pub use player::*;
pub use wallet::*;
pub use game::*;
pub use bonus::*;
pub use payout::*;
pub use raffle::*;
pub use config::*;
