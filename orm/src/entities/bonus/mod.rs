pub mod app_bonus;
pub mod app_bonus_usage;

pub use app_bonus::*;
pub use app_bonus_usage::*;
