pub mod app_player;

pub use app_player::*;
