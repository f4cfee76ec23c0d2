pub mod app_raffle_jackpot;
pub mod app_raffle_entry;

pub use app_raffle_jackpot::*;
pub use app_raffle_entry::*;
