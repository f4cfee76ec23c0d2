pub mod app_withdrawal;

pub use app_withdrawal::*;
