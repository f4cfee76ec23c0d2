pub mod error_handler;
pub mod sa_token;
