pub mod auth_checker;
pub mod sa_token_middleware;
