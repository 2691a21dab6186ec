pub mod auth;
pub mod http;
pub mod rate_limit;
