pub mod analysis;
pub mod authentication;
pub mod health;
pub mod report;
pub mod server;
pub mod upload;
pub mod user;
