pub mod analysis;
pub mod authentication;
pub mod common;
pub mod health;
pub mod hormone;
pub mod report;
pub mod storage;
pub mod user;
