pub mod auth;
pub mod db;
pub mod extraction;
pub mod health;
pub mod image;
pub mod llm;
pub mod local_storage;
pub mod report;
pub mod user;
