use std::path::PathBuf;

use chrono::{DateTime, Utc};
use rand::{Rng, distributions::Alphanumeric};
use uuid::{NoContext, Timestamp};

pub mod entities;
pub mod services;

#[derive(Clone, Debug)]
pub struct PearlConfig {
    pub database: DatabaseConfig,
    pub llm: LLMConfig,
    pub auth: AuthConfig,
    pub storage: StorageConfig,
    pub ocr: OcrConfig,
}

#[derive(Clone, Debug)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub name: String,
}

impl DatabaseConfig {
    pub fn url(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}",
            self.username, self.password, self.host, self.port, self.name
        )
    }
}

#[derive(Clone, Debug)]
pub struct LLMConfig {
    pub deepseek_api_key: String,
    pub deepseek_base_url: String,
    pub deepseek_model: String,
}

#[derive(Clone, Debug)]
pub struct AuthConfig {
    pub jwt_secret: String,
    /// Falls back to `jwt_secret` when unset.
    pub jwt_refresh_secret: Option<String>,
    pub google_client_id: String,
}

#[derive(Clone, Debug)]
pub struct StorageConfig {
    pub upload_dir: PathBuf,
    pub max_file_size: u64,
    pub max_total_size: u64,
    pub max_files: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            upload_dir: PathBuf::from("uploads"),
            max_file_size: 10 * 1024 * 1024,
            max_total_size: 50 * 1024 * 1024,
            max_files: 5,
        }
    }
}

#[derive(Clone, Debug)]
pub struct OcrConfig {
    pub tesseract_bin: String,
    pub pdftoppm_bin: String,
    pub languages: String,
}

pub fn generate_timestamp() -> (DateTime<Utc>, Timestamp) {
    let now = Utc::now();
    let seconds = now.timestamp().try_into().unwrap_or(0);
    let timestamp = Timestamp::from_unix(NoContext, seconds, 0);

    (now, timestamp)
}

pub fn generate_random_string(length: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}

fn to_base36(mut value: u64) -> String {
    const DIGITS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

    if value == 0 {
        return "0".to_string();
    }

    let mut out = Vec::new();
    while value > 0 {
        out.push(DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}

/// Public report identifier: `RPT-{base36 millis}-{5 random chars}`, upper-cased.
pub fn generate_report_id() -> String {
    let millis = Utc::now().timestamp_millis().max(0) as u64;
    format!("RPT-{}-{}", to_base36(millis), generate_random_string(5)).to_uppercase()
}

/// Rounds to two decimals, the precision used for changes and percentages.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
