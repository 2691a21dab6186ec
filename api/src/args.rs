use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser};
use pearl_core::domain::common::{
    AuthConfig, DatabaseConfig, LLMConfig, OcrConfig, PearlConfig, StorageConfig,
};

#[derive(Debug, Clone, Parser)]
#[command(name = "pearl", version, about = "Pearl hormone report API")]
pub struct Args {
    #[command(flatten)]
    pub server: ServerArgs,

    #[command(flatten)]
    pub db: DatabaseArgs,

    #[command(flatten)]
    pub log: LogArgs,

    #[command(flatten)]
    pub llm: LlmArgs,

    #[command(flatten)]
    pub auth: AuthArgs,

    #[command(flatten)]
    pub storage: StorageArgs,

    #[command(flatten)]
    pub ocr: OcrArgs,
}

#[derive(Debug, Clone, ClapArgs)]
pub struct ServerArgs {
    #[arg(long = "server-host", env = "SERVER_HOST", default_value = "0.0.0.0")]
    pub host: String,

    #[arg(long = "server-port", env = "PORT", default_value_t = 3001)]
    pub port: u16,

    /// Prefix of every route, e.g. `/api`.
    #[arg(long, env = "ROOT_PATH", default_value = "/api")]
    pub root_path: String,

    #[arg(
        long,
        env = "ALLOWED_ORIGINS",
        value_delimiter = ',',
        default_value = "http://localhost:5173"
    )]
    pub allowed_origins: Vec<String>,

    #[arg(long, env = "TLS_CERT_PATH")]
    pub tls_cert: Option<PathBuf>,

    #[arg(long, env = "TLS_KEY_PATH")]
    pub tls_key: Option<PathBuf>,
}

#[derive(Debug, Clone, ClapArgs)]
pub struct DatabaseArgs {
    #[arg(long = "database-host", env = "DATABASE_HOST", default_value = "localhost")]
    pub host: String,

    #[arg(long = "database-port", env = "DATABASE_PORT", default_value_t = 5432)]
    pub port: u16,

    #[arg(long = "database-user", env = "DATABASE_USER", default_value = "pearl")]
    pub user: String,

    #[arg(long = "database-password", env = "DATABASE_PASSWORD", default_value = "pearl")]
    pub password: String,

    #[arg(long = "database-name", env = "DATABASE_NAME", default_value = "pearl")]
    pub name: String,
}

#[derive(Debug, Clone, ClapArgs)]
pub struct LogArgs {
    /// `tracing` filter directives, e.g. `info,pearl_core=debug`.
    #[arg(long, env = "LOG_FILTER", default_value = "info")]
    pub log_filter: String,

    #[arg(long, env = "LOG_JSON", default_value_t = false)]
    pub log_json: bool,
}

#[derive(Debug, Clone, ClapArgs)]
pub struct LlmArgs {
    #[arg(long, env = "DEEPSEEK_API_KEY", default_value = "", hide_env_values = true)]
    pub deepseek_api_key: String,

    #[arg(long, env = "DEEPSEEK_BASE_URL", default_value = "https://api.deepseek.com")]
    pub deepseek_base_url: String,

    #[arg(long, env = "DEEPSEEK_MODEL", default_value = "deepseek-chat")]
    pub deepseek_model: String,
}

#[derive(Debug, Clone, ClapArgs)]
pub struct AuthArgs {
    #[arg(long, env = "JWT_SECRET", hide_env_values = true)]
    pub jwt_secret: String,

    #[arg(long, env = "JWT_REFRESH_SECRET", hide_env_values = true)]
    pub jwt_refresh_secret: Option<String>,

    #[arg(long, env = "GOOGLE_CLIENT_ID", default_value = "")]
    pub google_client_id: String,

    /// Requests allowed per user within one window.
    #[arg(long, env = "RATE_LIMIT_MAX", default_value_t = 100)]
    pub rate_limit_max: usize,

    #[arg(long, env = "RATE_LIMIT_WINDOW_SECS", default_value_t = 900)]
    pub rate_limit_window_secs: u64,
}

#[derive(Debug, Clone, ClapArgs)]
pub struct StorageArgs {
    #[arg(long, env = "UPLOAD_DIR", default_value = "uploads")]
    pub upload_dir: PathBuf,

    /// Bytes.
    #[arg(long, env = "MAX_FILE_SIZE", default_value_t = 10_485_760)]
    pub max_file_size: u64,

    /// Files accepted in one upload.
    #[arg(long, env = "MAX_FILES", default_value_t = 5)]
    pub max_files: usize,
}

impl StorageArgs {
    /// Request body cap for uploads: every file at its size limit plus 1 MiB of form framing.
    pub fn upload_body_limit(&self) -> usize {
        let files = usize::try_from(self.max_file_size)
            .unwrap_or(usize::MAX)
            .saturating_mul(self.max_files);

        files.saturating_add(1024 * 1024)
    }
}

#[derive(Debug, Clone, ClapArgs)]
pub struct OcrArgs {
    #[arg(long, env = "TESSERACT_BIN", default_value = "tesseract")]
    pub tesseract_bin: String,

    /// Renders scanned PDF pages to images before OCR.
    #[arg(long, env = "PDFTOPPM_BIN", default_value = "pdftoppm")]
    pub pdftoppm_bin: String,

    /// Tesseract language codes joined with `+`.
    #[arg(long, env = "OCR_LANGUAGES", default_value = "eng")]
    pub ocr_languages: String,
}

impl From<Args> for PearlConfig {
    fn from(args: Args) -> Self {
        PearlConfig {
            database: DatabaseConfig {
                host: args.db.host,
                port: args.db.port,
                username: args.db.user,
                password: args.db.password,
                name: args.db.name,
            },
            llm: LLMConfig {
                deepseek_api_key: args.llm.deepseek_api_key,
                deepseek_base_url: args.llm.deepseek_base_url,
                deepseek_model: args.llm.deepseek_model,
            },
            auth: AuthConfig {
                jwt_secret: args.auth.jwt_secret,
                jwt_refresh_secret: args.auth.jwt_refresh_secret.filter(|s| !s.is_empty()),
                google_client_id: args.auth.google_client_id,
            },
            storage: StorageConfig {
                upload_dir: args.storage.upload_dir,
                max_file_size: args.storage.max_file_size,
                max_files: args.storage.max_files,
                ..StorageConfig::default()
            },
            ocr: OcrConfig {
                tesseract_bin: args.ocr.tesseract_bin,
                pdftoppm_bin: args.ocr.pdftoppm_bin,
                languages: args.ocr.ocr_languages,
            },
        }
    }
}
