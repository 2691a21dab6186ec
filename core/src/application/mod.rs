use tracing::info;

use crate::{
    domain::common::{PearlConfig, services::Service},
    infrastructure::{
        auth::{google::GoogleTokenInfoVerifier, jwt::JwtTokenRepository},
        db::postgres::{Postgres, PostgresConfig},
        extraction::DocumentTextExtractor,
        health::repository::PostgresHealthCheckRepository,
        image::ImageThumbnailGenerator,
        llm::deepseek_client::DeepSeekClient,
        local_storage::LocalFileStorage,
        report::repository::PostgresReportRepository,
        user::repository::PostgresUserRepository,
    },
};

pub type PearlService = Service<
    PostgresUserRepository,
    PostgresReportRepository,
    PostgresHealthCheckRepository,
    DeepSeekClient,
    DocumentTextExtractor,
    LocalFileStorage,
    ImageThumbnailGenerator,
    JwtTokenRepository,
    GoogleTokenInfoVerifier,
>;

pub async fn create_service(config: PearlConfig) -> Result<PearlService, anyhow::Error> {
    let postgres = Postgres::new(PostgresConfig {
        database_url: config.database.url(),
    })
    .await?;

    tokio::fs::create_dir_all(&config.storage.upload_dir).await?;
    info!(
        "storing uploads under {}",
        config.storage.upload_dir.display()
    );

    let token_repository = JwtTokenRepository::new(
        &config.auth.jwt_secret,
        config.auth.jwt_refresh_secret.as_deref(),
    );

    Ok(Service::new(
        PostgresUserRepository::new(postgres.get_db()),
        PostgresReportRepository::new(postgres.get_db()),
        PostgresHealthCheckRepository::new(postgres.get_db()),
        DeepSeekClient::new(
            config.llm.deepseek_api_key,
            config.llm.deepseek_base_url,
            config.llm.deepseek_model,
        ),
        DocumentTextExtractor::new(
            config.ocr.tesseract_bin,
            config.ocr.pdftoppm_bin,
            config.ocr.languages,
        ),
        LocalFileStorage::new(config.storage.upload_dir.clone()),
        ImageThumbnailGenerator::new(),
        token_repository,
        GoogleTokenInfoVerifier::new(),
        config.storage,
        config.auth.google_client_id,
    ))
}
