use chrono::Utc;

use crate::domain::{
    analysis::ports::{LLMClient, TextExtractor},
    authentication::ports::{GoogleTokenVerifier, TokenRepository},
    common::{entities::app_errors::CoreError, services::Service},
    health::{
        entities::{DatabaseHealthStatus, DatabaseState, DatabaseStats, HealthStatus},
        ports::{HealthCheckRepository, HealthCheckService},
    },
    report::ports::ReportRepository,
    storage::ports::{FileStorage, ThumbnailGenerator},
    user::ports::UserRepository,
};

impl<U, RP, HC, LLM, TE, FS, TH, TK, GV> HealthCheckService
    for Service<U, RP, HC, LLM, TE, FS, TH, TK, GV>
where
    U: UserRepository,
    RP: ReportRepository,
    HC: HealthCheckRepository,
    LLM: LLMClient,
    TE: TextExtractor,
    FS: FileStorage,
    TH: ThumbnailGenerator,
    TK: TokenRepository,
    GV: GoogleTokenVerifier,
{
    async fn health(&self) -> HealthStatus {
        let database = match self.health_check_repository.ping().await {
            Ok(latency_ms) => DatabaseHealthStatus {
                status: DatabaseState::Healthy,
                latency_ms: Some(latency_ms),
                error: None,
            },
            Err(e) => {
                tracing::warn!(error = %e, "database ping failed");
                DatabaseHealthStatus {
                    status: DatabaseState::Unhealthy,
                    latency_ms: None,
                    error: Some(e.to_string()),
                }
            }
        };

        HealthStatus {
            status: "OK".to_string(),
            timestamp: Utc::now(),
            database,
        }
    }

    async fn database_stats(&self) -> Result<DatabaseStats, CoreError> {
        self.health_check_repository.stats().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::common::services::test_support::Mocks;

    #[tokio::test]
    async fn test_health_reports_latency() {
        let mut mocks = Mocks::default();
        mocks
            .health
            .expect_ping()
            .returning(|| Box::pin(async move { Ok(3) }));

        let status = mocks.into_service().health().await;

        assert_eq!(status.status, "OK");
        assert_eq!(status.database.status, DatabaseState::Healthy);
        assert_eq!(status.database.latency_ms, Some(3));
    }

    #[tokio::test]
    async fn test_health_survives_database_outage() {
        let mut mocks = Mocks::default();
        mocks
            .health
            .expect_ping()
            .returning(|| Box::pin(async move { Err(CoreError::InternalServerError) }));

        let status = mocks.into_service().health().await;

        assert_eq!(status.status, "OK");
        assert_eq!(status.database.status, DatabaseState::Unhealthy);
        assert_eq!(status.database.error.as_deref(), Some("Internal server error"));
    }
}
