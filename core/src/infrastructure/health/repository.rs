use std::time::Instant;

use sea_orm::{ConnectionTrait, DatabaseBackend, DatabaseConnection, Statement};
use tracing::error;

use crate::domain::{
    common::entities::app_errors::CoreError,
    health::{entities::DatabaseStats, ports::HealthCheckRepository},
};

#[derive(Debug, Clone)]
pub struct PostgresHealthCheckRepository {
    pub db: DatabaseConnection,
}

impl PostgresHealthCheckRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn count(&self, sql: &str) -> Result<u64, CoreError> {
        let row = self
            .db
            .query_one(Statement::from_string(DatabaseBackend::Postgres, sql))
            .await
            .map_err(|e| {
                error!("Failed to count rows: {}", e);
                CoreError::InternalServerError
            })?;

        let count: i64 = row
            .and_then(|row| row.try_get("", "count").ok())
            .unwrap_or(0);

        Ok(count.max(0) as u64)
    }
}

impl HealthCheckRepository for PostgresHealthCheckRepository {
    async fn ping(&self) -> Result<u64, CoreError> {
        let started = Instant::now();

        self.db
            .execute(Statement::from_string(DatabaseBackend::Postgres, "SELECT 1"))
            .await
            .map_err(|e| {
                error!("Database ping failed: {}", e);
                CoreError::InternalServerError
            })?;

        Ok(started.elapsed().as_millis() as u64)
    }

    async fn stats(&self) -> Result<DatabaseStats, CoreError> {
        let users = self.count("SELECT COUNT(*) AS count FROM users").await?;
        let active_users = self
            .count("SELECT COUNT(*) AS count FROM users WHERE is_active AND NOT is_deleted")
            .await?;
        let reports = self.count("SELECT COUNT(*) AS count FROM reports").await?;

        let rows = self
            .db
            .query_all(Statement::from_string(
                DatabaseBackend::Postgres,
                "SELECT status, COUNT(*) AS count FROM reports GROUP BY status",
            ))
            .await
            .map_err(|e| {
                error!("Failed to count reports by status: {}", e);
                CoreError::InternalServerError
            })?;

        let reports_by_status = rows
            .into_iter()
            .filter_map(|row| {
                let status: String = row.try_get("", "status").ok()?;
                let count: i64 = row.try_get("", "count").ok()?;
                Some((status, count.max(0) as u64))
            })
            .collect();

        Ok(DatabaseStats {
            users,
            active_users,
            reports,
            reports_by_status,
        })
    }
}
