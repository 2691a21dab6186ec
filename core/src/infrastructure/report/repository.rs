use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseBackend,
    DatabaseConnection, EntityTrait, Order, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
    Select, Statement,
    sea_query::{Expr, extension::postgres::PgExpr},
};
use tracing::error;
use uuid::Uuid;

use crate::{
    domain::{
        common::entities::app_errors::CoreError,
        report::{
            entities::{Report, ReportStatus},
            ports::ReportRepository,
            value_objects::{ListReportsInput, ReportSortField, ReportStats, SortOrder},
        },
    },
    entity::reports::{
        ActiveModel as ReportActiveModel, Column as ReportColumn, Entity as ReportEntity,
    },
};

#[derive(Debug, Clone)]
pub struct PostgresReportRepository {
    pub db: DatabaseConnection,
}

/// `%term%` with LIKE wildcards in the term escaped.
fn like_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

fn sort_column(field: ReportSortField) -> ReportColumn {
    match field {
        ReportSortField::CreatedAt => ReportColumn::CreatedAt,
        ReportSortField::UpdatedAt => ReportColumn::UpdatedAt,
        ReportSortField::ReportDate => ReportColumn::ReportDate,
        ReportSortField::Title => ReportColumn::Title,
        ReportSortField::Status => ReportColumn::Status,
    }
}

impl PostgresReportRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn owned_by(user_id: Uuid) -> Select<ReportEntity> {
        ReportEntity::find().filter(ReportColumn::UserId.eq(user_id))
    }

    async fn fetch(&self, query: Select<ReportEntity>, what: &str) -> Result<Vec<Report>, CoreError> {
        let reports = query
            .all(&self.db)
            .await
            .map_err(|e| {
                error!("Failed to fetch {}: {}", what, e);
                CoreError::InternalServerError
            })?
            .into_iter()
            .map(Report::from)
            .collect();

        Ok(reports)
    }
}

impl ReportRepository for PostgresReportRepository {
    async fn create(&self, report: Report) -> Result<Report, CoreError> {
        let model = ReportActiveModel::try_from(&report)?;

        let created = ReportEntity::insert(model)
            .exec_with_returning(&self.db)
            .await
            .map(Report::from)
            .map_err(|e| {
                error!("Failed to create report: {}", e);
                CoreError::InternalServerError
            })?;

        Ok(created)
    }

    async fn update(&self, mut report: Report) -> Result<Report, CoreError> {
        report.updated_at = Utc::now();
        let model = ReportActiveModel::try_from(&report)?;

        let updated = model.update(&self.db).await.map_err(|e| {
            error!("Failed to update report {}: {}", report.report_id, e);
            CoreError::InternalServerError
        })?;

        Ok(Report::from(updated))
    }

    async fn delete(&self, id: Uuid) -> Result<(), CoreError> {
        ReportEntity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| {
                error!("Failed to delete report: {}", e);
                CoreError::InternalServerError
            })?;

        Ok(())
    }

    async fn claim_for_processing(&self, id: Uuid) -> Result<bool, CoreError> {
        let result = ReportEntity::update_many()
            .col_expr(
                ReportColumn::Status,
                Expr::value(ReportStatus::Processing.as_str()),
            )
            .col_expr(ReportColumn::UpdatedAt, Expr::value(Utc::now().fixed_offset()))
            .filter(ReportColumn::Id.eq(id))
            .filter(ReportColumn::Status.ne(ReportStatus::Processing.as_str()))
            .exec(&self.db)
            .await
            .map_err(|e| {
                error!("Failed to claim report for processing: {}", e);
                CoreError::InternalServerError
            })?;

        Ok(result.rows_affected == 1)
    }

    async fn get_by_report_id(
        &self,
        user_id: Uuid,
        report_id: String,
    ) -> Result<Option<Report>, CoreError> {
        let report = Self::owned_by(user_id)
            .filter(ReportColumn::ReportId.eq(report_id))
            .one(&self.db)
            .await
            .map_err(|e| {
                error!("Failed to get report: {}", e);
                CoreError::InternalServerError
            })?
            .map(Report::from);

        Ok(report)
    }

    async fn list(
        &self,
        user_id: Uuid,
        input: ListReportsInput,
    ) -> Result<(Vec<Report>, u64), CoreError> {
        let mut query = Self::owned_by(user_id);

        if let Some(status) = input.filter.status {
            query = query.filter(ReportColumn::Status.eq(status.as_str()));
        }

        if let Some(search) = input.filter.search.as_deref().map(str::trim)
            && !search.is_empty()
        {
            let pattern = like_pattern(search);
            query = query.filter(
                Condition::any()
                    .add(Expr::col(ReportColumn::Title).ilike(pattern.clone()))
                    .add(Expr::col(ReportColumn::Description).ilike(pattern.clone()))
                    .add(Expr::col(ReportColumn::ReportId).ilike(pattern)),
            );
        }

        let total = query.clone().count(&self.db).await.map_err(|e| {
            error!("Failed to count reports: {}", e);
            CoreError::InternalServerError
        })?;

        let order = match input.sort_order {
            SortOrder::Asc => Order::Asc,
            SortOrder::Desc => Order::Desc,
        };

        let query = query
            .order_by(sort_column(input.sort_by), order)
            .order_by_desc(ReportColumn::Id)
            .offset(input.page.offset())
            .limit(input.page.limit);

        let reports = self.fetch(query, "reports").await?;
        Ok((reports, total))
    }

    async fn recent(&self, user_id: Uuid, limit: u64) -> Result<Vec<Report>, CoreError> {
        let query = Self::owned_by(user_id)
            .order_by_desc(ReportColumn::CreatedAt)
            .limit(limit);

        self.fetch(query, "recent reports").await
    }

    async fn analyzed(
        &self,
        user_id: Uuid,
        since: Option<DateTime<Utc>>,
        limit: Option<u64>,
    ) -> Result<Vec<Report>, CoreError> {
        let mut query =
            Self::owned_by(user_id).filter(ReportColumn::Status.eq(ReportStatus::Analyzed.as_str()));

        if let Some(since) = since {
            query = query.filter(ReportColumn::ReportDate.gte(since.fixed_offset()));
        }

        match limit {
            Some(limit) => {
                let query = query.order_by_desc(ReportColumn::ReportDate).limit(limit);
                let mut reports = self.fetch(query, "analyzed reports").await?;
                reports.reverse();
                Ok(reports)
            }
            None => {
                let query = query.order_by_asc(ReportColumn::ReportDate);
                self.fetch(query, "analyzed reports").await
            }
        }
    }

    async fn latest_analyzed(&self, user_id: Uuid) -> Result<Option<Report>, CoreError> {
        let report = Self::owned_by(user_id)
            .filter(ReportColumn::Status.eq(ReportStatus::Analyzed.as_str()))
            .order_by_desc(ReportColumn::ReportDate)
            .one(&self.db)
            .await
            .map_err(|e| {
                error!("Failed to get latest analyzed report: {}", e);
                CoreError::InternalServerError
            })?
            .map(Report::from);

        Ok(report)
    }

    async fn created_since(
        &self,
        user_id: Uuid,
        since: DateTime<Utc>,
    ) -> Result<Vec<Report>, CoreError> {
        let query = Self::owned_by(user_id)
            .filter(ReportColumn::CreatedAt.gte(since.fixed_offset()))
            .order_by_asc(ReportColumn::CreatedAt);

        self.fetch(query, "reports in period").await
    }

    async fn analyzed_by_report_ids(
        &self,
        user_id: Uuid,
        report_ids: Vec<String>,
    ) -> Result<Vec<Report>, CoreError> {
        let query = Self::owned_by(user_id)
            .filter(ReportColumn::ReportId.is_in(report_ids))
            .filter(ReportColumn::Status.eq(ReportStatus::Analyzed.as_str()))
            .order_by_asc(ReportColumn::ReportDate);

        self.fetch(query, "reports to compare").await
    }

    async fn all_for_user(&self, user_id: Uuid) -> Result<Vec<Report>, CoreError> {
        let query = Self::owned_by(user_id).order_by_desc(ReportColumn::CreatedAt);

        self.fetch(query, "user reports").await
    }

    async fn stats(&self, user_id: Uuid) -> Result<ReportStats, CoreError> {
        let stmt = Statement::from_sql_and_values(
            DatabaseBackend::Postgres,
            r#"
            SELECT
              COUNT(*) AS total_reports,
              COUNT(*) FILTER (WHERE status = 'analyzed') AS analyzed_reports,
              AVG((ai_analysis->>'overallScore')::float8)
                FILTER (WHERE status = 'analyzed' AND ai_analysis IS NOT NULL) AS avg_score,
              MAX(created_at) AS last_report_date
            FROM reports
            WHERE user_id = $1
            "#,
            [user_id.into()],
        );

        let row = self.db.query_one(stmt).await.map_err(|e| {
            error!("Failed to aggregate report stats: {}", e);
            CoreError::InternalServerError
        })?;

        let Some(row) = row else {
            return Ok(ReportStats::default());
        };

        let total: i64 = row.try_get("", "total_reports").unwrap_or(0);
        let analyzed: i64 = row.try_get("", "analyzed_reports").unwrap_or(0);
        let avg_score: Option<f64> = row.try_get("", "avg_score").unwrap_or(None);
        let last_report_date: Option<sea_orm::prelude::DateTimeWithTimeZone> =
            row.try_get("", "last_report_date").unwrap_or(None);

        Ok(ReportStats {
            total_reports: total.max(0) as u64,
            analyzed_reports: analyzed.max(0) as u64,
            avg_score: avg_score.map(|s| s.round().max(0.0) as u32).unwrap_or(0),
            last_report_date: last_report_date.map(|dt| dt.to_utc()),
        })
    }

    async fn make_private(&self, user_id: Uuid) -> Result<u64, CoreError> {
        let result = ReportEntity::update_many()
            .col_expr(ReportColumn::IsPublic, Expr::value(false))
            .col_expr(ReportColumn::UpdatedAt, Expr::value(Utc::now().fixed_offset()))
            .filter(ReportColumn::UserId.eq(user_id))
            .exec(&self.db)
            .await
            .map_err(|e| {
                error!("Failed to make reports private: {}", e);
                CoreError::InternalServerError
            })?;

        Ok(result.rows_affected)
    }

    async fn with_status_before(
        &self,
        status: ReportStatus,
        before: DateTime<Utc>,
    ) -> Result<Vec<Report>, CoreError> {
        let query = ReportEntity::find()
            .filter(ReportColumn::Status.eq(status.as_str()))
            .filter(ReportColumn::CreatedAt.lt(before.fixed_offset()));

        self.fetch(query, "stale reports").await
    }
}
