use chrono::{Duration, Utc};
use futures::future::join_all;
use tracing::instrument;

use crate::domain::{
    analysis::ports::{LLMClient, TextExtractor},
    authentication::{
        ports::{GoogleTokenVerifier, TokenRepository},
        value_objects::Identity,
    },
    common::{entities::app_errors::CoreError, services::Service},
    health::ports::HealthCheckRepository,
    report::{
        entities::{Report, ReportStatus},
        helpers::{build_export, build_stats_overview, compare_reports, hormones_to_csv},
        ports::{ReportRepository, ReportService},
        value_objects::{
            ExportFile, ExportFormat, ListReportsInput, Pagination, Period, ReportComparison,
            ReportPage, StatsOverview, UpdateReportInput,
        },
    },
    storage::ports::{FileStorage, ThumbnailGenerator},
    user::ports::UserRepository,
};

const MIN_COMPARED: usize = 2;
const MAX_COMPARED: usize = 5;

impl<U, RP, HC, LLM, TE, FS, TH, TK, GV> Service<U, RP, HC, LLM, TE, FS, TH, TK, GV>
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
    async fn purge_report(&self, report: &Report) -> Result<(), CoreError> {
        join_all(
            report
                .uploaded_files
                .iter()
                .map(|file| self.remove_uploaded_file(file)),
        )
        .await;

        self.report_repository.delete(report.id).await
    }
}

impl<U, RP, HC, LLM, TE, FS, TH, TK, GV> ReportService
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
    #[instrument(skip(self, identity, input), fields(user_id = %identity.id(), page = input.page.page))]
    async fn list_reports(
        &self,
        identity: Identity,
        input: ListReportsInput,
    ) -> Result<ReportPage<Report>, CoreError> {
        let page = input.page;
        let (reports, total) = self.report_repository.list(identity.id(), input).await?;

        Ok(ReportPage {
            reports,
            pagination: Pagination::new(page, total),
        })
    }

    #[instrument(skip(self, identity), fields(user_id = %identity.id()))]
    async fn get_report(&self, identity: Identity, report_id: String) -> Result<Report, CoreError> {
        self.owned_report(&identity, report_id).await
    }

    #[instrument(skip(self, identity, input), fields(user_id = %identity.id()))]
    async fn update_report(
        &self,
        identity: Identity,
        report_id: String,
        input: UpdateReportInput,
    ) -> Result<Report, CoreError> {
        let mut report = self.owned_report(&identity, report_id).await?;
        let now = Utc::now();

        if let Some(title) = input.title {
            let title = title.trim().to_string();
            if title.is_empty() {
                return Err(CoreError::Validation("Title cannot be empty".to_string()));
            }
            report.title = title;
        }
        if let Some(description) = input.description {
            report.description = Some(description);
        }
        if let Some(report_date) = input.report_date {
            if report_date > now {
                return Err(CoreError::Validation(
                    "Report date cannot be in the future".to_string(),
                ));
            }
            report.report_date = report_date;
        }
        if let Some(tags) = input.tags {
            report.tags = tags;
        }
        if let Some(is_public) = input.is_public {
            report.is_public = is_public;
        }
        if let Some(metadata) = input.metadata {
            report.metadata = metadata;
        }
        report.version += 1;

        let report = self.report_repository.update(report).await?;
        tracing::info!(report_id = %report.report_id, version = report.version, "report updated");

        Ok(report)
    }

    #[instrument(skip(self, identity), fields(user_id = %identity.id()))]
    async fn delete_report(&self, identity: Identity, report_id: String) -> Result<(), CoreError> {
        let report = self.owned_report(&identity, report_id).await?;
        self.purge_report(&report).await?;

        tracing::info!(report_id = %report.report_id, "report deleted");
        Ok(())
    }

    #[instrument(skip(self, identity), fields(user_id = %identity.id()))]
    async fn stats_overview(
        &self,
        identity: Identity,
        period: Period,
    ) -> Result<StatsOverview, CoreError> {
        let since = period.start_from(Utc::now());
        let reports = self
            .report_repository
            .created_since(identity.id(), since)
            .await?;

        Ok(build_stats_overview(period, &reports))
    }

    #[instrument(skip(self, identity), fields(user_id = %identity.id()))]
    async fn compare_reports(
        &self,
        identity: Identity,
        report_ids: Vec<String>,
    ) -> Result<ReportComparison, CoreError> {
        if !(MIN_COMPARED..=MAX_COMPARED).contains(&report_ids.len()) {
            return Err(CoreError::InvalidComparison(
                "Please provide 2-5 report IDs for comparison".to_string(),
            ));
        }

        let reports = self
            .report_repository
            .analyzed_by_report_ids(identity.id(), report_ids)
            .await?;

        compare_reports(&reports).ok_or_else(|| {
            CoreError::InvalidComparison(
                "At least 2 analyzed reports are required for comparison".to_string(),
            )
        })
    }

    #[instrument(skip(self, identity), fields(user_id = %identity.id()))]
    async fn export_report(
        &self,
        identity: Identity,
        report_id: String,
        format: ExportFormat,
    ) -> Result<ExportFile, CoreError> {
        let report = self.owned_report(&identity, report_id).await?;

        let file = match format {
            ExportFormat::Json => {
                let export = build_export(&report, identity.id(), Utc::now());
                let body = serde_json::to_vec_pretty(&export).map_err(|e| {
                    tracing::error!("Failed to serialize report export: {}", e);
                    CoreError::InternalServerError
                })?;

                ExportFile {
                    filename: format!("{}_export.json", report.report_id),
                    content_type: "application/json",
                    body,
                }
            }
            ExportFormat::Csv => ExportFile {
                filename: format!("{}_export.csv", report.report_id),
                content_type: "text/csv",
                body: hormones_to_csv(&report.hormone_data).into_bytes(),
            },
        };

        Ok(file)
    }

    #[instrument(skip(self))]
    async fn cleanup_failed_reports(&self, max_age_days: i64) -> Result<u64, CoreError> {
        let cutoff = Utc::now() - Duration::days(max_age_days);
        let stale = self
            .report_repository
            .with_status_before(ReportStatus::Error, cutoff)
            .await?;

        let mut removed = 0;
        for report in &stale {
            match self.purge_report(report).await {
                Ok(()) => removed += 1,
                Err(e) => {
                    tracing::error!(report_id = %report.report_id, error = %e, "failed to remove stale report")
                }
            }
        }

        if removed > 0 {
            tracing::info!(removed, "cleaned up failed reports");
        }

        Ok(removed)
    }
}
