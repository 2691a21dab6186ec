use std::future::Future;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{
    authentication::value_objects::Identity,
    common::entities::app_errors::CoreError,
    report::{
        entities::{Report, ReportStatus},
        value_objects::{
            ExportFile, ExportFormat, ListReportsInput, Period, ReportComparison, ReportPage,
            ReportStats, StatsOverview, UpdateReportInput,
        },
    },
};

/// Repository for report records, always scoped to their owner.
#[cfg_attr(test, mockall::automock)]
pub trait ReportRepository: Send + Sync {
    fn create(&self, report: Report) -> impl Future<Output = Result<Report, CoreError>> + Send;

    /// Persists the whole record, bumping `updated_at`.
    fn update(&self, report: Report) -> impl Future<Output = Result<Report, CoreError>> + Send;

    fn delete(&self, id: Uuid) -> impl Future<Output = Result<(), CoreError>> + Send;

    /// Atomically moves a report into `processing`; false when it already was.
    fn claim_for_processing(
        &self,
        id: Uuid,
    ) -> impl Future<Output = Result<bool, CoreError>> + Send;

    fn get_by_report_id(
        &self,
        user_id: Uuid,
        report_id: String,
    ) -> impl Future<Output = Result<Option<Report>, CoreError>> + Send;

    fn list(
        &self,
        user_id: Uuid,
        input: ListReportsInput,
    ) -> impl Future<Output = Result<(Vec<Report>, u64), CoreError>> + Send;

    /// Newest first.
    fn recent(
        &self,
        user_id: Uuid,
        limit: u64,
    ) -> impl Future<Output = Result<Vec<Report>, CoreError>> + Send;

    /// Analyzed reports ordered by report date ascending; with `limit`, only the latest ones.
    fn analyzed(
        &self,
        user_id: Uuid,
        since: Option<DateTime<Utc>>,
        limit: Option<u64>,
    ) -> impl Future<Output = Result<Vec<Report>, CoreError>> + Send;

    fn latest_analyzed(
        &self,
        user_id: Uuid,
    ) -> impl Future<Output = Result<Option<Report>, CoreError>> + Send;

    fn created_since(
        &self,
        user_id: Uuid,
        since: DateTime<Utc>,
    ) -> impl Future<Output = Result<Vec<Report>, CoreError>> + Send;

    /// Analyzed reports among `report_ids`, ordered by report date ascending.
    fn analyzed_by_report_ids(
        &self,
        user_id: Uuid,
        report_ids: Vec<String>,
    ) -> impl Future<Output = Result<Vec<Report>, CoreError>> + Send;

    fn all_for_user(
        &self,
        user_id: Uuid,
    ) -> impl Future<Output = Result<Vec<Report>, CoreError>> + Send;

    fn stats(&self, user_id: Uuid) -> impl Future<Output = Result<ReportStats, CoreError>> + Send;

    fn make_private(&self, user_id: Uuid) -> impl Future<Output = Result<u64, CoreError>> + Send;

    fn with_status_before(
        &self,
        status: ReportStatus,
        before: DateTime<Utc>,
    ) -> impl Future<Output = Result<Vec<Report>, CoreError>> + Send;
}

/// Service trait for browsing and managing reports
#[cfg_attr(test, mockall::automock)]
pub trait ReportService: Send + Sync {
    fn list_reports(
        &self,
        identity: Identity,
        input: ListReportsInput,
    ) -> impl Future<Output = Result<ReportPage<Report>, CoreError>> + Send;

    fn get_report(
        &self,
        identity: Identity,
        report_id: String,
    ) -> impl Future<Output = Result<Report, CoreError>> + Send;

    fn update_report(
        &self,
        identity: Identity,
        report_id: String,
        input: UpdateReportInput,
    ) -> impl Future<Output = Result<Report, CoreError>> + Send;

    /// Removes the record along with every stored file and thumbnail.
    fn delete_report(
        &self,
        identity: Identity,
        report_id: String,
    ) -> impl Future<Output = Result<(), CoreError>> + Send;

    fn stats_overview(
        &self,
        identity: Identity,
        period: Period,
    ) -> impl Future<Output = Result<StatsOverview, CoreError>> + Send;

    fn compare_reports(
        &self,
        identity: Identity,
        report_ids: Vec<String>,
    ) -> impl Future<Output = Result<ReportComparison, CoreError>> + Send;

    fn export_report(
        &self,
        identity: Identity,
        report_id: String,
        format: ExportFormat,
    ) -> impl Future<Output = Result<ExportFile, CoreError>> + Send;

    /// Deletes reports left in `error` for longer than `max_age_days`, returning how many went.
    fn cleanup_failed_reports(
        &self,
        max_age_days: i64,
    ) -> impl Future<Output = Result<u64, CoreError>> + Send;
}
