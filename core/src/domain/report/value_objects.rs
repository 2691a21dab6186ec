use std::collections::BTreeMap;

use chrono::{DateTime, Months, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{
    analysis::entities::{AiAnalysis, RiskLevel},
    hormone::entities::{HormoneReading, HormoneStatus, Trend},
};

use super::entities::{ReportMetadata, ReportStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
pub enum Period {
    #[serde(rename = "1month")]
    OneMonth,
    #[serde(rename = "3months")]
    ThreeMonths,
    #[default]
    #[serde(rename = "6months")]
    SixMonths,
    #[serde(rename = "1year")]
    OneYear,
}

impl Period {
    /// Unknown values fall back to six months.
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some("1month") => Period::OneMonth,
            Some("3months") => Period::ThreeMonths,
            Some("1year") => Period::OneYear,
            _ => Period::SixMonths,
        }
    }

    pub fn start_from(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        let months = match self {
            Period::OneMonth => 1,
            Period::ThreeMonths => 3,
            Period::SixMonths => 6,
            Period::OneYear => 12,
        };

        now.checked_sub_months(Months::new(months)).unwrap_or(now)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportSortField {
    #[default]
    CreatedAt,
    UpdatedAt,
    ReportDate,
    Title,
    Status,
}

impl ReportSortField {
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some("updatedAt") => ReportSortField::UpdatedAt,
            Some("reportDate") => ReportSortField::ReportDate,
            Some("title") => ReportSortField::Title,
            Some("status") => ReportSortField::Status,
            _ => ReportSortField::CreatedAt,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some(v) if v.eq_ignore_ascii_case("asc") => SortOrder::Asc,
            _ => SortOrder::Desc,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ReportFilter {
    pub status: Option<ReportStatus>,
    pub search: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub limit: u64,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self { page: 1, limit: 10 }
    }
}

impl PageRequest {
    pub fn new(page: Option<u64>, limit: Option<u64>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            limit: limit.unwrap_or(10).clamp(1, 100),
        }
    }

    /// Row offset, capped at the largest value Postgres accepts for `OFFSET`.
    pub fn offset(&self) -> u64 {
        self.page
            .saturating_sub(1)
            .saturating_mul(self.limit)
            .min(i64::MAX as u64)
    }
}

#[derive(Debug, Clone)]
pub struct ListReportsInput {
    pub filter: ReportFilter,
    pub sort_by: ReportSortField,
    pub sort_order: SortOrder,
    pub page: PageRequest,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current_page: u64,
    pub total_pages: u64,
    pub total_count: u64,
    pub has_next_page: bool,
    pub has_prev_page: bool,
}

impl Pagination {
    pub fn new(page: PageRequest, total_count: u64) -> Self {
        let total_pages = total_count.div_ceil(page.limit);

        Self {
            current_page: page.page,
            total_pages,
            total_count,
            has_next_page: page.page < total_pages,
            has_prev_page: page.page > 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ReportPage<T> {
    pub reports: Vec<T>,
    pub pagination: Pagination,
}

/// Per-user aggregate over every report.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReportStats {
    pub total_reports: u64,
    pub analyzed_reports: u64,
    pub avg_score: u32,
    pub last_report_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateReportInput {
    pub title: Option<String>,
    pub description: Option<String>,
    pub report_date: Option<DateTime<Utc>>,
    pub tags: Option<Vec<String>>,
    pub is_public: Option<bool>,
    pub metadata: Option<ReportMetadata>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyTrend {
    pub month: String,
    pub avg_score: u32,
    pub report_count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatsOverview {
    pub period: Period,
    pub total_reports: u64,
    pub analyzed_reports: u64,
    pub avg_health_score: u32,
    pub risk_distribution: BTreeMap<String, u32>,
    pub monthly_trends: Vec<MonthlyTrend>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ComparedReport {
    pub report_id: String,
    pub title: String,
    pub report_date: DateTime<Utc>,
    pub overall_score: u8,
    pub risk_level: RiskLevel,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HormoneDataPoint {
    pub report_id: String,
    pub report_date: DateTime<Utc>,
    pub value: f64,
    pub status: HormoneStatus,
    pub unit: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HormoneComparison {
    pub data: Vec<HormoneDataPoint>,
    pub trend: Trend,
    pub change: f64,
    pub percent_change: f64,
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ScoreTrend {
    Improving,
    Declining,
    Stable,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScoreChange {
    pub trend: ScoreTrend,
    pub change: i32,
    pub percent_change: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonTrends {
    pub overall_score: ScoreChange,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReportComparison {
    pub reports: Vec<ComparedReport>,
    pub hormone_comparison: BTreeMap<String, HormoneComparison>,
    pub trends: ComparisonTrends,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Json,
    Csv,
}

impl ExportFormat {
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some(v) if v.eq_ignore_ascii_case("csv") => ExportFormat::Csv,
            _ => ExportFormat::Json,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReportInfo {
    pub report_id: String,
    pub title: String,
    pub description: Option<String>,
    pub report_date: DateTime<Utc>,
    pub status: ReportStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReportExport {
    pub report_info: ReportInfo,
    pub hormone_data: Vec<HormoneReading>,
    pub ai_analysis: Option<AiAnalysis>,
    pub exported_at: DateTime<Utc>,
    pub exported_by: Uuid,
}

/// A rendered export, ready to be sent as an attachment.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportFile {
    pub filename: String,
    pub content_type: &'static str,
    pub body: Vec<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_period_parse_and_start() {
        let now = Utc.with_ymd_and_hms(2024, 8, 31, 12, 0, 0).unwrap();

        assert_eq!(Period::parse(None), Period::SixMonths);
        assert_eq!(Period::parse(Some("bogus")), Period::SixMonths);
        assert_eq!(
            Period::parse(Some("1month")).start_from(now),
            Utc.with_ymd_and_hms(2024, 7, 31, 12, 0, 0).unwrap()
        );
        assert_eq!(
            Period::OneYear.start_from(now),
            Utc.with_ymd_and_hms(2023, 8, 31, 12, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_page_request_clamps() {
        let page = PageRequest::new(Some(0), Some(500));
        assert_eq!(page.page, 1);
        assert_eq!(page.limit, 100);

        let page = PageRequest::new(Some(3), Some(10));
        assert_eq!(page.offset(), 20);
    }

    #[test]
    fn test_huge_page_offset_saturates() {
        let page = PageRequest::new(Some(u64::MAX), Some(100));
        assert_eq!(page.offset(), i64::MAX as u64);

        let page = PageRequest::new(Some(u64::MAX / 100), Some(100));
        assert_eq!(page.offset(), i64::MAX as u64);

        let pagination = Pagination::new(page, 3);
        assert!(!pagination.has_next_page);
        assert!(pagination.has_prev_page);
    }

    #[test]
    fn test_pagination() {
        let pagination = Pagination::new(PageRequest::new(Some(2), Some(10)), 25);

        assert_eq!(pagination.total_pages, 3);
        assert!(pagination.has_next_page);
        assert!(pagination.has_prev_page);

        let empty = Pagination::new(PageRequest::default(), 0);
        assert_eq!(empty.total_pages, 0);
        assert!(!empty.has_next_page);
    }

    #[test]
    fn test_sort_parsing() {
        assert_eq!(ReportSortField::parse(Some("title")), ReportSortField::Title);
        assert_eq!(ReportSortField::parse(Some("nope")), ReportSortField::CreatedAt);
        assert_eq!(SortOrder::parse(Some("ASC")), SortOrder::Asc);
        assert_eq!(SortOrder::parse(None), SortOrder::Desc);
    }
}
