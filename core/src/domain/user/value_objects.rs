use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{
    analysis::entities::Insight,
    hormone::entities::{HormoneReading, Trend},
    report::{
        entities::{Report, ReportStatus},
        value_objects::{Period, ReportStats},
    },
};

use super::entities::{Subscription, User, UserProfile};

/// Only these fields of a user may be changed by the user.
#[derive(Debug, Clone, Default)]
pub struct UpdateProfileInput {
    pub name: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub profile: Option<UserProfile>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfileView {
    #[serde(flatten)]
    pub user: User,
    pub age: Option<i32>,
    pub membership_duration: i64,
    pub stats: ReportStats,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardUser {
    pub name: String,
    pub email: String,
    pub avatar: Option<String>,
    pub member_since: DateTime<Utc>,
    pub subscription: Subscription,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStatistics {
    pub total_reports: u64,
    pub analyzed_reports: u64,
    pub avg_health_score: u32,
    pub last_update: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecentReport {
    pub report_id: String,
    pub title: String,
    pub report_date: DateTime<Utc>,
    pub status: ReportStatus,
    pub overall_score: Option<u8>,
    pub created_at: DateTime<Utc>,
}

impl From<&Report> for RecentReport {
    fn from(report: &Report) -> Self {
        Self {
            report_id: report.report_id.clone(),
            title: report.title.clone(),
            report_date: report.report_date,
            status: report.status,
            overall_score: report.overall_score(),
            created_at: report.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct DashboardTrendPoint {
    pub date: DateTime<Utc>,
    pub score: Option<u8>,
    pub hormones: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub user: DashboardUser,
    pub statistics: DashboardStatistics,
    pub recent_reports: Vec<RecentReport>,
    pub latest_hormone_data: Vec<HormoneReading>,
    pub latest_insights: Vec<Insight>,
    pub trend_data: Vec<DashboardTrendPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TrendPoint {
    pub date: DateTime<Utc>,
    pub overall_score: Option<u8>,
    pub values: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HormoneStats {
    pub trend: Trend,
    pub change: f64,
    pub percent_change: f64,
    pub min: f64,
    pub max: f64,
    pub avg: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TrendsOverview {
    pub period: Period,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub trend_data: Vec<TrendPoint>,
    pub hormone_stats: BTreeMap<String, HormoneStats>,
    pub total_reports: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserExport {
    pub user: User,
    pub reports: Vec<Report>,
    pub exported_at: DateTime<Utc>,
    pub version: String,
}
