use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{
    hormone::entities::HormoneReading,
    report::entities::{ProcessingError, Report, ReportStatus},
};

use super::entities::{AiAnalysis, Charts, Insight, Recommendation};

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisOutcome {
    pub report_id: String,
    pub status: ReportStatus,
    pub hormone_data: Vec<HormoneReading>,
    pub ai_analysis: Option<AiAnalysis>,
    pub charts: Option<Charts>,
    pub processing_time: Option<i64>,
}

impl From<Report> for AnalysisOutcome {
    fn from(report: Report) -> Self {
        Self {
            processing_time: report.ai_analysis.as_ref().and_then(|a| a.processing_time),
            report_id: report.report_id,
            status: report.status,
            hormone_data: report.hormone_data,
            ai_analysis: report.ai_analysis,
            charts: report.charts,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResults {
    pub report_id: String,
    pub status: ReportStatus,
    pub hormone_data: Vec<HormoneReading>,
    pub ai_analysis: Option<AiAnalysis>,
    pub charts: Option<Charts>,
    pub created_at: DateTime<Utc>,
    pub processing_errors: Vec<ProcessingError>,
}

impl From<Report> for AnalysisResults {
    fn from(report: Report) -> Self {
        Self {
            report_id: report.report_id,
            status: report.status,
            hormone_data: report.hormone_data,
            ai_analysis: report.ai_analysis,
            charts: report.charts,
            created_at: report.created_at,
            processing_errors: report.processing_errors,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct HormoneInsights {
    pub hormone: HormoneReading,
    pub insights: Vec<Insight>,
    pub recommendations: Vec<Recommendation>,
}
