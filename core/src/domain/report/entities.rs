use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{
    analysis::entities::{AiAnalysis, Charts, Insight, InsightCategory, Priority, Recommendation},
    common::{generate_report_id, generate_timestamp},
    hormone::entities::HormoneReading,
};

pub const DEFAULT_REPORT_TITLE: &str = "Medical Report";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    Uploaded,
    Processing,
    Analyzed,
    Error,
}

impl ReportStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportStatus::Uploaded => "uploaded",
            ReportStatus::Processing => "processing",
            ReportStatus::Analyzed => "analyzed",
            ReportStatus::Error => "error",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "uploaded" => Some(ReportStatus::Uploaded),
            "processing" => Some(ReportStatus::Processing),
            "analyzed" => Some(ReportStatus::Analyzed),
            "error" => Some(ReportStatus::Error),
            _ => None,
        }
    }

    /// Rough completion percentage shown while a report moves through the pipeline.
    pub fn progress(&self) -> u8 {
        match self {
            ReportStatus::Uploaded => 25,
            ReportStatus::Processing => 50,
            ReportStatus::Analyzed => 100,
            ReportStatus::Error => 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadedFile {
    pub original_name: String,
    pub filename: String,
    pub path: String,
    pub mimetype: String,
    pub size: u64,
    #[serde(default)]
    pub checksum_sha256: String,
    pub uploaded_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_path: Option<String>,
}

impl UploadedFile {
    pub fn is_image(&self) -> bool {
        self.mimetype.starts_with("image/")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProcessingError {
    pub step: String,
    pub error: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReportMetadata {
    pub lab_name: Option<String>,
    pub doctor_name: Option<String>,
    pub test_type: Option<String>,
    pub fasting_status: Option<bool>,
    pub menstrual_cycle_day: Option<u32>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub id: Uuid,
    pub user_id: Uuid,
    pub report_id: String,
    pub title: String,
    pub description: Option<String>,
    pub report_date: DateTime<Utc>,
    pub uploaded_files: Vec<UploadedFile>,
    pub extracted_text: Option<String>,
    pub hormone_data: Vec<HormoneReading>,
    pub ai_analysis: Option<AiAnalysis>,
    pub charts: Option<Charts>,
    pub status: ReportStatus,
    pub processing_errors: Vec<ProcessingError>,
    pub metadata: ReportMetadata,
    pub is_public: bool,
    pub tags: Vec<String>,
    pub version: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Report {
    pub fn new(
        user_id: Uuid,
        title: Option<String>,
        description: Option<String>,
        report_date: Option<DateTime<Utc>>,
        uploaded_files: Vec<UploadedFile>,
        metadata: ReportMetadata,
        tags: Vec<String>,
    ) -> Self {
        let (now, timestamp) = generate_timestamp();

        Self {
            id: Uuid::new_v7(timestamp),
            user_id,
            report_id: generate_report_id(),
            title: title
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| DEFAULT_REPORT_TITLE.to_string()),
            description,
            report_date: report_date.unwrap_or(now),
            uploaded_files,
            extracted_text: None,
            hormone_data: Vec::new(),
            ai_analysis: None,
            charts: None,
            status: ReportStatus::Uploaded,
            processing_errors: Vec::new(),
            metadata,
            is_public: false,
            tags,
            version: 1,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn get_hormone(&self, name: &str) -> Option<&HormoneReading> {
        self.hormone_data.iter().find(|h| h.matches(name))
    }

    pub fn insights_by_category(&self, category: InsightCategory) -> Vec<&Insight> {
        self.ai_analysis
            .as_ref()
            .map(|analysis| {
                analysis
                    .insights
                    .iter()
                    .filter(|i| i.category == category)
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn high_priority_recommendations(&self) -> Vec<&Recommendation> {
        self.ai_analysis
            .as_ref()
            .map(|analysis| {
                analysis
                    .insights
                    .iter()
                    .flat_map(|i| i.recommendations.iter())
                    .filter(|r| r.priority == Priority::High)
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn overall_score(&self) -> Option<u8> {
        self.ai_analysis.as_ref().map(|a| a.overall_score)
    }

    pub fn push_error(&mut self, step: &str, error: impl Into<String>) {
        self.processing_errors.push(ProcessingError {
            step: step.to_string(),
            error: error.into(),
            timestamp: Utc::now(),
        });
    }

    /// Clears every analysis artifact so the pipeline can run again.
    pub fn reset_analysis(&mut self) {
        self.extracted_text = None;
        self.hormone_data.clear();
        self.ai_analysis = None;
        self.charts = None;
        self.processing_errors.clear();
        self.status = ReportStatus::Uploaded;
        self.updated_at = Utc::now();
    }

    pub fn file(&self, index: usize) -> Option<&UploadedFile> {
        self.uploaded_files.get(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        analysis::entities::{InsightType, RiskLevel, Severity},
        hormone::entities::{HormoneStatus, ReferenceRange},
    };

    fn report_with_analysis() -> Report {
        let mut report = Report::new(
            Uuid::new_v4(),
            None,
            None,
            None,
            Vec::new(),
            ReportMetadata::default(),
            Vec::new(),
        );
        report.hormone_data = vec![HormoneReading {
            name: "E2".to_string(),
            full_name: "Estradiol".to_string(),
            value: 120.0,
            unit: "pg/mL".to_string(),
            reference_range: ReferenceRange::new(30.0, 400.0, "pg/mL"),
            status: HormoneStatus::Normal,
            trend: None,
            change: None,
        }];
        report.ai_analysis = Some(AiAnalysis {
            overall_score: 80,
            risk_level: RiskLevel::Low,
            summary: "ok".to_string(),
            insights: vec![
                Insight {
                    insight_type: InsightType::Lifestyle,
                    title: "Sleep".to_string(),
                    description: "Sleep more".to_string(),
                    severity: Severity::Low,
                    category: InsightCategory::Lifestyle,
                    recommendations: vec![Recommendation {
                        action: "Sleep 8 hours".to_string(),
                        priority: Priority::Medium,
                        timeframe: None,
                    }],
                },
                Insight {
                    insight_type: InsightType::Medical,
                    title: "See a doctor".to_string(),
                    description: "Estradiol follow-up".to_string(),
                    severity: Severity::High,
                    category: InsightCategory::MedicalAttention,
                    recommendations: vec![Recommendation {
                        action: "Book appointment".to_string(),
                        priority: Priority::High,
                        timeframe: Some("within 1-2 weeks".to_string()),
                    }],
                },
            ],
            processed_at: None,
            processing_time: None,
            ai_model: None,
            confidence: 0.8,
        });
        report
    }

    #[test]
    fn test_new_report_defaults() {
        let report = Report::new(
            Uuid::new_v4(),
            Some("   ".to_string()),
            None,
            None,
            Vec::new(),
            ReportMetadata::default(),
            Vec::new(),
        );

        assert_eq!(report.title, DEFAULT_REPORT_TITLE);
        assert_eq!(report.status, ReportStatus::Uploaded);
        assert_eq!(report.version, 1);
        assert!(report.report_id.starts_with("RPT-"));
    }

    #[test]
    fn test_get_hormone_by_name_or_full_name() {
        let report = report_with_analysis();

        assert!(report.get_hormone("e2").is_some());
        assert!(report.get_hormone("estradiol").is_some());
        assert!(report.get_hormone("TSH").is_none());
    }

    #[test]
    fn test_insight_queries() {
        let report = report_with_analysis();

        assert_eq!(report.insights_by_category(InsightCategory::Lifestyle).len(), 1);
        let high = report.high_priority_recommendations();
        assert_eq!(high.len(), 1);
        assert_eq!(high[0].action, "Book appointment");
    }

    #[test]
    fn test_reset_analysis() {
        let mut report = report_with_analysis();
        report.status = ReportStatus::Error;
        report.push_error("analysis", "boom");

        report.reset_analysis();

        assert_eq!(report.status, ReportStatus::Uploaded);
        assert!(report.ai_analysis.is_none());
        assert!(report.hormone_data.is_empty());
        assert!(report.processing_errors.is_empty());
    }

    #[test]
    fn test_status_progress() {
        assert_eq!(ReportStatus::Uploaded.progress(), 25);
        assert_eq!(ReportStatus::Analyzed.progress(), 100);
        assert_eq!(ReportStatus::parse("processing"), Some(ReportStatus::Processing));
        assert_eq!(ReportStatus::parse("done"), None);
    }
}
