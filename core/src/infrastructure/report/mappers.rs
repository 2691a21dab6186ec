use sea_orm::ActiveValue::Set;
use serde::de::DeserializeOwned;
use tracing::{error, warn};

use crate::{
    domain::{
        common::entities::app_errors::CoreError,
        report::entities::{Report, ReportStatus},
    },
    entity::reports::{ActiveModel as ReportActiveModel, Model as ReportModel},
};

/// Decodes a JSON column, logging and defaulting on malformed content.
fn from_json<T: DeserializeOwned + Default>(value: serde_json::Value, column: &str) -> T {
    serde_json::from_value(value).unwrap_or_else(|e| {
        warn!(column, "malformed JSON column: {}", e);
        T::default()
    })
}

fn to_json<T: serde::Serialize>(value: &T, column: &str) -> Result<serde_json::Value, CoreError> {
    serde_json::to_value(value).map_err(|e| {
        error!("Failed to serialize report {}: {}", column, e);
        CoreError::InternalServerError
    })
}

impl From<ReportModel> for Report {
    fn from(model: ReportModel) -> Self {
        Report {
            id: model.id,
            user_id: model.user_id,
            report_id: model.report_id,
            title: model.title,
            description: model.description,
            report_date: model.report_date.to_utc(),
            uploaded_files: from_json(model.uploaded_files, "uploaded_files"),
            extracted_text: model.extracted_text,
            hormone_data: from_json(model.hormone_data, "hormone_data"),
            ai_analysis: model
                .ai_analysis
                .and_then(|value| serde_json::from_value(value).ok()),
            charts: model.charts.and_then(|value| serde_json::from_value(value).ok()),
            status: ReportStatus::parse(&model.status).unwrap_or(ReportStatus::Error),
            processing_errors: from_json(model.processing_errors, "processing_errors"),
            metadata: from_json(model.metadata, "metadata"),
            is_public: model.is_public,
            tags: from_json(model.tags, "tags"),
            version: model.version,
            created_at: model.created_at.to_utc(),
            updated_at: model.updated_at.to_utc(),
        }
    }
}

impl TryFrom<&Report> for ReportActiveModel {
    type Error = CoreError;

    fn try_from(report: &Report) -> Result<Self, Self::Error> {
        Ok(ReportActiveModel {
            id: Set(report.id),
            user_id: Set(report.user_id),
            report_id: Set(report.report_id.clone()),
            title: Set(report.title.clone()),
            description: Set(report.description.clone()),
            report_date: Set(report.report_date.fixed_offset()),
            uploaded_files: Set(to_json(&report.uploaded_files, "uploaded_files")?),
            extracted_text: Set(report.extracted_text.clone()),
            hormone_data: Set(to_json(&report.hormone_data, "hormone_data")?),
            ai_analysis: Set(report
                .ai_analysis
                .as_ref()
                .map(|a| to_json(a, "ai_analysis"))
                .transpose()?),
            charts: Set(report
                .charts
                .as_ref()
                .map(|c| to_json(c, "charts"))
                .transpose()?),
            status: Set(report.status.as_str().to_string()),
            processing_errors: Set(to_json(&report.processing_errors, "processing_errors")?),
            metadata: Set(to_json(&report.metadata, "metadata")?),
            is_public: Set(report.is_public),
            tags: Set(to_json(&report.tags, "tags")?),
            version: Set(report.version),
            created_at: Set(report.created_at.fixed_offset()),
            updated_at: Set(report.updated_at.fixed_offset()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;
    use uuid::Uuid;

    fn model() -> ReportModel {
        let now = Utc::now().fixed_offset();
        ReportModel {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            report_id: "RPT-1".to_string(),
            title: "Panel".to_string(),
            description: None,
            report_date: now,
            uploaded_files: json!([]),
            extracted_text: None,
            hormone_data: json!([{
                "name": "TSH",
                "fullName": "Thyroid Stimulating Hormone",
                "value": 2.1,
                "unit": "mIU/L",
                "referenceRange": {"min": 0.27, "max": 4.2},
                "status": "normal"
            }]),
            ai_analysis: None,
            charts: None,
            status: "analyzed".to_string(),
            processing_errors: json!([]),
            metadata: json!({"labName": "Quest"}),
            is_public: false,
            tags: json!(["thyroid"]),
            version: 3,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_model_to_report() {
        let report = Report::from(model());

        assert_eq!(report.status, ReportStatus::Analyzed);
        assert_eq!(report.hormone_data.len(), 1);
        assert_eq!(report.hormone_data[0].reference_range.max, Some(4.2));
        assert_eq!(report.metadata.lab_name.as_deref(), Some("Quest"));
        assert_eq!(report.tags, vec!["thyroid".to_string()]);
    }

    #[test]
    fn test_malformed_columns_default() {
        let mut model = model();
        model.tags = json!({"not": "a list"});
        model.ai_analysis = Some(json!("broken"));

        let report = Report::from(model);

        assert!(report.tags.is_empty());
        assert!(report.ai_analysis.is_none());
    }
}
