use chrono::{DateTime, NaiveDate, Utc};
use pearl_core::domain::{
    common::entities::app_errors::CoreError, report::entities::ReportMetadata,
};

use crate::application::http::server::api_entities::api_error::ApiError;

/// Tags arrive either as a JSON array or as a comma separated list.
pub fn parse_tags(raw: &str) -> Vec<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Vec::new();
    }

    let tags = match serde_json::from_str::<Vec<String>>(raw) {
        Ok(tags) => tags,
        Err(_) => raw.split(',').map(str::to_string).collect(),
    };

    tags.into_iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect()
}

pub fn parse_metadata(raw: &str) -> Result<ReportMetadata, ApiError> {
    if raw.trim().is_empty() {
        return Ok(ReportMetadata::default());
    }

    serde_json::from_str(raw)
        .map_err(|e| ApiError::BadRequest(format!("Invalid metadata JSON: {e}")))
}

/// Accepts RFC 3339 timestamps and plain `YYYY-MM-DD` dates.
pub fn parse_report_date(raw: &str) -> Result<Option<DateTime<Utc>>, ApiError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }

    if let Ok(date) = DateTime::parse_from_rfc3339(raw) {
        return Ok(Some(date.with_timezone(&Utc)));
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|d| Some(d.and_utc()))
        .ok_or_else(|| ApiError::BadRequest("Report date must be a valid date".to_string()))
}

pub fn parse_file_index(raw: &str) -> Result<usize, ApiError> {
    raw.parse::<usize>()
        .map_err(|_| ApiError::from(CoreError::InvalidFileIndex))
}
