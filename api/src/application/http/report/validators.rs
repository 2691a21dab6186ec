use chrono::Utc;
use pearl_core::domain::report::{
    entities::{ReportMetadata, ReportStatus},
    value_objects::{
        ListReportsInput, PageRequest, ReportFilter, ReportSortField, SortOrder, UpdateReportInput,
    },
};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

use crate::application::http::{
    server::api_entities::api_error::ApiError, upload::validators::parse_report_date,
};

const SORT_FIELDS: [&str; 5] = ["createdAt", "updatedAt", "reportDate", "title", "status"];

fn validate_status(status: &str) -> Result<(), ValidationError> {
    match ReportStatus::parse(status) {
        Some(_) => Ok(()),
        None => Err(ValidationError::new("status").with_message("Invalid status filter".into())),
    }
}

fn validate_sort_by(field: &str) -> Result<(), ValidationError> {
    if SORT_FIELDS.contains(&field) {
        Ok(())
    } else {
        Err(ValidationError::new("sortBy").with_message("Invalid sort field".into()))
    }
}

fn validate_sort_order(order: &str) -> Result<(), ValidationError> {
    match order {
        "asc" | "desc" => Ok(()),
        _ => Err(ValidationError::new("sortOrder")
            .with_message("Sort order must be asc or desc".into())),
    }
}

fn validate_tags(tags: &Vec<String>) -> Result<(), ValidationError> {
    if tags.iter().all(|t| (1..=50).contains(&t.chars().count())) {
        Ok(())
    } else {
        Err(ValidationError::new("tags")
            .with_message("Each tag must be between 1 and 50 characters".into()))
    }
}

#[derive(Debug, Default, Deserialize, Validate, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListReportsQuery {
    #[validate(range(min = 1, max = 1_000_000, message = "Page must be between 1 and 1000000"))]
    pub page: Option<u64>,
    #[validate(range(min = 1, max = 100, message = "Limit must be between 1 and 100"))]
    pub limit: Option<u64>,
    #[validate(custom(function = "validate_status"))]
    pub status: Option<String>,
    #[validate(custom(function = "validate_sort_by"))]
    pub sort_by: Option<String>,
    #[validate(custom(function = "validate_sort_order"))]
    pub sort_order: Option<String>,
    #[validate(length(min = 1, max = 100, message = "Search term must be between 1 and 100 characters"))]
    pub search: Option<String>,
}

impl From<ListReportsQuery> for ListReportsInput {
    fn from(query: ListReportsQuery) -> Self {
        ListReportsInput {
            filter: ReportFilter {
                status: query.status.as_deref().and_then(ReportStatus::parse),
                search: query.search.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()),
            },
            sort_by: ReportSortField::parse(query.sort_by.as_deref()),
            sort_order: SortOrder::parse(query.sort_order.as_deref()),
            page: PageRequest::new(query.page, query.limit),
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PeriodQuery {
    /// `1month`, `3months`, `6months` or `1year`
    pub period: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ExportQuery {
    /// `json` (default) or `csv`
    pub format: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReportValidator {
    #[validate(length(min = 1, max = 200, message = "Title must be between 1 and 200 characters"))]
    pub title: Option<String>,
    #[validate(length(max = 1000, message = "Description must not exceed 1000 characters"))]
    pub description: Option<String>,
    pub report_date: Option<String>,
    #[validate(custom(function = "validate_tags"))]
    pub tags: Option<Vec<String>>,
    pub is_public: Option<bool>,
    pub metadata: Option<ReportMetadata>,
}

impl UpdateReportValidator {
    pub fn into_input(self) -> Result<UpdateReportInput, ApiError> {
        let report_date = match self.report_date.as_deref() {
            Some(raw) => parse_report_date(raw)?,
            None => None,
        };

        if let Some(date) = report_date
            && date > Utc::now()
        {
            return Err(ApiError::BadRequest(
                "Report date cannot be in the future".to_string(),
            ));
        }

        Ok(UpdateReportInput {
            title: self.title.map(|t| t.trim().to_string()),
            description: self.description.map(|d| d.trim().to_string()),
            report_date,
            tags: self
                .tags
                .map(|tags| tags.into_iter().map(|t| t.trim().to_string()).collect()),
            is_public: self.is_public,
            metadata: self.metadata,
        })
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompareReportsValidator {
    #[validate(length(min = 2, max = 5, message = "Please provide 2-5 report IDs for comparison"))]
    pub report_ids: Vec<String>,
}
