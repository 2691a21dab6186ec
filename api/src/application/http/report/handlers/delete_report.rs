use axum::{
    Extension,
    extract::{Path, State},
};
use pearl_core::domain::{authentication::value_objects::Identity, report::ports::ReportService};

use crate::application::http::server::{
    api_entities::{api_error::ApiError, response::Response},
    app_state::AppState,
};

#[utoipa::path(
    delete,
    path = "/{report_id}",
    tag = "reports",
    summary = "Delete a report and its files",
    params(("report_id" = String, Path, description = "Public report ID")),
    responses(
        (status = 200, description = "Report deleted successfully"),
        (status = 404, description = "Report not found")
    )
)]
pub async fn delete_report(
    Path(report_id): Path<String>,
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> Result<Response<()>, ApiError> {
    state
        .service
        .delete_report(identity, report_id)
        .await
        .map_err(ApiError::from)?;

    Ok(Response::Message("Report deleted successfully".to_string()))
}
