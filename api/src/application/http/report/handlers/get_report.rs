use axum::{
    Extension,
    extract::{Path, State},
};
use pearl_core::domain::{
    authentication::value_objects::Identity,
    report::{entities::Report, ports::ReportService},
};

use crate::application::http::server::{
    api_entities::{api_error::ApiError, response::Response},
    app_state::AppState,
};

#[utoipa::path(
    get,
    path = "/{report_id}",
    tag = "reports",
    summary = "Get a report",
    params(("report_id" = String, Path, description = "Public report ID")),
    responses(
        (status = 200, body = Report),
        (status = 404, description = "Report not found")
    )
)]
pub async fn get_report(
    Path(report_id): Path<String>,
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> Result<Response<Report>, ApiError> {
    let report = state
        .service
        .get_report(identity, report_id)
        .await
        .map_err(ApiError::from)?;

    Ok(Response::OK(report))
}
