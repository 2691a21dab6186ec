use axum::{
    Extension,
    extract::{Path, State},
};
use pearl_core::domain::{
    authentication::value_objects::Identity,
    report::{entities::Report, ports::ReportService},
};

use crate::application::http::{
    report::validators::UpdateReportValidator,
    server::{
        api_entities::{
            api_error::{ApiError, ValidateJson},
            response::Response,
        },
        app_state::AppState,
    },
};

#[utoipa::path(
    put,
    path = "/{report_id}",
    tag = "reports",
    summary = "Update report details",
    params(("report_id" = String, Path, description = "Public report ID")),
    request_body = UpdateReportValidator,
    responses(
        (status = 200, body = Report),
        (status = 400, description = "Validation failed"),
        (status = 404, description = "Report not found")
    )
)]
pub async fn update_report(
    Path(report_id): Path<String>,
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    ValidateJson(payload): ValidateJson<UpdateReportValidator>,
) -> Result<Response<Report>, ApiError> {
    let input = payload.into_input()?;

    let report = state
        .service
        .update_report(identity, report_id, input)
        .await
        .map_err(ApiError::from)?;

    Ok(Response::OKWithMessage(
        report,
        "Report updated successfully".to_string(),
    ))
}
