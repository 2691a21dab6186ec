use axum::{Extension, extract::State};
use pearl_core::domain::{
    authentication::value_objects::Identity,
    report::{ports::ReportService, value_objects::ReportComparison},
};

use crate::application::http::{
    report::validators::CompareReportsValidator,
    server::{
        api_entities::{
            api_error::{ApiError, ValidateJson},
            response::Response,
        },
        app_state::AppState,
    },
};

#[utoipa::path(
    post,
    path = "/compare",
    tag = "reports",
    summary = "Compare analyzed reports",
    request_body = CompareReportsValidator,
    responses(
        (status = 200, body = ReportComparison),
        (status = 400, description = "Need 2-5 analyzed reports"),
    )
)]
pub async fn compare_reports(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    ValidateJson(payload): ValidateJson<CompareReportsValidator>,
) -> Result<Response<ReportComparison>, ApiError> {
    let comparison = state
        .service
        .compare_reports(identity, payload.report_ids)
        .await
        .map_err(ApiError::from)?;

    Ok(Response::OK(comparison))
}
