use axum::{
    Extension,
    extract::{Path, State},
};
use pearl_core::domain::{
    analysis::{ports::AnalysisService, value_objects::AnalysisOutcome},
    authentication::value_objects::Identity,
};

use crate::application::http::server::{
    api_entities::{api_error::ApiError, response::Response},
    app_state::AppState,
};

#[utoipa::path(
    post,
    path = "/analyze/{report_id}",
    tag = "analysis",
    summary = "Analyze a report",
    description = "Extracts text from every file, parses hormone readings, asks the language model for insights and builds charts. Falls back to a basic analysis when the model is unavailable.",
    params(("report_id" = String, Path, description = "Public report ID")),
    responses(
        (status = 200, body = AnalysisOutcome),
        (status = 404, description = "Report not found"),
        (status = 409, description = "Report is already being processed"),
        (status = 500, description = "Analysis failed")
    )
)]
pub async fn analyze_report(
    Path(report_id): Path<String>,
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> Result<Response<AnalysisOutcome>, ApiError> {
    let outcome = state
        .service
        .analyze_report(identity, report_id)
        .await
        .map_err(ApiError::from)?;

    Ok(Response::OKWithMessage(
        outcome,
        "Analysis completed successfully".to_string(),
    ))
}
