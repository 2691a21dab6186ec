use axum::{
    Extension,
    extract::{Path, State},
};
use pearl_core::domain::{
    analysis::{ports::AnalysisService, value_objects::AnalysisResults},
    authentication::value_objects::Identity,
};

use crate::application::http::server::{
    api_entities::{api_error::ApiError, response::Response},
    app_state::AppState,
};

#[utoipa::path(
    get,
    path = "/results/{report_id}",
    tag = "analysis",
    summary = "Analysis results",
    params(("report_id" = String, Path, description = "Public report ID")),
    responses(
        (status = 200, body = AnalysisResults),
        (status = 404, description = "Report not found")
    )
)]
pub async fn get_results(
    Path(report_id): Path<String>,
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> Result<Response<AnalysisResults>, ApiError> {
    let results = state
        .service
        .get_results(identity, report_id)
        .await
        .map_err(ApiError::from)?;

    Ok(Response::OK(results))
}
