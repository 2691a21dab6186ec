use axum::{
    Extension,
    extract::{Path, State},
};
use pearl_core::domain::{
    analysis::{ports::AnalysisService, value_objects::HormoneInsights},
    authentication::value_objects::Identity,
};

use crate::application::http::server::{
    api_entities::{api_error::ApiError, response::Response},
    app_state::AppState,
};

#[utoipa::path(
    get,
    path = "/insights/{report_id}/{hormone_name}",
    tag = "analysis",
    summary = "Insights for one hormone",
    params(
        ("report_id" = String, Path, description = "Public report ID"),
        ("hormone_name" = String, Path, description = "Hormone short name, e.g. TSH"),
    ),
    responses(
        (status = 200, body = HormoneInsights),
        (status = 404, description = "No analysis, or hormone not found in report")
    )
)]
pub async fn hormone_insights(
    Path((report_id, hormone_name)): Path<(String, String)>,
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> Result<Response<HormoneInsights>, ApiError> {
    let insights = state
        .service
        .hormone_insights(identity, report_id, hormone_name)
        .await
        .map_err(ApiError::from)?;

    Ok(Response::OK(insights))
}
