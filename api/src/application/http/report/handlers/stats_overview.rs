use axum::{
    Extension,
    extract::{Query, State},
};
use pearl_core::domain::{
    authentication::value_objects::Identity,
    report::{
        ports::ReportService,
        value_objects::{Period, StatsOverview},
    },
};

use crate::application::http::{
    report::validators::PeriodQuery,
    server::{
        api_entities::{api_error::ApiError, response::Response},
        app_state::AppState,
    },
};

#[utoipa::path(
    get,
    path = "/stats/overview",
    tag = "reports",
    summary = "Report statistics for a period",
    params(PeriodQuery),
    responses((status = 200, body = StatsOverview))
)]
pub async fn stats_overview(
    Query(query): Query<PeriodQuery>,
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> Result<Response<StatsOverview>, ApiError> {
    let stats = state
        .service
        .stats_overview(identity, Period::parse(query.period.as_deref()))
        .await
        .map_err(ApiError::from)?;

    Ok(Response::OK(stats))
}
