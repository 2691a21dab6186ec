use axum::{Json, extract::State};
use pearl_core::domain::health::{
    entities::{DatabaseStats, HealthStatus},
    ports::HealthCheckService,
};

use crate::application::http::server::{
    api_entities::{api_error::ApiError, response::Response},
    app_state::AppState,
};

/// Always answers 200; a broken database shows up in the body.
#[utoipa::path(
    get,
    path = "",
    tag = "health",
    summary = "Liveness and database latency",
    responses((status = 200, body = HealthStatus))
)]
pub async fn health(State(state): State<AppState>) -> Json<HealthStatus> {
    Json(state.service.health().await)
}

#[utoipa::path(
    get,
    path = "/stats",
    tag = "health",
    summary = "Row counts per collection",
    responses(
        (status = 200, body = DatabaseStats),
        (status = 500, description = "Database unavailable")
    )
)]
pub async fn database_stats(
    State(state): State<AppState>,
) -> Result<Response<DatabaseStats>, ApiError> {
    let stats = state
        .service
        .database_stats()
        .await
        .map_err(ApiError::from)?;

    Ok(Response::OK(stats))
}
