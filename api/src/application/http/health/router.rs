use axum::{Router, routing::get};
use utoipa::OpenApi;

use crate::application::http::server::app_state::AppState;

use super::handlers::{__path_database_stats, __path_health, database_stats, health};

#[derive(OpenApi)]
#[openapi(paths(health, database_stats))]
pub struct HealthApiDoc;

pub fn health_routes(root_path: &str) -> Router<AppState> {
    Router::new()
        .route(&format!("{root_path}/health"), get(health))
        .route(&format!("{root_path}/health/stats"), get(database_stats))
}
