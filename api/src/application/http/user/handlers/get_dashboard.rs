use axum::{Extension, extract::State};
use pearl_core::domain::{
    authentication::value_objects::Identity,
    user::{ports::UserService, value_objects::Dashboard},
};

use crate::application::http::server::{
    api_entities::{api_error::ApiError, response::Response},
    app_state::AppState,
};

#[utoipa::path(
    get,
    path = "/dashboard",
    tag = "user",
    summary = "Dashboard summary",
    description = "Statistics, the five most recent reports, the latest hormone values and insights, and up to twelve trend points.",
    responses((status = 200, body = Dashboard))
)]
pub async fn get_dashboard(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> Result<Response<Dashboard>, ApiError> {
    let dashboard = state
        .service
        .get_dashboard(identity)
        .await
        .map_err(ApiError::from)?;

    Ok(Response::OK(dashboard))
}
