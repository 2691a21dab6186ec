use axum::{Extension, extract::State};
use pearl_core::domain::authentication::{
    ports::AuthService,
    value_objects::{Identity, MeOutput},
};

use crate::application::http::server::{
    api_entities::{api_error::ApiError, response::Response},
    app_state::AppState,
};

#[utoipa::path(
    get,
    path = "/me",
    tag = "auth",
    summary = "Current user",
    description = "The signed-in user with report statistics.",
    responses((status = 200, body = MeOutput))
)]
pub async fn me(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> Result<Response<MeOutput>, ApiError> {
    let output = state.service.me(identity).await.map_err(ApiError::from)?;

    Ok(Response::OK(output))
}
