use axum::{Extension, extract::State};
use pearl_core::domain::authentication::{ports::AuthService, value_objects::Identity};

use crate::application::http::server::{
    api_entities::{api_error::ApiError, response::Response},
    app_state::AppState,
};

#[utoipa::path(
    post,
    path = "/logout",
    tag = "auth",
    summary = "Log out",
    description = "Tokens are stateless, so this only records the event. Clients drop their tokens.",
    responses((status = 200, description = "Logged out successfully"))
)]
pub async fn logout(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> Result<Response<()>, ApiError> {
    state.service.logout(identity).await.map_err(ApiError::from)?;

    Ok(Response::Message("Logged out successfully".to_string()))
}
