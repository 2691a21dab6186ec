use axum::{Extension, extract::State};
use pearl_core::domain::{
    authentication::value_objects::Identity,
    user::{ports::UserService, value_objects::ProfileView},
};

use crate::application::http::server::{
    api_entities::{api_error::ApiError, response::Response},
    app_state::AppState,
};

#[utoipa::path(
    get,
    path = "/profile",
    tag = "user",
    summary = "Profile with age, membership length and report stats",
    responses((status = 200, body = ProfileView))
)]
pub async fn get_profile(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> Result<Response<ProfileView>, ApiError> {
    let profile = state
        .service
        .get_profile(identity)
        .await
        .map_err(ApiError::from)?;

    Ok(Response::OK(profile))
}
