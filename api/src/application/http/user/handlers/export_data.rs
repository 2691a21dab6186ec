use axum::{Extension, extract::State};
use pearl_core::domain::{
    authentication::value_objects::Identity,
    user::{ports::UserService, value_objects::UserExport},
};

use crate::application::http::server::{
    api_entities::{api_error::ApiError, response::Response},
    app_state::AppState,
};

#[utoipa::path(
    get,
    path = "/export",
    tag = "user",
    summary = "Export the user record and every report",
    responses((status = 200, body = UserExport))
)]
pub async fn export_data(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> Result<Response<UserExport>, ApiError> {
    let export = state
        .service
        .export_data(identity)
        .await
        .map_err(ApiError::from)?;

    Ok(Response::OK(export))
}
