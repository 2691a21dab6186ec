use axum::Extension;
use pearl_core::domain::{authentication::value_objects::Identity, user::entities::User};

use crate::application::http::server::api_entities::{api_error::ApiError, response::Response};

#[utoipa::path(
    get,
    path = "/verify",
    tag = "auth",
    summary = "Verify access token",
    responses(
        (status = 200, body = User),
        (status = 401, description = "Invalid or expired token")
    )
)]
pub async fn verify(Extension(identity): Extension<Identity>) -> Result<Response<User>, ApiError> {
    Ok(Response::OKWithMessage(
        identity.into_user(),
        "Token is valid".to_string(),
    ))
}
