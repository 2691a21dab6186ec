use axum::extract::State;
use pearl_core::domain::authentication::{ports::AuthService, value_objects::AuthTokens};

use crate::application::http::{
    authentication::validators::RefreshTokenValidator,
    server::{
        api_entities::{
            api_error::{ApiError, ValidateJson},
            response::Response,
        },
        app_state::AppState,
    },
};

#[utoipa::path(
    post,
    path = "/refresh",
    tag = "auth",
    summary = "Refresh tokens",
    request_body = RefreshTokenValidator,
    responses(
        (status = 200, body = AuthTokens),
        (status = 400, description = "Refresh token is required"),
        (status = 401, description = "Invalid or expired refresh token")
    )
)]
pub async fn refresh_token(
    State(state): State<AppState>,
    ValidateJson(payload): ValidateJson<RefreshTokenValidator>,
) -> Result<Response<AuthTokens>, ApiError> {
    let tokens = state
        .service
        .refresh_tokens(payload.refresh_token.unwrap_or_default())
        .await
        .map_err(ApiError::from)?;

    Ok(Response::OKWithMessage(
        tokens,
        "Token refreshed successfully".to_string(),
    ))
}
