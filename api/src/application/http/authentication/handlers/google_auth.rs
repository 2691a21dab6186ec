use axum::extract::State;
use pearl_core::domain::authentication::{ports::AuthService, value_objects::AuthenticateOutput};

use crate::application::http::{
    authentication::validators::GoogleAuthValidator,
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
    path = "/google",
    tag = "auth",
    summary = "Sign in with Google",
    description = "Exchanges a Google ID token for Pearl access and refresh tokens, creating the account on first sign-in.",
    request_body = GoogleAuthValidator,
    responses(
        (status = 200, body = AuthenticateOutput),
        (status = 400, description = "Missing, invalid or unverified credential"),
        (status = 401, description = "Account has been deactivated")
    )
)]
pub async fn google_auth(
    State(state): State<AppState>,
    ValidateJson(payload): ValidateJson<GoogleAuthValidator>,
) -> Result<Response<AuthenticateOutput>, ApiError> {
    let output = state
        .service
        .authenticate_with_google(payload.credential.unwrap_or_default())
        .await
        .map_err(ApiError::from)?;

    Ok(Response::OKWithMessage(output, "Login successful".to_string()))
}
