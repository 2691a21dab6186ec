use axum::{Extension, Json, extract::State};
use pearl_core::domain::{authentication::value_objects::Identity, user::ports::UserService};

use crate::application::http::{
    server::{
        api_entities::{api_error::ApiError, response::Response},
        app_state::AppState,
    },
    user::validators::ConfirmEmailValidator,
};

#[utoipa::path(
    delete,
    path = "/account",
    tag = "user",
    summary = "Delete the account after confirming the email address",
    request_body = ConfirmEmailValidator,
    responses(
        (status = 200, description = "Account deleted successfully"),
        (status = 400, description = "Email confirmation does not match")
    )
)]
pub async fn delete_account(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Json(payload): Json<ConfirmEmailValidator>,
) -> Result<Response<()>, ApiError> {
    UserService::delete_account(&state.service, identity, payload.confirm_email)
        .await
        .map_err(ApiError::from)?;

    Ok(Response::Message("Account deleted successfully".to_string()))
}
