use axum::{Extension, extract::State};
use pearl_core::domain::authentication::{ports::AuthService, value_objects::Identity};

use crate::application::http::{
    authentication::validators::DeleteAccountValidator,
    server::{
        api_entities::{
            api_error::{ApiError, ValidateJson},
            response::Response,
        },
        app_state::AppState,
    },
};

#[utoipa::path(
    delete,
    path = "/account",
    tag = "auth",
    summary = "Delete account",
    description = "Soft-deletes the account. `confirmPassword` must be `DELETE_MY_ACCOUNT`.",
    request_body = DeleteAccountValidator,
    responses(
        (status = 200, description = "Account deleted successfully"),
        (status = 400, description = "Confirmation text did not match")
    )
)]
pub async fn delete_account(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    ValidateJson(payload): ValidateJson<DeleteAccountValidator>,
) -> Result<Response<()>, ApiError> {
    AuthService::delete_account(&state.service, identity, payload.confirm_password)
        .await
        .map_err(ApiError::from)?;

    Ok(Response::Message("Account deleted successfully".to_string()))
}
