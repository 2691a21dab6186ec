use axum::{Extension, extract::State};
use pearl_core::domain::{
    authentication::value_objects::Identity,
    user::{entities::User, ports::UserService},
};

use crate::application::http::{
    server::{
        api_entities::{
            api_error::{ApiError, ValidateJson},
            response::Response,
        },
        app_state::AppState,
    },
    user::validators::UpdateProfileValidator,
};

#[utoipa::path(
    put,
    path = "/profile",
    tag = "user",
    summary = "Update name, date of birth and health profile",
    request_body = UpdateProfileValidator,
    responses(
        (status = 200, body = User),
        (status = 400, description = "Validation failed")
    )
)]
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    ValidateJson(payload): ValidateJson<UpdateProfileValidator>,
) -> Result<Response<User>, ApiError> {
    let input = payload.into_input(identity.user().profile.clone());

    let user = state
        .service
        .update_profile(identity, input)
        .await
        .map_err(ApiError::from)?;

    Ok(Response::OKWithMessage(
        user,
        "Profile updated successfully".to_string(),
    ))
}
