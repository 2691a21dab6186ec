use axum::{Extension, extract::State};
use pearl_core::domain::{
    authentication::value_objects::Identity,
    user::{entities::UserPreferences, ports::UserService},
};

use crate::application::http::{
    server::{
        api_entities::{
            api_error::{ApiError, ValidateJson},
            response::Response,
        },
        app_state::AppState,
    },
    user::validators::UpdatePreferencesValidator,
};

#[utoipa::path(
    put,
    path = "/preferences",
    tag = "user",
    summary = "Update notification, privacy and locale preferences",
    request_body = UpdatePreferencesValidator,
    responses(
        (status = 200, body = UserPreferences),
        (status = 400, description = "Validation failed")
    )
)]
pub async fn update_preferences(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    ValidateJson(payload): ValidateJson<UpdatePreferencesValidator>,
) -> Result<Response<UserPreferences>, ApiError> {
    let preferences = payload.apply(identity.user().preferences.clone());

    let preferences = state
        .service
        .update_preferences(identity, preferences)
        .await
        .map_err(ApiError::from)?;

    Ok(Response::OKWithMessage(
        preferences,
        "Preferences updated successfully".to_string(),
    ))
}
