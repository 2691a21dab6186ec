use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Presence is checked by the service so a missing credential reads as such.
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct GoogleAuthValidator {
    #[serde(default)]
    pub credential: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenValidator {
    #[serde(default)]
    pub refresh_token: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeleteAccountValidator {
    #[serde(default)]
    pub confirm_password: String,
}
