use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{report::value_objects::ReportStats, user::entities::User};

/// The authenticated user attached to a request.
#[derive(Debug, Clone, PartialEq)]
pub struct Identity {
    user: User,
}

impl Identity {
    pub fn new(user: User) -> Self {
        Self { user }
    }

    pub fn id(&self) -> Uuid {
        self.user.id
    }

    pub fn user(&self) -> &User {
        &self.user
    }

    pub fn into_user(self) -> User {
        self.user
    }
}

/// Claims carried by a verified Google ID token.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GoogleProfile {
    pub sub: String,
    pub email: String,
    pub email_verified: bool,
    pub name: String,
    pub picture: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthTokens {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct AuthenticateOutput {
    pub user: User,
    pub tokens: AuthTokens,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct MeOutput {
    pub user: User,
    pub stats: ReportStats,
}
