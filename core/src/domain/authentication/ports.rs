use std::future::Future;

use uuid::Uuid;

use crate::domain::common::entities::app_errors::CoreError;

use super::value_objects::{AuthTokens, AuthenticateOutput, GoogleProfile, Identity, MeOutput};

/// Issues and verifies the locally signed access and refresh tokens.
#[cfg_attr(test, mockall::automock)]
pub trait TokenRepository: Send + Sync {
    fn issue_access_token(&self, user_id: Uuid) -> Result<String, CoreError>;

    fn issue_refresh_token(&self, user_id: Uuid) -> Result<String, CoreError>;

    /// Returns the user id, `TokenExpired` or `InvalidToken`.
    fn verify_access_token(&self, token: &str) -> Result<Uuid, CoreError>;

    /// Returns the user id or `InvalidRefreshToken`.
    fn verify_refresh_token(&self, token: &str) -> Result<Uuid, CoreError>;
}

/// Verifies ID tokens minted by Google Sign-In.
#[cfg_attr(test, mockall::automock)]
pub trait GoogleTokenVerifier: Send + Sync {
    fn verify(
        &self,
        id_token: String,
        audience: String,
    ) -> impl Future<Output = Result<GoogleProfile, CoreError>> + Send;
}

#[cfg_attr(test, mockall::automock)]
pub trait AuthService: Send + Sync {
    fn authenticate_with_google(
        &self,
        credential: String,
    ) -> impl Future<Output = Result<AuthenticateOutput, CoreError>> + Send;

    fn refresh_tokens(
        &self,
        refresh_token: String,
    ) -> impl Future<Output = Result<AuthTokens, CoreError>> + Send;

    /// Resolves a bearer access token to the identity making the request.
    fn authorize_request(
        &self,
        token: String,
    ) -> impl Future<Output = Result<Identity, CoreError>> + Send;

    fn logout(&self, identity: Identity) -> impl Future<Output = Result<(), CoreError>> + Send;

    fn me(&self, identity: Identity) -> impl Future<Output = Result<MeOutput, CoreError>> + Send;

    fn delete_account(
        &self,
        identity: Identity,
        confirm_password: String,
    ) -> impl Future<Output = Result<(), CoreError>> + Send;
}
