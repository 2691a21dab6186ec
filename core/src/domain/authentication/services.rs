use chrono::Utc;
use tracing::instrument;
use uuid::Uuid;

use crate::domain::{
    analysis::ports::{LLMClient, TextExtractor},
    authentication::{
        ACCESS_TOKEN_LIFETIME, DELETE_ACCOUNT_CONFIRMATION,
        ports::{AuthService, GoogleTokenVerifier, TokenRepository},
        value_objects::{AuthTokens, AuthenticateOutput, Identity, MeOutput},
    },
    common::{entities::app_errors::CoreError, services::Service},
    health::ports::HealthCheckRepository,
    report::ports::ReportRepository,
    storage::ports::{FileStorage, ThumbnailGenerator},
    user::{entities::User, ports::UserRepository},
};

impl<U, RP, HC, LLM, TE, FS, TH, TK, GV> Service<U, RP, HC, LLM, TE, FS, TH, TK, GV>
where
    U: UserRepository,
    RP: ReportRepository,
    HC: HealthCheckRepository,
    LLM: LLMClient,
    TE: TextExtractor,
    FS: FileStorage,
    TH: ThumbnailGenerator,
    TK: TokenRepository,
    GV: GoogleTokenVerifier,
{
    fn issue_tokens(&self, user_id: Uuid) -> Result<AuthTokens, CoreError> {
        Ok(AuthTokens {
            access_token: self.token_repository.issue_access_token(user_id)?,
            refresh_token: self.token_repository.issue_refresh_token(user_id)?,
            expires_in: ACCESS_TOKEN_LIFETIME.to_string(),
        })
    }
}

impl<U, RP, HC, LLM, TE, FS, TH, TK, GV> AuthService for Service<U, RP, HC, LLM, TE, FS, TH, TK, GV>
where
    U: UserRepository,
    RP: ReportRepository,
    HC: HealthCheckRepository,
    LLM: LLMClient,
    TE: TextExtractor,
    FS: FileStorage,
    TH: ThumbnailGenerator,
    TK: TokenRepository,
    GV: GoogleTokenVerifier,
{
    #[instrument(skip(self, credential))]
    async fn authenticate_with_google(
        &self,
        credential: String,
    ) -> Result<AuthenticateOutput, CoreError> {
        if credential.trim().is_empty() {
            return Err(CoreError::MissingCredential);
        }

        let profile = self
            .google_verifier
            .verify(credential, self.google_client_id.clone())
            .await?;

        if !profile.email_verified {
            return Err(CoreError::EmailNotVerified);
        }

        let existing = match self
            .user_repository
            .find_by_google_id(profile.sub.clone())
            .await?
        {
            Some(user) => Some(user),
            None => {
                self.user_repository
                    .find_by_email(profile.email.trim().to_lowercase())
                    .await?
            }
        };

        let user = match existing {
            Some(mut user) => {
                if user.is_deleted {
                    return Err(CoreError::AccountDeactivated);
                }

                let now = Utc::now();
                user.google_id = profile.sub;
                user.name = profile.name.trim().to_string();
                user.avatar = profile.picture;
                user.last_login = now;
                user.updated_at = now;

                self.user_repository.update(user).await?
            }
            None => {
                let user = User::new(profile.sub, profile.email, profile.name, profile.picture);
                let user = self.user_repository.create(user).await?;
                tracing::info!(user_id = %user.id, "new user registered");
                user
            }
        };

        let tokens = self.issue_tokens(user.id)?;
        tracing::info!(user_id = %user.id, "user logged in with google");

        Ok(AuthenticateOutput { user, tokens })
    }

    #[instrument(skip(self, refresh_token))]
    async fn refresh_tokens(&self, refresh_token: String) -> Result<AuthTokens, CoreError> {
        if refresh_token.trim().is_empty() {
            return Err(CoreError::MissingRefreshToken);
        }

        let user_id = self.token_repository.verify_refresh_token(&refresh_token)?;

        let user = self
            .user_repository
            .get_by_id(user_id)
            .await?
            .filter(|u| !u.is_deleted)
            .ok_or(CoreError::InvalidRefreshToken)?;

        self.issue_tokens(user.id)
    }

    #[instrument(skip(self, token))]
    async fn authorize_request(&self, token: String) -> Result<Identity, CoreError> {
        let user_id = self.token_repository.verify_access_token(&token)?;

        let mut user = self
            .user_repository
            .get_by_id(user_id)
            .await?
            .ok_or(CoreError::UserNotFound)?;

        if user.is_deleted {
            return Err(CoreError::AccountDeactivated);
        }

        let now = Utc::now();
        self.user_repository.touch_last_login(user.id, now).await?;
        user.last_login = now;

        Ok(Identity::new(user))
    }

    #[instrument(skip(self, identity), fields(user_id = %identity.id()))]
    async fn logout(&self, identity: Identity) -> Result<(), CoreError> {
        tracing::info!(user_id = %identity.id(), "user logged out");
        Ok(())
    }

    #[instrument(skip(self, identity), fields(user_id = %identity.id()))]
    async fn me(&self, identity: Identity) -> Result<MeOutput, CoreError> {
        let stats = self.report_repository.stats(identity.id()).await?;

        Ok(MeOutput {
            user: identity.into_user(),
            stats,
        })
    }

    #[instrument(skip(self, identity, confirm_password), fields(user_id = %identity.id()))]
    async fn delete_account(
        &self,
        identity: Identity,
        confirm_password: String,
    ) -> Result<(), CoreError> {
        if confirm_password != DELETE_ACCOUNT_CONFIRMATION {
            return Err(CoreError::ConfirmationMismatch(
                "Please confirm account deletion by typing DELETE_MY_ACCOUNT".to_string(),
            ));
        }

        let mut user = identity.into_user();
        user.soft_delete(Utc::now());
        let user = self.user_repository.update(user).await?;

        tracing::info!(user_id = %user.id, "account deleted");
        Ok(())
    }
}
