use chrono::{Duration, Utc};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};
use uuid::Uuid;

use crate::domain::{
    authentication::ports::TokenRepository, common::entities::app_errors::CoreError,
};

const ACCESS_TOKEN_DAYS: i64 = 7;
const REFRESH_TOKEN_DAYS: i64 = 30;
const REFRESH_TOKEN_TYPE: &str = "refresh";

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenClaims {
    user_id: Uuid,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    token_type: Option<String>,
    iat: i64,
    exp: i64,
}

/// HS256 tokens: access tokens with the main secret, refresh tokens with the
/// refresh secret.
#[derive(Clone)]
pub struct JwtTokenRepository {
    access_encoding: EncodingKey,
    access_decoding: DecodingKey,
    refresh_encoding: EncodingKey,
    refresh_decoding: DecodingKey,
}

impl JwtTokenRepository {
    pub fn new(secret: &str, refresh_secret: Option<&str>) -> Self {
        let refresh_secret = refresh_secret.filter(|s| !s.is_empty()).unwrap_or(secret);

        Self {
            access_encoding: EncodingKey::from_secret(secret.as_bytes()),
            access_decoding: DecodingKey::from_secret(secret.as_bytes()),
            refresh_encoding: EncodingKey::from_secret(refresh_secret.as_bytes()),
            refresh_decoding: DecodingKey::from_secret(refresh_secret.as_bytes()),
        }
    }

    fn sign(
        &self,
        key: &EncodingKey,
        user_id: Uuid,
        token_type: Option<&str>,
        lifetime: Duration,
    ) -> Result<String, CoreError> {
        let now = Utc::now();
        let claims = TokenClaims {
            user_id,
            token_type: token_type.map(str::to_string),
            iat: now.timestamp(),
            exp: (now + lifetime).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, key).map_err(|e| {
            error!("Failed to sign token: {}", e);
            CoreError::InternalServerError
        })
    }

    fn validation() -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "iat"]);
        validation
    }
}

impl TokenRepository for JwtTokenRepository {
    fn issue_access_token(&self, user_id: Uuid) -> Result<String, CoreError> {
        self.sign(
            &self.access_encoding,
            user_id,
            None,
            Duration::days(ACCESS_TOKEN_DAYS),
        )
    }

    fn issue_refresh_token(&self, user_id: Uuid) -> Result<String, CoreError> {
        self.sign(
            &self.refresh_encoding,
            user_id,
            Some(REFRESH_TOKEN_TYPE),
            Duration::days(REFRESH_TOKEN_DAYS),
        )
    }

    fn verify_access_token(&self, token: &str) -> Result<Uuid, CoreError> {
        let data = decode::<TokenClaims>(token, &self.access_decoding, &Self::validation())
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => CoreError::TokenExpired,
                _ => {
                    debug!("rejected access token: {}", e);
                    CoreError::InvalidToken
                }
            })?;

        if data.claims.token_type.is_some() {
            return Err(CoreError::InvalidToken);
        }

        Ok(data.claims.user_id)
    }

    fn verify_refresh_token(&self, token: &str) -> Result<Uuid, CoreError> {
        let data = decode::<TokenClaims>(token, &self.refresh_decoding, &Self::validation())
            .map_err(|e| {
                debug!("rejected refresh token: {}", e);
                CoreError::InvalidRefreshToken
            })?;

        if data.claims.token_type.as_deref() != Some(REFRESH_TOKEN_TYPE) {
            return Err(CoreError::InvalidRefreshToken);
        }

        Ok(data.claims.user_id)
    }
}
