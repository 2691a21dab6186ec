use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::{error, warn};

use crate::domain::{
    authentication::{ports::GoogleTokenVerifier, value_objects::GoogleProfile},
    common::entities::app_errors::CoreError,
};

const TOKENINFO_URL: &str = "https://oauth2.googleapis.com/tokeninfo";
const GOOGLE_ISSUERS: [&str; 2] = ["accounts.google.com", "https://accounts.google.com"];

/// Verifies ID tokens against Google's `tokeninfo` endpoint.
#[derive(Debug, Clone)]
pub struct GoogleTokenInfoVerifier {
    client: Client,
    endpoint: String,
}

#[derive(Debug, Deserialize)]
struct TokenInfo {
    sub: String,
    aud: String,
    iss: Option<String>,
    email: Option<String>,
    /// Google answers with either a boolean or the string "true".
    email_verified: Option<Value>,
    name: Option<String>,
    picture: Option<String>,
}

impl TokenInfo {
    fn is_email_verified(&self) -> bool {
        match &self.email_verified {
            Some(Value::Bool(verified)) => *verified,
            Some(Value::String(verified)) => verified.eq_ignore_ascii_case("true"),
            _ => false,
        }
    }

    fn into_profile(self, audience: &str) -> Result<GoogleProfile, CoreError> {
        if self.aud != audience {
            warn!(aud = %self.aud, "Google token issued for another client");
            return Err(CoreError::InvalidCredential);
        }

        if let Some(iss) = self.iss.as_deref()
            && !GOOGLE_ISSUERS.contains(&iss)
        {
            warn!(iss, "Google token has an unexpected issuer");
            return Err(CoreError::InvalidCredential);
        }

        let email_verified = self.is_email_verified();
        let email = self.email.ok_or(CoreError::InvalidCredential)?;
        let name = self
            .name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| email.split('@').next().unwrap_or_default().to_string());

        Ok(GoogleProfile {
            sub: self.sub,
            email,
            email_verified,
            name,
            picture: self.picture,
        })
    }
}

impl GoogleTokenInfoVerifier {
    pub fn new() -> Self {
        Self::with_endpoint(TOKENINFO_URL.to_string())
    }

    pub fn with_endpoint(endpoint: String) -> Self {
        Self {
            client: Client::new(),
            endpoint,
        }
    }
}

impl Default for GoogleTokenInfoVerifier {
    fn default() -> Self {
        Self::new()
    }
}

impl GoogleTokenVerifier for GoogleTokenInfoVerifier {
    async fn verify(&self, id_token: String, audience: String) -> Result<GoogleProfile, CoreError> {
        let url = format!(
            "{}?id_token={}",
            self.endpoint,
            urlencoding::encode(&id_token)
        );

        let response = self.client.get(&url).send().await.map_err(|e| {
            error!("Google tokeninfo request failed: {}", e);
            CoreError::ExternalServiceError(format!("Google verification failed: {}", e))
        })?;

        if !response.status().is_success() {
            warn!(status = %response.status(), "Google rejected the ID token");
            return Err(CoreError::InvalidCredential);
        }

        let info: TokenInfo = response.json().await.map_err(|e| {
            error!("Failed to parse Google tokeninfo response: {}", e);
            CoreError::InvalidCredential
        })?;

        info.into_profile(&audience)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn info(value: Value) -> TokenInfo {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_string_email_verified() {
        let profile = info(json!({
            "sub": "123",
            "aud": "client",
            "iss": "https://accounts.google.com",
            "email": "jane@example.com",
            "email_verified": "true",
            "name": "Jane"
        }))
        .into_profile("client")
        .unwrap();

        assert!(profile.email_verified);
        assert_eq!(profile.sub, "123");
        assert_eq!(profile.name, "Jane");
    }

    #[test]
    fn test_wrong_audience_is_rejected() {
        let result = info(json!({
            "sub": "123",
            "aud": "someone-else",
            "email": "jane@example.com",
            "email_verified": true
        }))
        .into_profile("client");

        assert_eq!(result.unwrap_err(), CoreError::InvalidCredential);
    }

    #[test]
    fn test_missing_name_uses_mailbox() {
        let profile = info(json!({
            "sub": "123",
            "aud": "client",
            "email": "jane@example.com",
            "email_verified": false
        }))
        .into_profile("client")
        .unwrap();

        assert!(!profile.email_verified);
        assert_eq!(profile.name, "jane");
    }
}
