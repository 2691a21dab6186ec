use axum::{
    Json, RequestPartsExt,
    extract::{Request, State},
    http::{StatusCode, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use pearl_core::domain::{
    authentication::ports::AuthService, common::entities::app_errors::CoreError,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use super::http::server::app_state::AppState;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("Access token required")]
    MissingToken,
    #[error("Invalid token")]
    InvalidToken,
    #[error("Token expired")]
    TokenExpired,
    #[error("User not found")]
    UserNotFound,
    #[error("Account has been deactivated")]
    AccountDeactivated,
    #[error("Authentication failed")]
    Failed,
}

impl From<CoreError> for AuthError {
    fn from(error: CoreError) -> Self {
        match error {
            CoreError::TokenExpired => AuthError::TokenExpired,
            CoreError::InvalidToken => AuthError::InvalidToken,
            CoreError::UserNotFound => AuthError::UserNotFound,
            CoreError::AccountDeactivated => AuthError::AccountDeactivated,
            other => {
                error!("Failed to authorize request: {}", other);
                AuthError::Failed
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = match self {
            AuthError::Failed => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::UNAUTHORIZED,
        };

        (
            status,
            Json(json!({
                "success": false,
                "message": self.to_string(),
            })),
        )
            .into_response()
    }
}

pub async fn extract_token_from_bearer(parts: &mut Parts) -> Result<String, AuthError> {
    let TypedHeader(Authorization(bearer)) = parts
        .extract::<TypedHeader<Authorization<Bearer>>>()
        .await
        .map_err(|_| AuthError::MissingToken)?;

    let token = bearer.token().trim();
    if token.is_empty() {
        return Err(AuthError::MissingToken);
    }

    Ok(token.to_string())
}

/// Resolves the bearer token into an `Identity` request extension.
pub async fn auth(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let (mut parts, body) = req.into_parts();
    let token = extract_token_from_bearer(&mut parts).await?;

    let identity = state.service.authorize_request(token).await?;

    let mut req = Request::from_parts(parts, body);
    req.extensions_mut().insert(identity);

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Router, http::HeaderValue, routing::get};
    use axum_test::TestServer;
    use serde_json::Value;

    async fn token_only(req: Request) -> Result<String, AuthError> {
        let (mut parts, _) = req.into_parts();
        extract_token_from_bearer(&mut parts).await
    }

    #[tokio::test]
    async fn test_missing_bearer_is_rejected() {
        let app = Router::new().route("/", get(token_only));
        let server = TestServer::new(app).unwrap();

        let response = server.get("/").await;

        response.assert_status_unauthorized();
        let body: Value = response.json();
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Access token required");
    }

    #[tokio::test]
    async fn test_bearer_token_is_extracted() {
        let app = Router::new().route("/", get(token_only));
        let server = TestServer::new(app).unwrap();

        let response = server
            .get("/")
            .authorization_bearer("abc.def.ghi")
            .await;

        response.assert_status_ok();
        response.assert_text("abc.def.ghi");

        server
            .get("/")
            .add_header(
                axum::http::header::AUTHORIZATION,
                HeaderValue::from_static("Basic dXNlcg=="),
            )
            .await
            .assert_status_unauthorized();
    }

    #[test]
    fn test_core_errors_map_to_messages() {
        assert_eq!(AuthError::from(CoreError::TokenExpired), AuthError::TokenExpired);
        assert_eq!(
            AuthError::from(CoreError::AccountDeactivated).to_string(),
            "Account has been deactivated"
        );
        assert_eq!(
            AuthError::from(CoreError::InternalServerError),
            AuthError::Failed
        );
    }
}
