use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use pearl_core::domain::common::entities::app_errors::CoreError;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::json;
use thiserror::Error;
use utoipa::ToSchema;
use validator::{Validate, ValidationErrors, ValidationErrorsKind};

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("Validation failed")]
    ValidationFailed(Vec<FieldError>),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    PayloadTooLarge(String),

    #[error("{0}")]
    BadGateway(String),

    #[error("{0}")]
    InternalServerError(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) | ApiError::ValidationFailed(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::BadGateway(_) => StatusCode::BAD_GATEWAY,
            ApiError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            ApiError::ValidationFailed(errors) => json!({
                "success": false,
                "message": "Validation failed",
                "errors": errors,
            }),
            other => json!({
                "success": false,
                "message": other.to_string(),
            }),
        };

        (status, Json(body)).into_response()
    }
}

impl From<CoreError> for ApiError {
    fn from(error: CoreError) -> Self {
        let message = error.to_string();

        match error {
            CoreError::NotFound
            | CoreError::ReportNotFound
            | CoreError::UserNotFound
            | CoreError::FileNotFound
            | CoreError::ThumbnailNotFound
            | CoreError::AnalysisNotAvailable
            | CoreError::HormoneNotFound => ApiError::NotFound(message),

            CoreError::Validation(reason) => ApiError::BadRequest(reason),
            CoreError::ConfirmationMismatch(reason) | CoreError::InvalidComparison(reason) => {
                ApiError::BadRequest(reason)
            }
            CoreError::InvalidCredential => ApiError::BadRequest("Invalid Google token".to_string()),
            CoreError::Invalid
            | CoreError::MissingCredential
            | CoreError::MissingRefreshToken
            | CoreError::EmailNotVerified
            | CoreError::NoFilesUploaded
            | CoreError::TooManyFiles(_)
            | CoreError::UnsupportedFileType(_)
            | CoreError::InvalidFileIndex
            | CoreError::UnsupportedFormat(_) => ApiError::BadRequest(message),

            CoreError::InvalidToken
            | CoreError::TokenExpired
            | CoreError::AccountDeactivated => ApiError::Unauthorized(message),
            CoreError::InvalidRefreshToken => {
                ApiError::Unauthorized("Invalid or expired refresh token".to_string())
            }

            CoreError::Forbidden(reason) => ApiError::Forbidden(reason),
            CoreError::FileTooLarge => ApiError::PayloadTooLarge(message),
            CoreError::AlreadyProcessing => ApiError::Conflict(message),
            CoreError::ExternalServiceError(_) => ApiError::BadGateway(message),

            CoreError::AnalysisFailed(_) => ApiError::InternalServerError("Analysis failed".to_string()),
            CoreError::ExtractionError(_)
            | CoreError::StorageError(_)
            | CoreError::InternalServerError => {
                tracing::error!("request failed: {}", message);
                ApiError::InternalServerError("Internal server error".to_string())
            }
        }
    }
}

fn collect_field_errors(prefix: &str, errors: &ValidationErrors, out: &mut Vec<FieldError>) {
    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{prefix}.{field}")
        };

        match kind {
            ValidationErrorsKind::Field(items) => {
                out.extend(items.iter().map(|e| FieldError {
                    field: path.clone(),
                    message: e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("{path} is invalid")),
                }));
            }
            ValidationErrorsKind::Struct(nested) => collect_field_errors(&path, nested, out),
            ValidationErrorsKind::List(items) => {
                for (index, nested) in items {
                    collect_field_errors(&format!("{path}[{index}]"), nested, out);
                }
            }
        }
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        let mut fields = Vec::new();
        collect_field_errors("", &errors, &mut fields);
        fields.sort_by(|a, b| a.field.cmp(&b.field));

        ApiError::ValidationFailed(fields)
    }
}

/// JSON body that is deserialized and then checked with `validator`.
pub struct ValidateJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidateJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;

        value.validate()?;

        Ok(ValidateJson(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Router, routing::post};
    use axum_test::TestServer;
    use serde::Deserialize;
    use serde_json::Value;

    #[derive(Debug, Deserialize, Validate)]
    struct Payload {
        #[validate(length(min = 1, max = 5, message = "Title must be between 1 and 5 characters"))]
        title: String,
    }

    #[test]
    fn test_core_error_statuses() {
        let cases = [
            (CoreError::ReportNotFound, StatusCode::NOT_FOUND),
            (CoreError::AlreadyProcessing, StatusCode::CONFLICT),
            (CoreError::FileTooLarge, StatusCode::PAYLOAD_TOO_LARGE),
            (CoreError::TokenExpired, StatusCode::UNAUTHORIZED),
            (CoreError::InvalidFileIndex, StatusCode::BAD_REQUEST),
            (CoreError::InvalidCredential, StatusCode::BAD_REQUEST),
            (
                CoreError::AnalysisFailed("llm".to_string()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, status) in cases {
            assert_eq!(ApiError::from(error).status(), status);
        }
    }

    #[tokio::test]
    async fn test_error_body() {
        let app = Router::new().route(
            "/",
            post(|| async { Err::<(), ApiError>(CoreError::ReportNotFound.into()) }),
        );
        let server = TestServer::new(app).unwrap();

        let response = server.post("/").await;

        response.assert_status_not_found();
        let body: Value = response.json();
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Report not found");
    }

    #[tokio::test]
    async fn test_validate_json_lists_field_errors() {
        let app = Router::new().route(
            "/",
            post(|ValidateJson(payload): ValidateJson<Payload>| async move { payload.title }),
        );
        let server = TestServer::new(app).unwrap();

        let response = server
            .post("/")
            .json(&serde_json::json!({"title": "far too long"}))
            .await;

        response.assert_status_bad_request();
        let body: Value = response.json();
        assert_eq!(body["message"], "Validation failed");
        assert_eq!(body["errors"][0]["field"], "title");
        assert_eq!(
            body["errors"][0]["message"],
            "Title must be between 1 and 5 characters"
        );

        server
            .post("/")
            .json(&serde_json::json!({"title": "ok"}))
            .await
            .assert_status_ok();
    }
}
