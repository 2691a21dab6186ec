use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response as AxumResponse},
};
use serde::Serialize;

/// Success envelope: `{"success": true, "data": ..., "message"?: ...}`.
#[derive(Debug, Serialize)]
pub struct Envelope<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug)]
pub enum Response<T: Serialize> {
    OK(T),
    Created(T),
    /// Data with a human readable note.
    OKWithMessage(T, String),
    /// Only a message, no data.
    Message(String),
}

impl<T: Serialize> IntoResponse for Response<T> {
    fn into_response(self) -> AxumResponse {
        let (status, data, message) = match self {
            Response::OK(data) => (StatusCode::OK, Some(data), None),
            Response::Created(data) => (StatusCode::CREATED, Some(data), None),
            Response::OKWithMessage(data, message) => (StatusCode::OK, Some(data), Some(message)),
            Response::Message(message) => (StatusCode::OK, None, Some(message)),
        };

        (
            status,
            Json(Envelope {
                success: true,
                data,
                message,
            }),
        )
            .into_response()
    }
}
