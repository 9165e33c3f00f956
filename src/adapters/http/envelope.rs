use axum::{Json, http::StatusCode, response::{IntoResponse, Response}};
use serde::Serialize;

use crate::app_error::ErrorCode;

/// Uniform response body: `{ data, error, message }`.
///
/// `error` carries the stable error code and is null on success.
#[derive(Debug, Serialize)]
pub struct ApiEnvelope<T: Serialize> {
    pub data: Option<T>,
    pub error: Option<&'static str>,
    pub message: String,
}

impl<T: Serialize> ApiEnvelope<T> {
    pub fn ok(data: T, message: impl Into<String>) -> Self {
        Self {
            data: Some(data),
            error: None,
            message: message.into(),
        }
    }
}

impl ApiEnvelope<()> {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            data: None,
            error: None,
            message: message.into(),
        }
    }

    pub fn error(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            data: None,
            error: Some(code.as_str()),
            message: message.into(),
        }
    }
}

/// Success bodies are always 200; errors go through `AppError`.
impl<T: Serialize> IntoResponse for ApiEnvelope<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}
