//! Client-facing request errors.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Errors returned to the HTTP client as non-2xx responses.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Body missing, not JSON, or `message` absent, non-string or blank.
    #[error("Invalid message")]
    InvalidMessage,
}

impl ApiError {
    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::InvalidMessage => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(serde_json::json!({ "error": self.to_string() }));
        (self.status(), body).into_response()
    }
}
