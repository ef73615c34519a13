use ab_core::Error;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub message: String,
}

/// A failed request, rendered as `{error, message}`.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    body: ErrorBody,
}

impl ApiError {
    pub fn new(status: StatusCode, error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status,
            body: ErrorBody {
                error: error.into(),
                message: message.into(),
            },
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "Keyword is required", message)
    }

    pub fn invalid_body(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "Invalid request body", message)
    }

    /// Maps a library error to a response. `context` names the failed
    /// operation for server-side failures.
    pub fn from_error(context: &str, error: Error) -> Self {
        match error {
            Error::Validation(message) => Self::bad_request(message),
            Error::Auth(message) => Self::new(
                StatusCode::UNAUTHORIZED,
                "Claude API key is not configured",
                format!("{}. Add one in the settings screen.", message),
            ),
            other => Self::new(StatusCode::INTERNAL_SERVER_ERROR, context, other.to_string()),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}
