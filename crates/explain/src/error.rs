use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

/// Explain endpoint errors with appropriate HTTP status codes.
#[derive(Debug, Error)]
pub enum ExplainError {
    /// The request body was malformed or missing required fields.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The upstream credential is missing from the execution environment.
    /// A deployment problem, not a caller error.
    #[error("API key not configured on server")]
    NotConfigured,

    /// The upstream API answered with a non-success status. The message is
    /// the upstream's own when it provided one.
    #[error("{message}")]
    Upstream {
        /// Status code reported by the upstream API.
        status: u16,
        /// Message relayed to the caller.
        message: String,
    },

    /// Network failure talking to the upstream API.
    #[error("Connection error: {0}")]
    Connection(String),

    /// Anything unexpected. Details are logged, never exposed.
    #[error("Internal server error")]
    Internal,
}

impl ExplainError {
    /// Get the appropriate HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotConfigured | Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Upstream { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            Self::Connection(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

/// Error response format: a single caller-facing message string.
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

impl IntoResponse for ExplainError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            log::error!("Server error ({}): {self}", status.as_u16());
        }

        let error_response = ErrorResponse {
            error: self.to_string(),
        };

        (status, Json(error_response)).into_response()
    }
}
