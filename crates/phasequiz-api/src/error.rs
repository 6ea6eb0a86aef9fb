//! Error types for the HTTP API.
//!
//! [`ApiError`] unifies all failure modes into a single enum that can be
//! converted into an Axum HTTP response via its
//! [`IntoResponse`](axum::response::IntoResponse) implementation. Every
//! error body has the shape `{"error": <message>, "status": <code>}`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use phasequiz_core::QuizError;

/// Errors that can occur in the API layer.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// A domain operation failed.
    #[error(transparent)]
    Quiz(#[from] QuizError),

    /// A request body failed field validation.
    #[error("invalid request: {0}")]
    Validation(#[from] validator::ValidationErrors),

    /// The request body could not be parsed.
    #[error("invalid body: {0}")]
    InvalidBody(String),

    /// An invalid query parameter was provided.
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// A path parameter could not be parsed.
    #[error("invalid path: {0}")]
    InvalidPath(String),

    /// A UUID could not be parsed from the request path.
    #[error("invalid UUID: {0}")]
    InvalidUuid(String),

    /// A serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ApiError {
    /// The HTTP status this error maps to.
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Quiz(QuizError::Validation(_))
            | Self::Validation(_)
            | Self::InvalidBody(_)
            | Self::InvalidQuery(_)
            | Self::InvalidPath(_)
            | Self::InvalidUuid(_) => StatusCode::BAD_REQUEST,
            Self::Quiz(QuizError::NotFound(_)) => StatusCode::NOT_FOUND,
            Self::Quiz(QuizError::Storage(_)) | Self::Serialization(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            Self::Quiz(QuizError::Validation(msg) | QuizError::NotFound(msg))
            | Self::InvalidBody(msg)
            | Self::InvalidQuery(msg)
            | Self::InvalidPath(msg)
            | Self::InvalidUuid(msg) => msg.clone(),
            other => other.to_string(),
        };

        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        let body = serde_json::json!({
            "error": message,
            "status": status.as_u16(),
        });

        (status, axum::Json(body)).into_response()
    }
}
