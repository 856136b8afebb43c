//! Unified server error type.
//!
//! Every handler returns `Result<T, ServerError>`, which implements
//! [`axum::response::IntoResponse`] so errors are automatically converted
//! to a JSON-body HTTP response with an appropriate status code.
//!
//! **Security note:** upstream provider failures are logged with full detail
//! but only a generic message is returned to the caller so that provider
//! error bodies, URLs, or key hints never leak to clients.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::dispatch::DispatchError;

/// All errors that can occur in the prepcoach-server request lifecycle.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The request did not declare a JSON body.
    #[error("Content-Type must be application/json")]
    UnsupportedMediaType,

    /// The declared content length exceeds the configured cap.
    #[error("Request too large")]
    PayloadTooLarge,

    /// The client exhausted its sliding-window request budget.
    #[error("Rate limit exceeded. Please try again later.")]
    RateLimited,

    /// One of `question`, `type`, `promptType` was absent.
    #[error("Missing required fields")]
    MissingFields,

    /// The question exceeds the 1000-character limit.
    #[error("Question too long")]
    QuestionTooLong,

    /// `promptType` did not resolve to a known technique.
    #[error("Invalid prompt type")]
    InvalidPromptType,

    /// Any other malformed input (bad JSON, unknown interview type, …).
    #[error("{0}")]
    BadRequest(String),

    /// Propagated from the completion dispatcher.
    #[error("upstream failure: {0}")]
    Upstream(#[from] DispatchError),

    /// An unclassified internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, client_message) = match &self {
            // Client-facing errors: expose the message directly.
            ServerError::UnsupportedMediaType => {
                (StatusCode::UNSUPPORTED_MEDIA_TYPE, self.to_string())
            }
            ServerError::PayloadTooLarge => (StatusCode::PAYLOAD_TOO_LARGE, self.to_string()),
            ServerError::RateLimited => (StatusCode::TOO_MANY_REQUESTS, self.to_string()),
            ServerError::MissingFields
            | ServerError::QuestionTooLong
            | ServerError::InvalidPromptType
            | ServerError::BadRequest(_) => (StatusCode::BAD_REQUEST, self.to_string()),

            // Internal errors: log the full detail, return a generic message.
            ServerError::Upstream(e) => {
                error!(error = %e, "completion provider failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_owned(),
                )
            }
            ServerError::Internal(m) => {
                error!(message = %m, "internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_owned(),
                )
            }
        };
        (status, Json(json!({ "error": client_message }))).into_response()
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn validation_errors_use_the_wire_messages() {
        assert_eq!(
            ServerError::UnsupportedMediaType.to_string(),
            "Content-Type must be application/json"
        );
        assert_eq!(ServerError::MissingFields.to_string(), "Missing required fields");
        assert_eq!(ServerError::QuestionTooLong.to_string(), "Question too long");
        assert_eq!(ServerError::InvalidPromptType.to_string(), "Invalid prompt type");
    }

    #[test]
    fn status_codes_match_the_contract() {
        let cases = [
            (ServerError::UnsupportedMediaType, StatusCode::UNSUPPORTED_MEDIA_TYPE),
            (ServerError::PayloadTooLarge, StatusCode::PAYLOAD_TOO_LARGE),
            (ServerError::RateLimited, StatusCode::TOO_MANY_REQUESTS),
            (ServerError::MissingFields, StatusCode::BAD_REQUEST),
            (ServerError::QuestionTooLong, StatusCode::BAD_REQUEST),
            (ServerError::InvalidPromptType, StatusCode::BAD_REQUEST),
            (ServerError::Upstream(DispatchError::EmptyCompletion), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }
}
