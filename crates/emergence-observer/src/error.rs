//! Error types for the Observer API server.
//!
//! [`ObserverError`] unifies all failure modes into a single enum that
//! converts into an Axum HTTP response via its
//! [`IntoResponse`](axum::response::IntoResponse) implementation. The
//! `Command` variant wraps [`CommandError`] directly rather than
//! re-stating its four cases, so the HTTP status mapping and the engine's
//! own error taxonomy never drift apart.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use emergence_core::error::CommandError;

/// Errors that can occur in the Observer API layer.
#[derive(Debug, thiserror::Error)]
pub enum ObserverError {
    /// `process_command` rejected the submitted tool invocation.
    #[error(transparent)]
    Command(#[from] CommandError),

    /// The request body failed to deserialize as a [`emergence_types::CommandRequest`].
    #[error("malformed request body: {0}")]
    MalformedBody(String),
}

impl IntoResponse for ObserverError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::Command(CommandError::UnknownTool(_)) => (StatusCode::BAD_REQUEST, self.to_string()),
            Self::Command(CommandError::Busy(_)) => (StatusCode::CONFLICT, self.to_string()),
            Self::Command(CommandError::InvalidIntent { .. }) => (StatusCode::UNPROCESSABLE_ENTITY, self.to_string()),
            Self::Command(CommandError::Lookup(_)) => (StatusCode::NOT_FOUND, self.to_string()),
            Self::MalformedBody(_) => (StatusCode::BAD_REQUEST, self.to_string()),
        };

        let body = serde_json::json!({
            "error": message,
            "status": status.as_u16(),
        });

        (status, axum::Json(body)).into_response()
    }
}
