//! Error types shared by the export pipeline and the Twin API.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Crate-wide error type.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration could not be loaded or is inconsistent.
    #[error("configuration error: {0}")]
    Config(String),

    /// Static export was asked to do something that needs a server runtime.
    #[error("incompatible with static export: {0}")]
    Export(String),

    /// A session id failed validation.
    #[error("invalid session id: {0:?}")]
    InvalidSessionId(String),

    /// Request body could not be parsed.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Persona resources are missing or malformed.
    #[error("persona error: {0}")]
    Persona(String),

    /// Model request failed.
    #[error("model error: {0}")]
    Model(anyhow::Error),

    /// Filesystem failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for crate operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// HTTP status the API answers with for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidSessionId(_) => StatusCode::BAD_REQUEST,
            Self::InvalidRequest(_) => StatusCode::UNPROCESSABLE_ENTITY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(name: "api.error", error = %self, "Request failed");
        }
        let body = Json(serde_json::json!({ "detail": self.to_string() }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_session_is_bad_request() {
        let err = Error::InvalidSessionId("../etc".to_string());
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_invalid_request_is_unprocessable() {
        let err = Error::InvalidRequest("missing field `message`".to_string());
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn test_model_error_is_internal() {
        let err = Error::Model(anyhow::anyhow!("upstream down"));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.to_string().contains("upstream down"));
    }
}
