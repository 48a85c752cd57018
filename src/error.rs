//! Error taxonomy for the prediction gateways and HTTP boundary.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

/// Errors surfaced by the prediction gateways.
///
/// Translated exactly once, at the HTTP boundary, into a status code and a
/// `{"error": "..."}` body. Internal failures carry a short message only;
/// no stack or backend detail reaches the client.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Client-supplied data is malformed or incomplete.
    #[error("{0}")]
    InvalidInput(String),

    /// The named model artifact was not loaded at startup. Persists for the
    /// process lifetime; no reload is attempted.
    #[error("{0} model not available")]
    ModelUnavailable(&'static str),

    /// Unexpected failure inside feature adaptation or inference.
    #[error("{0}")]
    Internal(String),
}

impl ServiceError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Self::ModelUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Name of the error kind, used for metrics bucketing.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "invalid_input",
            Self::ModelUnavailable(_) => "model_unavailable",
            Self::Internal(_) => "internal",
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status();
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ServiceError::invalid_input("bad").status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ServiceError::ModelUnavailable("phishing").status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            ServiceError::Internal("oops".to_string()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_model_unavailable_message() {
        let err = ServiceError::ModelUnavailable("phishing");
        assert_eq!(err.to_string(), "phishing model not available");
    }
}
