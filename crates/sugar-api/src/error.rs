//! Error types for sugar-api.

use std::net::SocketAddr;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use sugar_forest::RfError;

/// Remediation hint returned while no model is loaded.
pub const MODEL_UNAVAILABLE_DETAIL: &str =
    "Model not available. Run sugar-train to create model.bin.";

/// Errors a request handler can return. Each maps to one HTTP status and a
/// `{"detail": ...}` body.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Returned when the service started without a usable model.
    #[error("{}", MODEL_UNAVAILABLE_DETAIL)]
    ModelUnavailable,

    /// Returned when the request body is not valid JSON of the expected shape.
    #[error("{0}")]
    InvalidBody(String),

    /// Returned when the model rejects the feature vector.
    #[error("Prediction error: {0}")]
    Prediction(#[source] RfError),
}

impl ApiError {
    /// HTTP status for this error.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::ModelUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::InvalidBody(_) | ApiError::Prediction(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "detail": self.to_string() }))).into_response()
    }
}

/// Errors that stop the server itself.
#[derive(Debug, thiserror::Error)]
pub enum ServeError {
    /// Returned when the listening socket cannot be bound.
    #[error("failed to bind {addr}")]
    Bind {
        /// Address that was attempted.
        addr: SocketAddr,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Returned when the accept loop fails.
    #[error("server error")]
    Serve {
        /// Underlying I/O error.
        source: std::io::Error,
    },
}
