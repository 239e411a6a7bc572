//! HTTP error responses
//!
//! Every failure is returned as `{"error": ..., "code": ...}`. The message is
//! fixed per route; the underlying cause is logged, never sent.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};

use crate::auth::AuthError;
use crate::store::StoreError;

pub const UNAUTHORIZED: &str = "UNAUTHORIZED";
pub const INVALID_BODY: &str = "INVALID_BODY";
pub const INTERNAL_ERROR: &str = "INTERNAL_ERROR";

/// Error body returned by the service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpError {
    /// User-facing message
    pub error: String,
    /// Machine-readable error code
    pub code: String,
}

impl HttpError {
    pub fn new(error: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            code: code.into(),
        }
    }

    /// Refusal of a write request
    pub fn unauthorized(cause: &AuthError) -> Self {
        tracing::warn!("Refused write request: {}", cause);
        Self::new("Unauthorized", UNAUTHORIZED)
    }

    /// Store failure reported under a route's fixed message
    pub fn store(message: &str, err: &StoreError) -> Self {
        tracing::error!("{}: {}", message, err);
        Self::new(message, err.code())
    }

    /// Request body that could not be decoded
    pub fn invalid_body(message: &str, details: impl std::fmt::Display) -> Self {
        tracing::error!("{}: invalid request body: {}", message, details);
        Self::new(message, INVALID_BODY)
    }

    /// A store call that never returned (it panicked or was cancelled)
    pub fn task_failed(message: &str, err: &tokio::task::JoinError) -> Self {
        tracing::error!("{}: store task failed: {}", message, err);
        Self::new(message, INTERNAL_ERROR)
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let status = match self.code.as_str() {
            UNAUTHORIZED => StatusCode::UNAUTHORIZED,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, Json(self)).into_response()
    }
}
