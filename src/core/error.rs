//! Error type system for Inkwell
//!
//! This module provides:
//! - A single error enum covering client, auth, store and server failures
//! - HTTP status code mapping
//! - Caller-facing messages that never expose internal detail
//! - JSON error responses with trace IDs

use crate::api::middleware::trace::current_trace_id;
use crate::auth::jwt::AuthError;
use crate::db::error::StoreError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Main error type for the Inkwell backend
#[derive(Debug, thiserror::Error)]
pub enum InkwellError {
    // Client input errors
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Invalid user credentials")]
    InvalidCredentials,

    #[error("Unauthorized: {0}")]
    Unauthorized(#[from] AuthError),

    #[error("Resource not found: {0}")]
    NotFound(String),

    // Server-side failures
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Password hashing failed: {0}")]
    HashingError(String),

    #[error("Token signing failed: {0}")]
    SigningError(String),
}

impl InkwellError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            // 400 Bad Request
            InkwellError::InvalidRequest(_)
            | InkwellError::ValidationError(_)
            | InkwellError::InvalidCredentials => StatusCode::BAD_REQUEST,

            // 401 Unauthorized
            InkwellError::Unauthorized(_) => StatusCode::UNAUTHORIZED,

            // 404 Not Found
            InkwellError::NotFound(_) => StatusCode::NOT_FOUND,

            // 409 Conflict
            InkwellError::Conflict(_) => StatusCode::CONFLICT,

            // 500 Internal Server Error
            InkwellError::Store(_)
            | InkwellError::HashingError(_)
            | InkwellError::SigningError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error type name for API responses
    pub fn error_type(&self) -> &'static str {
        match self {
            InkwellError::InvalidRequest(_) => "InvalidRequest",
            InkwellError::ValidationError(_) => "ValidationError",
            InkwellError::Conflict(_) => "Conflict",
            InkwellError::InvalidCredentials => "InvalidCredentials",
            InkwellError::Unauthorized(_) => "Unauthorized",
            InkwellError::NotFound(_) => "NotFound",
            InkwellError::Store(_) => "StoreError",
            InkwellError::HashingError(_) => "HashingError",
            InkwellError::SigningError(_) => "SigningError",
        }
    }

    /// Message shown to the caller.
    ///
    /// Server-side failures collapse to an opaque message, and every token
    /// failure reads the same so callers cannot tell why validation failed.
    pub fn public_message(&self) -> String {
        match self {
            InkwellError::InvalidRequest(msg)
            | InkwellError::ValidationError(msg)
            | InkwellError::Conflict(msg)
            | InkwellError::NotFound(msg) => msg.clone(),
            InkwellError::InvalidCredentials => "Invalid user credentials".to_string(),
            InkwellError::Unauthorized(_) => "Unauthorized".to_string(),
            _ => "Internal Server Error".to_string(),
        }
    }

    /// Whether this error originates on the server rather than the caller
    pub fn is_server_error(&self) -> bool {
        self.status_code().is_server_error()
    }
}

/// Error response structure for API endpoints
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error type identifier
    pub error: String,
    /// Human-readable error message
    pub message: String,
    /// Unique trace ID for this error
    pub trace_id: String,
}

impl ErrorResponse {
    /// Create a new error response tagged with the current request's trace ID,
    /// or a fresh one when raised outside a traced request
    pub fn new(error: String, message: String) -> Self {
        Self {
            error,
            message,
            trace_id: current_trace_id().unwrap_or_else(|| Uuid::new_v4().to_string()),
        }
    }

    /// Create an error response from an InkwellError
    pub fn from_error(error: &InkwellError) -> Self {
        Self::new(error.error_type().to_string(), error.public_message())
    }
}

impl fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {} (trace_id: {})", self.error, self.message, self.trace_id)
    }
}

impl IntoResponse for InkwellError {
    fn into_response(self) -> Response {
        let status_code = self.status_code();
        let error_response = ErrorResponse::from_error(&self);

        // Full detail stays in the server log only
        if self.is_server_error() {
            tracing::error!(
                error_type = self.error_type(),
                trace_id = %error_response.trace_id,
                status_code = %status_code,
                "Request failed: {}",
                self
            );
        } else {
            tracing::warn!(
                error_type = self.error_type(),
                trace_id = %error_response.trace_id,
                status_code = %status_code,
                "Request rejected: {}",
                self
            );
        }

        (status_code, Json(error_response)).into_response()
    }
}

/// Result type alias for operations that can fail with InkwellError
pub type Result<T> = std::result::Result<T, InkwellError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(
            InkwellError::ValidationError("test".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            InkwellError::InvalidCredentials.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            InkwellError::Unauthorized(AuthError::Expired).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            InkwellError::Conflict("User already exists".into()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            InkwellError::NotFound("Not Found".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            InkwellError::Store(StoreError::Task("boom".into())).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            InkwellError::HashingError("rng".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_auth_failures_share_one_public_message() {
        let messages: Vec<String> = [
            AuthError::MissingToken,
            AuthError::Malformed,
            AuthError::BadSignature,
            AuthError::Expired,
        ]
        .into_iter()
        .map(|e| InkwellError::from(e).public_message())
        .collect();

        assert!(messages.iter().all(|m| m == "Unauthorized"));
    }

    #[test]
    fn test_server_errors_hide_detail() {
        let error = InkwellError::Store(StoreError::Task("disk on fire at /var/db".into()));
        let response = ErrorResponse::from_error(&error);

        assert_eq!(response.error, "StoreError");
        assert_eq!(response.message, "Internal Server Error");
        assert!(!response.trace_id.is_empty());
    }

    #[test]
    fn test_client_errors_keep_message() {
        let response = ErrorResponse::from_error(&InkwellError::Conflict(
            "User already exists".into(),
        ));
        assert_eq!(response.message, "User already exists");
    }

    #[tokio::test]
    async fn test_into_response_status() {
        let response = InkwellError::InvalidCredentials.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let parsed: ErrorResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(parsed.error, "InvalidCredentials");
        assert_eq!(parsed.message, "Invalid user credentials");
    }
}
