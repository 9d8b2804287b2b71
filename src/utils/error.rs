//! Error types and handling
//!
//! Every failure that reaches a handler boundary is an [`AppError`], which is
//! rendered as the standard `{ success: false, message }` envelope.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use crate::db::StorageError;
use crate::utils::validation::FieldErrors;

/// Application error types
#[derive(Debug, Error)]
pub enum AppError {
    /// Resource not found (404)
    #[error("{0}")]
    NotFound(String),

    /// Bad request - malformed body or path parameter (400)
    #[error("{0}")]
    BadRequest(String),

    /// Path exists but not for this HTTP method (405)
    #[error("Method not allowed")]
    MethodNotAllowed,

    /// Payload failed schema validation (400)
    #[error("{0}")]
    ValidationError(FieldErrors),

    /// Document store failure (500)
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Internal server error (500)
    #[error("{0}")]
    Internal(String),
}

impl AppError {
    pub fn not_found(message: impl Into<String>) -> Self {
        AppError::NotFound(message.into())
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        AppError::BadRequest(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        AppError::Internal(message.into())
    }
}

/// Error response body
#[derive(Serialize, Debug)]
pub struct ErrorResponse {
    /// Always `false`
    pub success: bool,
    /// Error type identifier
    pub error: String,
    /// Human-readable error message
    pub message: String,
    /// Per-field violations for validation failures
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<FieldErrors>,
}

impl ErrorResponse {
    /// Create a new error response
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
            message: message.into(),
            errors: None,
        }
    }

    /// Attach per-field violations
    pub fn with_errors(mut self, errors: FieldErrors) -> Self {
        self.errors = Some(errors);
        self
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::NotFound(message) => {
                (StatusCode::NOT_FOUND, ErrorResponse::new("not_found", message))
            }
            AppError::BadRequest(message) => {
                (StatusCode::BAD_REQUEST, ErrorResponse::new("bad_request", message))
            }
            AppError::MethodNotAllowed => (
                StatusCode::METHOD_NOT_ALLOWED,
                ErrorResponse::new("method_not_allowed", "Method not allowed"),
            ),
            AppError::ValidationError(errors) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::new("validation_error", errors.to_string()).with_errors(errors),
            ),
            AppError::Storage(err) => {
                // The cause may expose store internals, so it stays in the logs
                error!(operation = %err.operation, error = %err.message, "Storage failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new("storage_error", format!("DB {} failed", err.operation)),
                )
            }
            AppError::Internal(message) => {
                error!(error = %message, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new("internal_error", "Internal Server Error"),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<FieldErrors> for AppError {
    fn from(errors: FieldErrors) -> Self {
        AppError::ValidationError(errors)
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(format!("{:#}", err))
    }
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;
