//! Shared utilities: errors, response envelopes and payload validation

pub mod error;
pub mod response;
pub mod validation;

pub use error::{AppError, AppResult, ErrorResponse};
pub use response::{ApiResponse, Envelope};
pub use validation::{validate_payload, FieldError, FieldErrors};
