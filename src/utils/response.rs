//! Success envelopes
//!
//! Handlers return one of these shapes; failures go through
//! [`AppError`](super::AppError) instead.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Standard success body: `{ success: true, message, data, count? }`
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: String,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
}

/// A success outcome with its HTTP status
#[derive(Debug)]
pub enum Envelope<T> {
    /// 200 with a single record
    Ok(ApiResponse<T>),
    /// 201 with the newly created record
    Created(ApiResponse<T>),
    /// 204, empty body
    NoContent,
}

impl<T> Envelope<T> {
    pub fn ok(data: T, message: impl Into<String>) -> Self {
        Envelope::Ok(ApiResponse {
            success: true,
            message: message.into(),
            data,
            count: None,
        })
    }

    pub fn created(data: T, message: impl Into<String>) -> Self {
        Envelope::Created(ApiResponse {
            success: true,
            message: message.into(),
            data,
            count: None,
        })
    }
}

impl<T> Envelope<Vec<T>> {
    /// 200 with an array and its length
    pub fn list(items: Vec<T>, message: impl Into<String>) -> Self {
        let count = items.len();
        Envelope::Ok(ApiResponse {
            success: true,
            message: message.into(),
            data: items,
            count: Some(count),
        })
    }
}

impl Envelope<()> {
    pub fn no_content() -> Self {
        Envelope::NoContent
    }
}

impl<T: Serialize> IntoResponse for Envelope<T> {
    fn into_response(self) -> Response {
        match self {
            Envelope::Ok(body) => (StatusCode::OK, Json(body)).into_response(),
            Envelope::Created(body) => (StatusCode::CREATED, Json(body)).into_response(),
            Envelope::NoContent => StatusCode::NO_CONTENT.into_response(),
        }
    }
}
