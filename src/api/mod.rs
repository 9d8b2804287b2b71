//! API routes and handlers
//!
//! This module defines all API endpoints and their routing.

use axum::{
    body::Body,
    extract::{FromRequest, Request},
    http::header::CONTENT_TYPE,
    routing::get,
    Json, Router,
};
use serde_json::{Map, Value};
use tower_http::{
    catch_panic::CatchPanicLayer,
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::{
    middleware,
    utils::{validation::normalize_id, AppError, AppResult},
    AppState,
};

mod branches;
mod employees;
mod health;

pub use health::*;

/// Mount point of every endpoint
pub const API_PREFIX: &str = "/api/v1";

/// Version reported by the health endpoint
pub const API_VERSION: &str = "1.0.0";

/// All API routes, relative to [`API_PREFIX`]
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness))
        .nest("/branches", branches::routes())
        .nest("/employees", employees::routes())
        // Empty id segments never reach the `{id}` routes
        .route(
            "/branches/",
            get(missing_id).put(missing_id).delete(missing_id),
        )
        .route(
            "/employees/",
            get(missing_id).put(missing_id).delete(missing_id),
        )
}

/// Build the application router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    // Applied bottom-up: panics are caught before tracing records the response
    Router::new()
        .nest(API_PREFIX, routes())
        .fallback(route_not_found)
        .method_not_allowed_fallback(method_not_allowed)
        .layer(axum::middleware::from_fn(
            middleware::api_cache_control_middleware,
        ))
        .layer(CatchPanicLayer::custom(middleware::handle_panic))
        .layer(CompressionLayer::new())
        .layer(trace_layer)
        .layer(cors)
        .with_state(state)
}

async fn route_not_found() -> AppError {
    AppError::not_found("Route not found")
}

async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}

async fn missing_id() -> AppError {
    missing_param("id")
}

fn missing_param(param: &str) -> AppError {
    AppError::bad_request(format!("Missing or invalid {} parameter", param))
}

/// Reject missing or blank id path parameters before any service call
fn require_id<'a>(raw: &'a str, param: &str) -> AppResult<&'a str> {
    normalize_id(raw).ok_or_else(|| missing_param(param))
}

/// Upper bound on buffered request bodies, matching axum's default limit
const BODY_LIMIT: usize = 2 * 1024 * 1024;

/// JSON request body where a request with no body and no `Content-Type`
/// counts as an empty object.
///
/// Anything else goes through axum's [`Json`] extractor, so a body that is
/// present but malformed or mislabelled is still rejected.
pub struct JsonPayload(pub Value);

impl<S> FromRequest<S> for JsonPayload
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let has_content_type = req.headers().contains_key(CONTENT_TYPE);
        let (parts, body) = req.into_parts();

        let bytes = axum::body::to_bytes(body, BODY_LIMIT)
            .await
            .map_err(|e| AppError::bad_request(format!("Failed to read request body: {}", e)))?;

        if bytes.is_empty() && !has_content_type {
            return Ok(JsonPayload(Value::Object(Map::new())));
        }

        let Json(value) =
            Json::<Value>::from_request(Request::from_parts(parts, Body::from(bytes)), state)
                .await?;
        Ok(JsonPayload(value))
    }
}
