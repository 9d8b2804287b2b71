//! Health and routing integration tests

use std::sync::Arc;

use crate::common::{FailingStore, TestApp};

#[tokio::test]
async fn test_health_endpoint_returns_ok() {
    let app = TestApp::new().await;
    let response = app.get("/api/v1/health").await;

    response.assert_ok();

    let json: serde_json::Value = response.json();
    assert_eq!(json["status"], "OK");
    assert_eq!(json["version"], "1.0.0");
    assert!(json["uptime"].as_f64().is_some());
    assert!(json["timestamp"].as_str().is_some());
}

#[tokio::test]
async fn test_health_does_not_touch_store() {
    let app = TestApp::with_store(Arc::new(FailingStore::new()));
    app.get("/api/v1/health").await.assert_ok();
}

#[tokio::test]
async fn test_readiness_probe() {
    let app = TestApp::new().await;
    let response = app.get("/api/v1/health/ready").await;

    response.assert_ok();
    let json: serde_json::Value = response.json();
    assert_eq!(json["status"], "ready");
    assert_eq!(json["store"], "memory");
}

#[tokio::test]
async fn test_readiness_reports_unreachable_store() {
    let app = TestApp::with_store(Arc::new(FailingStore::new()));
    let response = app.get("/api/v1/health/ready").await;

    response.assert_status(axum::http::StatusCode::SERVICE_UNAVAILABLE);
    let json: serde_json::Value = response.json();
    assert_eq!(json["status"], "unavailable");
}

#[tokio::test]
async fn test_unknown_route_uses_error_envelope() {
    let app = TestApp::new().await;
    let response = app.get("/api/v1/accounts").await;

    response.assert_not_found();
    let json: serde_json::Value = response.json();
    assert_eq!(json["success"], false);
    assert_eq!(json["message"], "Route not found");
}

#[tokio::test]
async fn test_wrong_method_uses_error_envelope() {
    let app = TestApp::new().await;
    let response = app.post_json("/api/v1/health", serde_json::json!({})).await;

    response.assert_status(axum::http::StatusCode::METHOD_NOT_ALLOWED);
    let json: serde_json::Value = response.json();
    assert_eq!(json["success"], false);
    assert_eq!(json["message"], "Method not allowed");
}

#[tokio::test]
async fn test_api_responses_are_not_cacheable() {
    let app = TestApp::new().await;
    let response = app.get("/api/v1/branches").await;

    response.assert_ok();
    let cache_control = response
        .headers
        .get("cache-control")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    assert!(cache_control.contains("no-store"));
}
