//! Branch API integration tests

use std::sync::Arc;

use serde_json::json;

use crate::common::{BranchFactory, BranchFixtures, FailingStore, RecordingStore, TestApp};

#[tokio::test]
async fn test_create_branch_returns_created_record() {
    let app = TestApp::new().await;
    let response = app.post_json("/api/v1/branches", BranchFixtures::main()).await;

    response.assert_created();
    let json: serde_json::Value = response.json();
    assert_eq!(json["success"], true);
    assert_eq!(json["data"]["name"], "Main");
    assert_eq!(json["data"]["address"], "123 River Rd");
    assert!(!json["data"]["id"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_create_branch_missing_address_is_rejected() {
    let store = Arc::new(RecordingStore::new());
    let app = TestApp::with_store(store.clone());

    let response = app
        .post_json("/api/v1/branches", BranchFixtures::missing_address())
        .await;

    response.assert_bad_request();
    let json: serde_json::Value = response.json();
    assert_eq!(json["success"], false);
    assert_eq!(json["error"], "validation_error");
    assert!(json["message"].as_str().unwrap().contains("address is required"));
    assert_eq!(store.total_calls(), 0);
}

#[tokio::test]
async fn test_create_branch_reports_every_violated_field() {
    let app = TestApp::new().await;

    let response = app
        .post_json("/api/v1/branches", json!({ "name": "M" }))
        .await;
    response.assert_bad_request();
    let json: serde_json::Value = response.json();
    assert_eq!(json["errors"][0]["field"], "name");
    assert_eq!(
        json["errors"][0]["message"],
        "name must be between 2 and 80 characters"
    );
    assert_eq!(json["errors"][1]["field"], "address");
    assert_eq!(json["errors"][1]["message"], "address is required");

    let response = app
        .post_json("/api/v1/branches", json!({ "name": 5, "address": "ab" }))
        .await;
    response.assert_bad_request();
    let json: serde_json::Value = response.json();
    assert_eq!(json["errors"].as_array().unwrap().len(), 2);
    assert_eq!(json["errors"][0]["message"], "name must be a string");
    assert_eq!(
        json["errors"][1]["message"],
        "address must be between 5 and 200 characters"
    );
}

#[tokio::test]
async fn test_create_branch_ignores_client_id() {
    let app = TestApp::new().await;
    let mut body = BranchFixtures::main();
    body["id"] = json!("client-chosen");

    let response = app.post_json("/api/v1/branches", body).await;

    response.assert_created();
    let id = response.data()["id"].as_str().unwrap().to_string();
    assert_ne!(id, "client-chosen");
}

#[tokio::test]
async fn test_create_branch_rejects_numeric_name() {
    let app = TestApp::new().await;
    let response = app
        .post_json(
            "/api/v1/branches",
            json!({ "name": 42, "address": "123 River Rd" }),
        )
        .await;

    response.assert_bad_request();
    let json: serde_json::Value = response.json();
    assert_eq!(json["errors"][0]["field"], "name");
    assert_eq!(json["errors"][0]["message"], "name must be a string");
}

#[tokio::test]
async fn test_create_branch_rejects_unknown_field() {
    let app = TestApp::new().await;
    let mut body = BranchFixtures::main();
    body["manager"] = json!("Someone");

    let response = app.post_json("/api/v1/branches", body).await;

    response.assert_bad_request();
    assert!(response.text().contains("manager is not allowed"));
}

#[tokio::test]
async fn test_create_branch_rejects_bad_phone() {
    let app = TestApp::new().await;
    let mut body = BranchFixtures::main();
    body["phone"] = json!("call me");

    let response = app.post_json("/api/v1/branches", body).await;

    response.assert_bad_request();
    let json: serde_json::Value = response.json();
    assert_eq!(json["errors"][0]["field"], "phone");
}

#[tokio::test]
async fn test_create_branch_with_malformed_json() {
    let app = TestApp::new().await;
    let response = app.post_raw("/api/v1/branches", "{\"name\": ").await;

    response.assert_bad_request();
    let json: serde_json::Value = response.json();
    assert_eq!(json["success"], false);
}

#[tokio::test]
async fn test_create_branch_with_array_body() {
    let app = TestApp::new().await;
    let response = app.post_json("/api/v1/branches", json!([1, 2, 3])).await;

    response.assert_bad_request();
    assert!(response.text().contains("request body must be a JSON object"));
}

#[tokio::test]
async fn test_list_branches_includes_count() {
    let app = TestApp::new().await;
    let factory = BranchFactory::new();
    for _ in 0..3 {
        app.create_branch(factory.build()).await;
    }

    let response = app.get("/api/v1/branches").await;

    response.assert_ok();
    let json: serde_json::Value = response.json();
    assert_eq!(json["count"], 3);
    assert_eq!(json["data"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_list_branches_when_empty() {
    let app = TestApp::new().await;
    let response = app.get("/api/v1/branches").await;

    response.assert_ok();
    let json: serde_json::Value = response.json();
    assert_eq!(json["count"], 0);
    assert!(json["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_get_branch_by_id() {
    let app = TestApp::new().await;
    let id = app.create_branch(BranchFixtures::main()).await;

    let response = app.get(&format!("/api/v1/branches/{}", id)).await;

    response.assert_ok();
    assert_eq!(response.data()["id"], id.as_str());
    assert_eq!(response.data()["phone"], "204-555-2222");
}

#[tokio::test]
async fn test_get_branch_with_unknown_id() {
    let app = TestApp::new().await;
    let response = app
        .get("/api/v1/branches/00000000-0000-4000-8000-000000000000")
        .await;

    response.assert_not_found();
    let json: serde_json::Value = response.json();
    assert_eq!(json["message"], "Branch not found");
}

#[tokio::test]
async fn test_get_branch_with_non_uuid_id_is_not_found() {
    let app = TestApp::new().await;
    app.get("/api/v1/branches/12345").await.assert_not_found();
}

#[tokio::test]
async fn test_get_branch_with_blank_id_is_bad_request() {
    let store = Arc::new(RecordingStore::new());
    let app = TestApp::with_store(store.clone());

    let response = app.get("/api/v1/branches/%20%20").await;

    response.assert_bad_request();
    assert!(response.text().contains("Missing or invalid id parameter"));
    assert_eq!(store.total_calls(), 0);
}

#[tokio::test]
async fn test_update_branch_merges_patch() {
    let app = TestApp::new().await;
    let id = app.create_branch(BranchFixtures::main()).await;

    let response = app
        .put_json(
            &format!("/api/v1/branches/{}", id),
            json!({ "phone": "204-555-9999" }),
        )
        .await;

    response.assert_ok();
    let data = response.data();
    assert_eq!(data["phone"], "204-555-9999");
    assert_eq!(data["name"], "Main");
    assert_eq!(data["address"], "123 River Rd");
}

#[tokio::test]
async fn test_update_branch_with_empty_patch_changes_nothing() {
    let app = TestApp::new().await;
    let id = app.create_branch(BranchFixtures::main()).await;
    let before = app.get(&format!("/api/v1/branches/{}", id)).await.data();

    app.put_json(&format!("/api/v1/branches/{}", id), json!({}))
        .await
        .assert_ok();

    let after = app.get(&format!("/api/v1/branches/{}", id)).await.data();
    assert_eq!(before, after);
}

#[tokio::test]
async fn test_update_branch_without_body_changes_nothing() {
    let app = TestApp::new().await;
    let id = app.create_branch(BranchFixtures::main()).await;

    let response = app.put_empty(&format!("/api/v1/branches/{}", id)).await;

    response.assert_ok();
    let data = response.data();
    assert_eq!(data["id"], id.as_str());
    assert_eq!(data["name"], "Main");
    assert_eq!(data["phone"], "204-555-2222");
}

#[tokio::test]
async fn test_update_branch_with_malformed_body_is_rejected() {
    let app = TestApp::new().await;
    let id = app.create_branch(BranchFixtures::main()).await;

    let response = app
        .request(
            axum::http::Request::builder()
                .method("PUT")
                .uri(format!("/api/v1/branches/{}", id))
                .header("Content-Type", "application/json")
                .body(axum::body::Body::from("{\"phone\": "))
                .unwrap(),
        )
        .await;

    response.assert_bad_request();
}

#[tokio::test]
async fn test_create_branch_without_body_reports_required_fields() {
    let app = TestApp::new().await;
    let response = app.send("POST", "/api/v1/branches").await;

    response.assert_bad_request();
    let json: serde_json::Value = response.json();
    assert_eq!(json["message"], "name is required; address is required");
}

#[tokio::test]
async fn test_empty_branch_id_segment_is_bad_request() {
    let store = Arc::new(RecordingStore::new());
    let app = TestApp::with_store(store.clone());

    for method in ["GET", "PUT", "DELETE"] {
        let response = app.send(method, "/api/v1/branches/").await;
        response.assert_bad_request();
        assert!(response.text().contains("Missing or invalid id parameter"));
    }
    assert_eq!(store.total_calls(), 0);
}

#[tokio::test]
async fn test_unsupported_method_uses_error_envelope() {
    let app = TestApp::new().await;
    let id = app.create_branch(BranchFixtures::main()).await;

    let response = app.send("PATCH", &format!("/api/v1/branches/{}", id)).await;

    response.assert_status(axum::http::StatusCode::METHOD_NOT_ALLOWED);
    let json: serde_json::Value = response.json();
    assert_eq!(json["success"], false);
    assert_eq!(json["error"], "method_not_allowed");
}

#[tokio::test]
async fn test_update_branch_ignores_id_in_patch() {
    let app = TestApp::new().await;
    let id = app.create_branch(BranchFixtures::main()).await;

    let response = app
        .put_json(
            &format!("/api/v1/branches/{}", id),
            json!({ "id": "hijacked", "name": "Downtown" }),
        )
        .await;

    response.assert_ok();
    assert_eq!(response.data()["id"], id.as_str());
    assert_eq!(response.data()["name"], "Downtown");
}

#[tokio::test]
async fn test_update_branch_with_invalid_patch_never_writes() {
    let store = Arc::new(RecordingStore::new());
    let app = TestApp::with_store(store.clone());
    let id = app.create_branch(BranchFixtures::main()).await;

    let response = app
        .put_json(&format!("/api/v1/branches/{}", id), json!({ "name": "M" }))
        .await;

    response.assert_bad_request();
    assert!(response
        .text()
        .contains("name must be between 2 and 80 characters"));
    assert_eq!(store.merge_count(), 0);
}

#[tokio::test]
async fn test_update_unknown_branch_is_not_found() {
    let app = TestApp::new().await;
    app.put_json(
        "/api/v1/branches/00000000-0000-4000-8000-000000000000",
        json!({ "name": "Downtown" }),
    )
    .await
    .assert_not_found();
}

#[tokio::test]
async fn test_delete_branch_then_get_is_not_found() {
    let app = TestApp::new().await;
    let id = app.create_branch(BranchFixtures::main()).await;

    let response = app.delete(&format!("/api/v1/branches/{}", id)).await;
    response.assert_no_content();
    assert!(response.body.is_empty());

    app.get(&format!("/api/v1/branches/{}", id))
        .await
        .assert_not_found();
}

#[tokio::test]
async fn test_delete_unknown_branch_is_not_found() {
    let app = TestApp::new().await;
    app.delete("/api/v1/branches/00000000-0000-4000-8000-000000000000")
        .await
        .assert_not_found();
}

#[tokio::test]
async fn test_store_failure_surfaces_as_server_error() {
    let app = TestApp::with_store(Arc::new(FailingStore::new()));
    let response = app.get("/api/v1/branches").await;

    response.assert_server_error();
    let json: serde_json::Value = response.json();
    assert_eq!(json["success"], false);
    assert_eq!(json["message"], "DB read failed");
    assert!(!response.text().contains("connection refused"));
}

#[tokio::test]
async fn test_store_failure_on_create_names_operation() {
    let app = TestApp::with_store(Arc::new(FailingStore::new()));
    let response = app.post_json("/api/v1/branches", BranchFixtures::main()).await;

    response.assert_server_error();
    let json: serde_json::Value = response.json();
    assert_eq!(json["message"], "DB create failed");
}
