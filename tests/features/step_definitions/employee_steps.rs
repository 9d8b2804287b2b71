//! Employee step definitions

use cucumber::{given, then, when};
use serde_json::json;

use crate::features::support::TestWorld;

#[given(expr = "an employee {string} in department {string} at branch {string}")]
async fn employee_exists(world: &mut TestWorld, name: String, department: String, branch: String) {
    let branch_id = world.branch_id(&branch);
    let email = format!("{}@example.com", name.to_lowercase().replace(' ', "."));
    let response = world
        .send(
            "POST",
            "/api/v1/employees",
            Some(json!({
                "name": name,
                "position": "Analyst",
                "department": department,
                "email": email,
                "branchId": branch_id
            })),
        )
        .await;
    assert_eq!(response.status, 201, "body: {}", response.body);
}

#[when("I create an employee without a branch")]
async fn create_without_branch(world: &mut TestWorld) {
    world
        .send(
            "POST",
            "/api/v1/employees",
            Some(json!({
                "name": "Bob Stone",
                "position": "Manager",
                "department": "IT",
                "email": "bob.stone@example.com"
            })),
        )
        .await;
}

#[when(expr = "I list employees in department {string}")]
async fn list_by_department(world: &mut TestWorld, department: String) {
    world
        .send(
            "GET",
            &format!("/api/v1/employees/by-department/{}", department),
            None,
        )
        .await;
}

#[when(expr = "I list employees at branch {string}")]
async fn list_by_branch(world: &mut TestWorld, branch: String) {
    let branch_id = world.branch_id(&branch);
    world
        .send(
            "GET",
            &format!("/api/v1/employees/by-branch/{}", branch_id),
            None,
        )
        .await;
}

#[then(expr = "the list should contain {int} employee(s)")]
async fn list_count(world: &mut TestWorld, count: usize) {
    let body = &world.response().body;
    assert_eq!(body["count"], count);
    assert_eq!(body["data"].as_array().map(Vec::len), Some(count));
}

#[then(expr = "the list should include {string}")]
async fn list_includes(world: &mut TestWorld, name: String) {
    let found = world.response().body["data"]
        .as_array()
        .map(|items| items.iter().any(|e| e["name"] == name.as_str()))
        .unwrap_or(false);
    assert!(found, "{} not in {}", name, world.response().body);
}
