//! Branch API endpoints

use axum::{
    extract::{Path, State},
    routing::get,
    Router,
};
use tracing::info;

use crate::{
    models::{Branch, CreateBranchRequest, UpdateBranchRequest},
    utils::{validate_payload, AppError, AppResult, Envelope},
    AppState,
};

use super::{require_id, JsonPayload};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_branches).post(create_branch))
        .route(
            "/{id}",
            get(get_branch).put(update_branch).delete(delete_branch),
        )
}

async fn list_branches(State(state): State<AppState>) -> AppResult<Envelope<Vec<Branch>>> {
    let branches = state.branches.list().await?;
    Ok(Envelope::list(branches, "Branches retrieved"))
}

async fn get_branch(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Envelope<Branch>> {
    let id = require_id(&id, "id")?;

    let branch = state
        .branches
        .get_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found("Branch not found"))?;

    Ok(Envelope::ok(branch, "Branch retrieved"))
}

async fn create_branch(
    State(state): State<AppState>,
    JsonPayload(payload): JsonPayload,
) -> AppResult<Envelope<Branch>> {
    let req: CreateBranchRequest = validate_payload(payload)?;

    let branch = state.branches.create(&req).await?;
    info!(id = %branch.id, name = %branch.name, "Branch created");

    Ok(Envelope::created(branch, "Branch created"))
}

async fn update_branch(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonPayload(payload): JsonPayload,
) -> AppResult<Envelope<Branch>> {
    let id = require_id(&id, "id")?;
    let patch: UpdateBranchRequest = validate_payload(payload)?;

    let branch = state
        .branches
        .update(id, &patch)
        .await?
        .ok_or_else(|| AppError::not_found("Branch not found"))?;

    info!(id = %branch.id, "Branch updated");
    Ok(Envelope::ok(branch, "Branch updated"))
}

async fn delete_branch(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Envelope<()>> {
    let id = require_id(&id, "id")?;

    if !state.branches.delete(id).await? {
        return Err(AppError::not_found("Branch not found"));
    }

    info!(id = %id, "Branch deleted");
    Ok(Envelope::no_content())
}
