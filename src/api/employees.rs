//! Employee API endpoints

use axum::{
    extract::{Path, State},
    routing::get,
    Router,
};
use tracing::info;

use crate::{
    models::{CreateEmployeeRequest, Employee, UpdateEmployeeRequest},
    utils::{validate_payload, AppError, AppResult, Envelope},
    AppState,
};

use super::{require_id, JsonPayload};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_employees).post(create_employee))
        .route("/by-branch/{branch_id}", get(list_by_branch))
        .route("/by-branch/", get(missing_branch_id))
        .route("/by-department/{department}", get(list_by_department))
        .route("/by-department/", get(missing_department))
        .route(
            "/{id}",
            get(get_employee)
                .put(update_employee)
                .delete(delete_employee),
        )
}

async fn list_employees(State(state): State<AppState>) -> AppResult<Envelope<Vec<Employee>>> {
    let employees = state.employees.list().await?;
    Ok(Envelope::list(employees, "Employees retrieved"))
}

async fn get_employee(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Envelope<Employee>> {
    let id = require_id(&id, "id")?;

    let employee = state
        .employees
        .get_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found("Employee not found"))?;

    Ok(Envelope::ok(employee, "Employee retrieved"))
}

async fn create_employee(
    State(state): State<AppState>,
    JsonPayload(payload): JsonPayload,
) -> AppResult<Envelope<Employee>> {
    let req: CreateEmployeeRequest = validate_payload(payload)?;

    let employee = state.employees.create(&req).await?;
    info!(id = %employee.id, branch_id = %employee.branch_id, "Employee created");

    Ok(Envelope::created(employee, "Employee created"))
}

async fn update_employee(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonPayload(payload): JsonPayload,
) -> AppResult<Envelope<Employee>> {
    let id = require_id(&id, "id")?;
    let patch: UpdateEmployeeRequest = validate_payload(payload)?;

    let employee = state
        .employees
        .update(id, &patch)
        .await?
        .ok_or_else(|| AppError::not_found("Employee not found"))?;

    info!(id = %employee.id, "Employee updated");
    Ok(Envelope::ok(employee, "Employee updated"))
}

async fn delete_employee(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Envelope<()>> {
    let id = require_id(&id, "id")?;

    if !state.employees.delete(id).await? {
        return Err(AppError::not_found("Employee not found"));
    }

    info!(id = %id, "Employee deleted");
    Ok(Envelope::no_content())
}

async fn list_by_branch(
    State(state): State<AppState>,
    Path(branch_id): Path<String>,
) -> AppResult<Envelope<Vec<Employee>>> {
    let branch_id = require_id(&branch_id, "branchId")?;

    let employees = state.employees.list_by_branch(branch_id).await?;
    Ok(Envelope::list(employees, "Employees by branch"))
}

async fn list_by_department(
    State(state): State<AppState>,
    Path(department): Path<String>,
) -> AppResult<Envelope<Vec<Employee>>> {
    let department = department.trim();
    if department.is_empty() {
        return Err(missing_department().await);
    }

    let employees = state.employees.list_by_department(department).await?;
    Ok(Envelope::list(employees, "Employees by department"))
}

async fn missing_branch_id() -> AppError {
    super::missing_param("branchId")
}

async fn missing_department() -> AppError {
    AppError::bad_request("Missing department parameter")
}
