//! Employee model

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::db::Record;
use crate::utils::validation::{FieldSpec, SchemaMode, Validated, PHONE_REGEX};

/// Fields accepted in employee payloads
const EMPLOYEE_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("name"),
    FieldSpec::required("position"),
    FieldSpec::required("department"),
    FieldSpec::required("email"),
    FieldSpec::optional("phone"),
    FieldSpec::required("branchId"),
];

/// An employee as stored and returned by the API.
///
/// `branch_id` refers to a [`Branch`](super::Branch) id but is not checked
/// against the branches collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: String,
    pub name: String,
    pub position: String,
    pub department: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub branch_id: String,
}

impl Record for Employee {
    const COLLECTION: &'static str = "employees";
}

/// Request to create an employee
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateEmployeeRequest {
    #[validate(length(min = 2, max = 80, message = "name must be between 2 and 80 characters"))]
    pub name: String,
    #[validate(length(
        min = 2,
        max = 80,
        message = "position must be between 2 and 80 characters"
    ))]
    pub position: String,
    #[validate(length(
        min = 2,
        max = 80,
        message = "department must be between 2 and 80 characters"
    ))]
    pub department: String,
    #[validate(email(message = "email must be valid"))]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(regex(
        path = *PHONE_REGEX,
        message = "phone must be digits/spaces/dashes and 7-20 chars"
    ))]
    pub phone: Option<String>,
    #[validate(length(min = 1, message = "branchId must not be empty"))]
    pub branch_id: String,
}

impl Validated for CreateEmployeeRequest {
    const FIELDS: &'static [FieldSpec] = EMPLOYEE_FIELDS;
    const MODE: SchemaMode = SchemaMode::Create;
    type Rules = UpdateEmployeeRequest;
}

/// Partial update of an employee; absent fields are left untouched
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEmployeeRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 2, max = 80, message = "name must be between 2 and 80 characters"))]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(
        min = 2,
        max = 80,
        message = "position must be between 2 and 80 characters"
    ))]
    pub position: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(
        min = 2,
        max = 80,
        message = "department must be between 2 and 80 characters"
    ))]
    pub department: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(email(message = "email must be valid"))]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(regex(
        path = *PHONE_REGEX,
        message = "phone must be digits/spaces/dashes and 7-20 chars"
    ))]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, message = "branchId must not be empty"))]
    pub branch_id: Option<String>,
}

impl Validated for UpdateEmployeeRequest {
    const FIELDS: &'static [FieldSpec] = EMPLOYEE_FIELDS;
    const MODE: SchemaMode = SchemaMode::Update;
    type Rules = Self;
}
