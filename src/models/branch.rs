//! Branch model

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::db::Record;
use crate::utils::validation::{FieldSpec, SchemaMode, Validated, PHONE_REGEX};

/// Fields accepted in branch payloads
const BRANCH_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("name"),
    FieldSpec::required("address"),
    FieldSpec::optional("phone"),
];

/// A bank branch as stored and returned by the API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Branch {
    pub id: String,
    pub name: String,
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl Record for Branch {
    const COLLECTION: &'static str = "branches";
}

/// Request to create a branch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct CreateBranchRequest {
    #[validate(length(min = 2, max = 80, message = "name must be between 2 and 80 characters"))]
    pub name: String,
    #[validate(length(
        min = 5,
        max = 200,
        message = "address must be between 5 and 200 characters"
    ))]
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(regex(
        path = *PHONE_REGEX,
        message = "phone must be digits/spaces/dashes and 7-20 chars"
    ))]
    pub phone: Option<String>,
}

impl Validated for CreateBranchRequest {
    const FIELDS: &'static [FieldSpec] = BRANCH_FIELDS;
    const MODE: SchemaMode = SchemaMode::Create;
    type Rules = UpdateBranchRequest;
}

/// Partial update of a branch; absent fields are left untouched
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct UpdateBranchRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 2, max = 80, message = "name must be between 2 and 80 characters"))]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(
        min = 5,
        max = 200,
        message = "address must be between 5 and 200 characters"
    ))]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(regex(
        path = *PHONE_REGEX,
        message = "phone must be digits/spaces/dashes and 7-20 chars"
    ))]
    pub phone: Option<String>,
}

impl Validated for UpdateBranchRequest {
    const FIELDS: &'static [FieldSpec] = BRANCH_FIELDS;
    const MODE: SchemaMode = SchemaMode::Update;
    type Rules = Self;
}
