//! Request payload validation
//!
//! Payloads arrive as untyped JSON and are checked in two phases:
//!
//! 1. Structure, against the resource's field table: the body must be an
//!    object, unknown keys are rejected, required fields must be present
//!    (create only), and every field must be a JSON string. No coercion
//!    happens, so `"phone": 12345` is a type error rather than a pattern miss.
//! 2. Rules, declared on the DTO with `validator` attributes (lengths,
//!    phone pattern, email syntax).
//!
//! Every failing field is reported with one reason: its structural problem if
//! it has one, otherwise its first broken rule. Rules are checked on the
//! fields that are present strings even when other fields are missing or
//! mistyped. An `id` key is dropped before either phase.

use std::collections::HashMap;
use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};
use validator::{Validate, ValidationErrors};

/// Phone numbers: digits, dashes and spaces with an optional leading `+`, 7-20 chars
pub static PHONE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\+?[0-9\-\s]{7,20}$").expect("phone pattern must compile")
});

/// Pseudo-field used for failures that concern the body as a whole
pub const BODY_FIELD: &str = "body";

/// Whether a payload creates a record or patches an existing one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaMode {
    Create,
    /// Every field becomes optional; an empty object is a valid no-op patch
    Update,
}

/// One accepted field of a resource payload. All fields are JSON strings.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    /// Required on create; ignored on update
    pub required: bool,
}

impl FieldSpec {
    pub const fn required(name: &'static str) -> Self {
        Self { name, required: true }
    }

    pub const fn optional(name: &'static str) -> Self {
        Self { name, required: false }
    }
}

/// A DTO that can be produced from a raw payload
pub trait Validated: DeserializeOwned + Serialize + Validate {
    /// Accepted fields, in reporting order
    const FIELDS: &'static [FieldSpec];
    const MODE: SchemaMode;
    /// Same rules as `Self` with every field optional, checked against
    /// whichever fields are present even when others are missing or mistyped
    type Rules: DeserializeOwned + Validate;
}

/// A single violated field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// All violations found in one payload
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.push(FieldError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    /// Whether `field` has a reported violation
    pub fn contains(&self, field: &str) -> bool {
        self.0.iter().any(|e| e.field == field)
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<&str> = self.0.iter().map(|e| e.message.as_str()).collect();
        f.write_str(&messages.join("; "))
    }
}

impl std::error::Error for FieldErrors {}

/// Turn a raw JSON payload into a validated DTO
pub fn validate_payload<T: Validated>(payload: Value) -> Result<T, FieldErrors> {
    let mut errors = FieldErrors::new();

    let Value::Object(mut body) = payload else {
        errors.push(BODY_FIELD, "request body must be a JSON object");
        return Err(errors);
    };

    // Ids are store-assigned; a client-supplied one is silently dropped
    body.remove("id");

    for key in body.keys() {
        if !T::FIELDS.iter().any(|f| f.name == key) {
            errors.push(key.as_str(), format!("{} is not allowed", key));
        }
    }

    let rule_failures = rule_failures::<T>(&body);

    for spec in T::FIELDS {
        match body.get(spec.name) {
            None if spec.required && T::MODE == SchemaMode::Create => {
                errors.push(spec.name, format!("{} is required", spec.name));
            }
            None => {}
            Some(Value::String(_)) => {
                if let Some(message) = rule_failures.get(spec.name) {
                    errors.push(spec.name, message.as_str());
                }
            }
            Some(_) => errors.push(spec.name, format!("{} must be a string", spec.name)),
        }
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    let dto: T = serde_json::from_value(Value::Object(body)).map_err(|e| {
        let mut errors = FieldErrors::new();
        errors.push(BODY_FIELD, format!("request body is malformed: {}", e));
        errors
    })?;

    if let Err(rule_errors) = dto.validate() {
        for (field, message) in messages_by_field::<T>(&rule_errors) {
            errors.push(field, message);
        }
        return Err(errors);
    }

    Ok(dto)
}

/// Run the field rules over every known string-valued field, whatever else
/// is wrong with the payload
fn rule_failures<T: Validated>(body: &Map<String, Value>) -> HashMap<&'static str, String> {
    let strings: Map<String, Value> = body
        .iter()
        .filter(|(key, value)| {
            value.is_string() && T::FIELDS.iter().any(|f| f.name == key.as_str())
        })
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();

    match serde_json::from_value::<T::Rules>(Value::Object(strings)) {
        Ok(rules) => match rules.validate() {
            Ok(()) => HashMap::new(),
            Err(rule_errors) => messages_by_field::<T>(&rule_errors).into_iter().collect(),
        },
        // Left to the typed deserialization below to report
        Err(_) => HashMap::new(),
    }
}

/// First rule message per failing field, keyed by wire name, in field order
fn messages_by_field<T: Validated>(rule_errors: &ValidationErrors) -> Vec<(&'static str, String)> {
    let by_field = rule_errors.field_errors();
    T::FIELDS
        .iter()
        .filter_map(|spec| {
            let failures = by_field
                .iter()
                .find(|(key, _)| same_field(spec.name, key))
                .map(|(_, failures)| *failures)?;
            let message = failures
                .first()
                .and_then(|e| e.message.as_ref())
                .map(|m| m.to_string())
                .unwrap_or_else(|| format!("{} is invalid", spec.name));
            Some((spec.name, message))
        })
        .collect()
}

/// `validator` reports Rust field names (`branch_id`) while payloads use the
/// wire names (`branchId`)
fn same_field(wire_name: &str, rust_name: &str) -> bool {
    let strip = |s: &str| s.replace('_', "").to_ascii_lowercase();
    strip(wire_name) == strip(rust_name)
}

/// Normalize an id taken from the request path. Empty or blank ids are rejected.
pub fn normalize_id(raw: &str) -> Option<&str> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}
