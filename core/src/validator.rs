//! Structural checks on response payloads.
//!
//! # Design
//! Factories never index raw JSON. They declare the fields they need as a
//! slice of `FieldRule`s and receive a `ValidatedFields` whose getters are
//! typed; or they deserialize it straight into their own struct. A missing
//! or mistyped field surfaces as `UnexpectedResponseContent` naming the
//! field. Only presence and primitive kind are checked here; value ranges
//! and cross-field rules stay with the factory.

use std::fmt;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ApiError;
use crate::response::JsonObject;

/// The JSON kind a field must have.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    String,
    Integer,
    /// Any JSON number; integral values qualify.
    Float,
    Boolean,
    Mapping,
    Sequence,
}

impl FieldKind {
    pub fn matches(self, value: &Value) -> bool {
        match self {
            FieldKind::String => value.is_string(),
            FieldKind::Integer => value.is_i64() || value.is_u64(),
            FieldKind::Float => value.is_number(),
            FieldKind::Boolean => value.is_boolean(),
            FieldKind::Mapping => value.is_object(),
            FieldKind::Sequence => value.is_array(),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FieldKind::String => "string",
            FieldKind::Integer => "integer",
            FieldKind::Float => "float",
            FieldKind::Boolean => "boolean",
            FieldKind::Mapping => "mapping",
            FieldKind::Sequence => "sequence",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One required field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldRule {
    pub name: &'static str,
    pub kind: FieldKind,
}

impl FieldRule {
    pub const fn new(name: &'static str, kind: FieldKind) -> Self {
        Self { name, kind }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseFieldValidator;

impl ResponseFieldValidator {
    pub fn new() -> Self {
        Self
    }

    pub fn require_field<'a>(&self, data: &'a JsonObject, name: &str, kind: FieldKind) -> Result<&'a Value, ApiError> {
        match data.get(name) {
            Some(value) if kind.matches(value) => Ok(value),
            Some(_) => Err(ApiError::content(name, format!("expected {kind}"))),
            None => Err(ApiError::content(name, format!("missing {kind}"))),
        }
    }

    /// Checks rules in order and stops at the first violation.
    pub fn require_fields(&self, data: &JsonObject, rules: &[FieldRule]) -> Result<ValidatedFields, ApiError> {
        let mut fields = JsonObject::new();
        for rule in rules {
            let value = self.require_field(data, rule.name, rule.kind)?;
            fields.insert(rule.name.to_string(), value.clone());
        }
        Ok(ValidatedFields { fields })
    }

    /// Validate, then deserialize the validated fields into `T`.
    pub fn decode<T: DeserializeOwned>(&self, data: &JsonObject, rules: &[FieldRule]) -> Result<T, ApiError> {
        self.require_fields(data, rules)?.deserialize()
    }
}

/// Fields that passed validation, with typed access.
///
/// Getters only see fields named by the rules that produced this value.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedFields {
    fields: JsonObject,
}

impl ValidatedFields {
    fn field(&self, name: &str, kind: FieldKind) -> Result<&Value, ApiError> {
        self.fields
            .get(name)
            .filter(|value| kind.matches(value))
            .ok_or_else(|| ApiError::content(name, format!("{kind} field was not validated")))
    }

    pub fn str(&self, name: &str) -> Result<&str, ApiError> {
        self.field(name, FieldKind::String)?
            .as_str()
            .ok_or_else(|| ApiError::content(name, "expected string"))
    }

    pub fn i64(&self, name: &str) -> Result<i64, ApiError> {
        self.field(name, FieldKind::Integer)?
            .as_i64()
            .ok_or_else(|| ApiError::content(name, "integer out of range"))
    }

    pub fn f64(&self, name: &str) -> Result<f64, ApiError> {
        self.field(name, FieldKind::Float)?
            .as_f64()
            .ok_or_else(|| ApiError::content(name, "expected float"))
    }

    pub fn bool(&self, name: &str) -> Result<bool, ApiError> {
        self.field(name, FieldKind::Boolean)?
            .as_bool()
            .ok_or_else(|| ApiError::content(name, "expected boolean"))
    }

    pub fn object(&self, name: &str) -> Result<&JsonObject, ApiError> {
        self.field(name, FieldKind::Mapping)?
            .as_object()
            .ok_or_else(|| ApiError::content(name, "expected mapping"))
    }

    pub fn list(&self, name: &str) -> Result<&[Value], ApiError> {
        self.field(name, FieldKind::Sequence)?
            .as_array()
            .map(Vec::as_slice)
            .ok_or_else(|| ApiError::content(name, "expected sequence"))
    }

    pub fn deserialize<T: DeserializeOwned>(self) -> Result<T, ApiError> {
        serde_json::from_value(Value::Object(self.fields)).map_err(|e| ApiError::content("data", e.to_string()))
    }

    pub fn into_inner(self) -> JsonObject {
        self.fields
    }
}
