//! Canonical form schema types
//!
//! Everything downstream of the normalizer (store, submission builder,
//! API handlers) operates on these types only; raw backend output never
//! crosses that boundary.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Input control kind for a form field.
///
/// Backends are free to emit arbitrary `type` values; anything outside
/// the known set deserializes as [`FieldType::Text`], as does an absent
/// `type`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    #[default]
    Text,
    Textarea,
    Email,
    Number,
}

impl FieldType {
    fn parse(s: &str) -> Self {
        match s {
            "textarea" => FieldType::Textarea,
            "email" => FieldType::Email,
            "number" => FieldType::Number,
            _ => FieldType::Text,
        }
    }
}

impl<'de> Deserialize<'de> for FieldType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        // Lenient on purpose: a non-string `type` is just as
        // unrecognized as an unknown string.
        let value = Value::deserialize(deserializer)?;
        Ok(value.as_str().map(FieldType::parse).unwrap_or_default())
    }
}

/// A single field in a generated form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormField {
    /// Unique identifier within the schema. Must be non-empty.
    pub name: String,
    /// Display text shown next to the input control.
    pub label: String,
    #[serde(rename = "type", default)]
    pub field_type: FieldType,
    #[serde(default)]
    pub required: bool,
    /// Opaque backend-defined annotation, carried through unmodified
    /// into the submission payload.
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub meta: Value,
}

/// A normalized form description: optional title plus an ordered list of
/// fields with pairwise distinct names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormSchema {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub fields: Vec<FormField>,
}

impl FormSchema {
    /// Look up a field by name.
    pub fn field(&self, name: &str) -> Option<&FormField> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.field(name).is_some()
    }
}

/// Live user input, keyed by field name. Keys are a subset of the active
/// schema's field names; an absent key means the empty string.
pub type FormValues = HashMap<String, String>;

/// Final submission: field name mapped to `{value, meta}` for every
/// schema field exactly once, in schema order. `serde_json` is built
/// with `preserve_order`, so insertion order survives serialization.
pub type SubmissionPayload = serde_json::Map<String, Value>;
