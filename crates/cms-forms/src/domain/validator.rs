//! Structural validation of form schemas
//!
//! One left-to-right pass over the field list with two running sets (names
//! seen, ids seen). The first violation wins, so the reported error depends
//! only on field order. Raw JSON is checked before it is decoded into typed
//! [`FieldDefinition`]s so that rule messages take precedence over decoder
//! messages.

use std::collections::HashSet;

use cms_common::CmsError;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use super::value_objects::{FieldDefinition, FieldType, FormSchema};

/// First structural violation found in a schema
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("Invalid form schema: fields must be an array")]
    FieldsNotArray,

    #[error("Invalid field: id, name, type, and label are required")]
    MissingMembers { index: usize, name: Option<String> },

    #[error("Duplicate field name: {name}")]
    DuplicateName { name: String },

    #[error("Duplicate field ID: {id}")]
    DuplicateId { id: String, name: String },

    #[error("Invalid field type: {found}. Valid types are: {}", FieldType::valid_names())]
    InvalidType { name: String, found: String },

    #[error("Select fields must have at least one option")]
    SelectWithoutOptions { name: String },

    #[error("minLength must be non-negative")]
    NegativeMinLength { name: String },

    #[error("maxLength must be non-negative")]
    NegativeMaxLength { name: String },

    #[error("minLength cannot be greater than maxLength")]
    LengthBounds { name: String },

    #[error("min cannot be greater than max")]
    ValueBounds { name: String },

    #[error("Invalid field {name}: {reason}")]
    Malformed { name: String, reason: String },
}

impl SchemaError {
    /// Name of the offending field, when one is known
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::FieldsNotArray => None,
            Self::MissingMembers { name, .. } => name.as_deref(),
            Self::DuplicateName { name }
            | Self::DuplicateId { name, .. }
            | Self::InvalidType { name, .. }
            | Self::SelectWithoutOptions { name }
            | Self::NegativeMinLength { name }
            | Self::NegativeMaxLength { name }
            | Self::LengthBounds { name }
            | Self::ValueBounds { name }
            | Self::Malformed { name, .. } => Some(name),
        }
    }

    /// Stable rule code
    pub fn rule(&self) -> &'static str {
        match self {
            Self::FieldsNotArray => "fields_not_array",
            Self::MissingMembers { .. } => "required_members",
            Self::DuplicateName { .. } => "duplicate_name",
            Self::DuplicateId { .. } => "duplicate_id",
            Self::InvalidType { .. } => "invalid_type",
            Self::SelectWithoutOptions { .. } => "select_options",
            Self::NegativeMinLength { .. } => "min_length_negative",
            Self::NegativeMaxLength { .. } => "max_length_negative",
            Self::LengthBounds { .. } => "length_bounds",
            Self::ValueBounds { .. } => "value_bounds",
            Self::Malformed { .. } => "malformed_field",
        }
    }
}

impl From<SchemaError> for CmsError {
    fn from(err: SchemaError) -> Self {
        CmsError::ValidationFailed {
            message: err.to_string(),
            field: err.field().map(str::to_string),
            rule: Some(err.rule().to_string()),
        }
    }
}

#[derive(Default)]
struct Bounds {
    min_length: Option<f64>,
    max_length: Option<f64>,
    min: Option<f64>,
    max: Option<f64>,
}

/// The members the rules look at, borrowed from either raw JSON or a typed field
struct FieldProbe<'a> {
    id: Option<&'a str>,
    name: Option<&'a str>,
    kind: Option<&'a str>,
    label: Option<&'a str>,
    option_count: usize,
    bounds: Option<Bounds>,
}

fn non_empty(value: &str) -> Option<&str> {
    (!value.is_empty()).then_some(value)
}

impl<'a> FieldProbe<'a> {
    fn from_value(value: &'a Value) -> Self {
        let text = |key: &str| value.get(key).and_then(Value::as_str).and_then(non_empty);
        let bounds = value
            .get("validation")
            .and_then(Value::as_object)
            .map(|rules| {
                let number = |key: &str| rules.get(key).and_then(Value::as_f64);
                Bounds {
                    min_length: number("minLength"),
                    max_length: number("maxLength"),
                    min: number("min"),
                    max: number("max"),
                }
            });

        Self {
            id: text("id"),
            name: text("name"),
            kind: text("type"),
            label: text("label"),
            option_count: value
                .get("options")
                .and_then(Value::as_array)
                .map_or(0, Vec::len),
            bounds,
        }
    }

    fn from_field(field: &'a FieldDefinition) -> Self {
        Self {
            id: non_empty(&field.id),
            name: non_empty(&field.name),
            kind: Some(field.field_type.as_str()),
            label: non_empty(&field.label),
            option_count: field.options().len(),
            bounds: field.validation.as_ref().map(|rules| Bounds {
                min_length: rules.min_length_value(),
                max_length: rules.max_length_value(),
                min: rules.min_value(),
                max: rules.max_value(),
            }),
        }
    }
}

fn check_bounds(name: &str, bounds: &Bounds) -> Result<(), SchemaError> {
    let owned = || name.to_string();

    if bounds.min_length.is_some_and(|v| v < 0.0) {
        return Err(SchemaError::NegativeMinLength { name: owned() });
    }
    if bounds.max_length.is_some_and(|v| v < 0.0) {
        return Err(SchemaError::NegativeMaxLength { name: owned() });
    }
    if let (Some(lo), Some(hi)) = (bounds.min_length, bounds.max_length) {
        if lo > hi {
            return Err(SchemaError::LengthBounds { name: owned() });
        }
    }
    if let (Some(lo), Some(hi)) = (bounds.min, bounds.max) {
        if lo > hi {
            return Err(SchemaError::ValueBounds { name: owned() });
        }
    }
    Ok(())
}

fn check<'a>(probes: impl IntoIterator<Item = FieldProbe<'a>>) -> Result<(), SchemaError> {
    let mut names: HashSet<&str> = HashSet::new();
    let mut ids: HashSet<&str> = HashSet::new();

    for (index, probe) in probes.into_iter().enumerate() {
        let (Some(id), Some(name), Some(kind), Some(_)) =
            (probe.id, probe.name, probe.kind, probe.label)
        else {
            return Err(SchemaError::MissingMembers {
                index,
                name: probe.name.map(str::to_string),
            });
        };

        if !names.insert(name) {
            return Err(SchemaError::DuplicateName { name: name.into() });
        }
        if !ids.insert(id) {
            return Err(SchemaError::DuplicateId {
                id: id.into(),
                name: name.into(),
            });
        }

        let Some(field_type) = FieldType::parse(kind) else {
            return Err(SchemaError::InvalidType {
                name: name.into(),
                found: kind.into(),
            });
        };

        if field_type == FieldType::Select && probe.option_count == 0 {
            return Err(SchemaError::SelectWithoutOptions { name: name.into() });
        }

        if let Some(bounds) = &probe.bounds {
            check_bounds(name, bounds)?;
        }
    }
    Ok(())
}

/// Form schema validator
pub struct FormSchemaValidator;

impl FormSchemaValidator {
    /// Validate a whole schema document (`{ "fields": [...] }`)
    pub fn validate_document(document: &Value) -> Result<FormSchema, SchemaError> {
        let fields = document
            .get("fields")
            .filter(|fields| fields.is_array())
            .ok_or(SchemaError::FieldsNotArray)?;
        Self::validate_fields(fields)
    }

    /// Validate a bare field list and decode it
    pub fn validate_fields(fields: &Value) -> Result<FormSchema, SchemaError> {
        let items = fields.as_array().ok_or(SchemaError::FieldsNotArray)?;
        check(items.iter().map(FieldProbe::from_value))?;

        let fields = items
            .iter()
            .map(|item| {
                FieldDefinition::deserialize(item).map_err(|e| SchemaError::Malformed {
                    name: item
                        .get("name")
                        .and_then(Value::as_str)
                        .unwrap_or_default()
                        .to_string(),
                    reason: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(FormSchema::new(fields))
    }

    /// Validate an already-typed schema
    pub fn validate(schema: &FormSchema) -> Result<(), SchemaError> {
        check(schema.fields().iter().map(FieldProbe::from_field))
    }
}
