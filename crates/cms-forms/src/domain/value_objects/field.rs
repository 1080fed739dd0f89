//! Field definition value objects
//!
//! The atomic unit of a form schema. Construction never validates; the
//! structural rules live in [`crate::domain::validator`].

use serde::{Deserialize, Serialize};
use serde_json::Number;
use std::fmt;

/// Closed set of field kinds
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Textarea,
    Number,
    Email,
    Date,
    Checkbox,
    Select,
}

impl FieldType {
    /// Every kind, in picker order
    pub const ALL: [FieldType; 7] = [
        FieldType::Text,
        FieldType::Textarea,
        FieldType::Number,
        FieldType::Email,
        FieldType::Date,
        FieldType::Checkbox,
        FieldType::Select,
    ];

    /// Wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Textarea => "textarea",
            Self::Number => "number",
            Self::Email => "email",
            Self::Date => "date",
            Self::Checkbox => "checkbox",
            Self::Select => "select",
        }
    }

    /// Parse a wire name; anything outside the closed set is `None`
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == value)
    }

    /// Comma-separated list of valid wire names
    pub fn valid_names() -> String {
        Self::ALL
            .iter()
            .map(FieldType::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }

}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Default value: string, number or boolean
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DefaultValue {
    Flag(bool),
    Number(Number),
    Text(String),
}

impl From<&str> for DefaultValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<bool> for DefaultValue {
    fn from(value: bool) -> Self {
        Self::Flag(value)
    }
}

impl From<i64> for DefaultValue {
    fn from(value: i64) -> Self {
        Self::Number(value.into())
    }
}

/// Optional validation rules attached to a field.
///
/// Numbers are kept as JSON numbers so `5` stays `5` and `2.5` stays `2.5`
/// when the schema is written back out.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldValidation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_error_message: Option<String>,
}

impl FieldValidation {
    pub fn min_length_value(&self) -> Option<f64> {
        self.min_length.as_ref().and_then(Number::as_f64)
    }

    pub fn max_length_value(&self) -> Option<f64> {
        self.max_length.as_ref().and_then(Number::as_f64)
    }

    pub fn min_value(&self) -> Option<f64> {
        self.min.as_ref().and_then(Number::as_f64)
    }

    pub fn max_value(&self) -> Option<f64> {
        self.max.as_ref().and_then(Number::as_f64)
    }
}

/// One schema entry
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDefinition {
    /// Stable identifier, assigned once by the client
    pub id: String,
    /// Storage key for submitted values
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<DefaultValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<FieldValidation>,
}

impl FieldDefinition {
    /// Minimal field with the four mandatory members
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        field_type: FieldType,
        label: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            field_type,
            label: label.into(),
            placeholder: None,
            required: None,
            default_value: None,
            options: None,
            validation: None,
        }
    }

    /// Fresh field as the builder adds it: new UUID, `text`, not required.
    ///
    /// The name starts empty, so a schema holding an unedited field fails
    /// validation on the required members until the user names it.
    pub fn empty() -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: String::new(),
            field_type: FieldType::Text,
            label: "New Field".into(),
            placeholder: Some(String::new()),
            required: Some(false),
            default_value: Some(DefaultValue::Text(String::new())),
            options: Some(Vec::new()),
            validation: Some(FieldValidation::default()),
        }
    }

    pub fn with_validation(mut self, validation: FieldValidation) -> Self {
        self.validation = Some(validation);
        self
    }

    pub fn is_required(&self) -> bool {
        self.required.unwrap_or(false)
    }

    pub fn options(&self) -> &[String] {
        self.options.as_deref().unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_field_type_parse() {
        assert_eq!(FieldType::parse("select"), Some(FieldType::Select));
        assert_eq!(FieldType::parse("Select"), None);
        assert_eq!(FieldType::parse("file"), None);
        assert_eq!(
            FieldType::valid_names(),
            "text, textarea, number, email, date, checkbox, select"
        );
    }

    #[test]
    fn test_empty_field() {
        let a = FieldDefinition::empty();
        let b = FieldDefinition::empty();
        assert_ne!(a.id, b.id);
        assert!(a.name.is_empty());
        assert_eq!(a.field_type, FieldType::Text);
        assert!(!a.is_required());
        assert!(a.options().is_empty());
    }

    #[test]
    fn test_wire_shape() {
        let value = json!({
            "id": "f1",
            "name": "age",
            "type": "number",
            "label": "Age",
            "required": true,
            "defaultValue": 18,
            "validation": { "min": 0, "max": 120.5 }
        });
        let field: FieldDefinition = serde_json::from_value(value.clone()).unwrap();
        assert_eq!(field.field_type, FieldType::Number);
        assert_eq!(field.default_value, Some(DefaultValue::from(18)));
        assert_eq!(field.validation.as_ref().unwrap().max_value(), Some(120.5));
        assert_eq!(serde_json::to_value(&field).unwrap(), value);
    }

    #[test]
    fn test_default_value_variants() {
        let flag: DefaultValue = serde_json::from_value(json!(true)).unwrap();
        let text: DefaultValue = serde_json::from_value(json!("John")).unwrap();
        assert_eq!(flag, DefaultValue::Flag(true));
        assert_eq!(text, DefaultValue::from("John"));
    }
}
