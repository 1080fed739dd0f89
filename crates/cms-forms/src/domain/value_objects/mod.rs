//! Forms value objects

pub mod field;
pub mod schema;

pub use field::{DefaultValue, FieldDefinition, FieldType, FieldValidation};
pub use schema::FormSchema;
