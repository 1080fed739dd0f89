//! Form schemas for dynamic document types
//!
//! - Field definition model and its JSON wire shape
//! - Structural schema validator
//! - Form builder state machine used by editing sessions

#![warn(clippy::all)]

pub mod builder;
pub mod domain;

pub use builder::{
    Clipboard, ClipboardError, FieldPatch, FieldViewState, FormBuilder, MemoryClipboard,
    NameEditKey,
};
pub use domain::{
    DefaultValue, FieldDefinition, FieldType, FieldValidation, FormSchema, FormSchemaValidator,
    SchemaError,
};
