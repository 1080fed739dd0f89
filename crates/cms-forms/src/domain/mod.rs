//! Forms domain: field model and structural validation

pub mod validator;
pub mod value_objects;

pub use validator::{FormSchemaValidator, SchemaError};
pub use value_objects::*;
