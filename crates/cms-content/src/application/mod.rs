//! Application layer
//!
//! Orchestrates use cases and coordinates domain objects.

pub mod commands;
pub mod dto;
mod relations;
pub mod scopes;

pub use commands::{ContentService, DocumentTypeService};
pub use dto::*;
