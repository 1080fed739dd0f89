//! Command handlers
//!
//! Application services that orchestrate use cases.

mod content;
mod document_types;

pub use content::ContentService;
pub use document_types::{DocumentTypeService, CONFLICT_MESSAGE, IN_USE_MESSAGE};
