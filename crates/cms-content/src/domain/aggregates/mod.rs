//! Aggregates
//!
//! Consistency boundaries for document types and content.

pub mod content;
pub mod document_type;
pub mod taxonomy;

pub use content::{Content, ContentStatus};
pub use document_type::{DocumentType, DocumentTypeChanges};
pub use taxonomy::{Category, OrganizationSummary, Tag, UserSummary};
