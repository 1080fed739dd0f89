//! API Routes

pub mod content;
pub mod document_types;
pub mod health;
