//! Infrastructure layer

pub mod cache;
pub mod persistence;

pub use cache::TaxonomyCache;
pub use persistence::{InMemoryContentStore, InMemoryDirectory, InMemoryDocumentTypeRepository};
