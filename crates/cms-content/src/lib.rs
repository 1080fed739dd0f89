//! OpenSASE CMS Content Engine
//!
//! Tenant-defined document types and the content that instantiates them.
//!
//! ## Architecture
//!
//! - **Domain Layer**: DocumentType and Content aggregates, slug rules, slug allocator
//! - **Application Layer**: Use case orchestration, commands and views
//! - **Ports Layer**: Use case traits and repository interfaces
//! - **Infrastructure Layer**: In-memory repositories, taxonomy cache
//!
//! ## Slugs
//!
//! Document type slugs are checked and a collision is a conflict. Content
//! slugs are allocated: a taken slug gets the first free numeric suffix.

#![warn(clippy::all)]

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod ports;

// Re-exports for convenience
pub use application::{ContentService, DocumentTypeService};
pub use domain::aggregates::{
    Category, Content, ContentStatus, DocumentType, OrganizationSummary, Tag, UserSummary,
};
pub use domain::services::{SlugAllocator, SlugScope};
pub use domain::value_objects::{is_valid_slug, slugify, EntityId};
pub use infrastructure::{
    InMemoryContentStore, InMemoryDirectory, InMemoryDocumentTypeRepository, TaxonomyCache,
};
pub use ports::inbound::{ContentUseCases, DocumentTypeUseCases};
pub use ports::outbound::{
    ContentRepository, DirectoryRepository, DocumentTypeRepository, RepositoryError,
    TaxonomyRepository,
};
