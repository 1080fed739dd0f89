//! Outbound ports (Repository traits)
//!
//! Interfaces the persistence layer must implement. Every lookup is scoped
//! to one organization; a record outside it behaves exactly like a missing one.

use async_trait::async_trait;
use cms_common::{CmsError, Pagination};

use crate::domain::aggregates::{
    Category, Content, ContentStatus, DocumentType, OrganizationSummary, Tag, UserSummary,
};
use crate::domain::value_objects::EntityId;

/// Repository result type
pub type RepoResult<T> = Result<T, RepositoryError>;

/// Repository errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RepositoryError {
    #[error("duplicate key: {0}")]
    DuplicateKey(String),

    #[error("record missing: {0}")]
    Missing(String),

    #[error("connection error: {0}")]
    Connection(String),

    #[error("query error: {0}")]
    Query(String),
}

impl From<RepositoryError> for CmsError {
    fn from(err: RepositoryError) -> Self {
        CmsError::Storage(err.to_string())
    }
}

/// Document type listing filter
#[derive(Clone, Debug, Default)]
pub struct DocumentTypeFilter {
    /// Case-insensitive substring over title, description and slug
    pub search: Option<String>,
    pub is_active: Option<bool>,
}

impl DocumentTypeFilter {
    pub fn matches(&self, doc_type: &DocumentType) -> bool {
        if let Some(active) = self.is_active {
            if doc_type.is_active() != active {
                return false;
            }
        }
        match self.search.as_deref().map(str::to_lowercase) {
            Some(needle) if !needle.is_empty() => {
                doc_type.title().to_lowercase().contains(&needle)
                    || doc_type.slug().to_lowercase().contains(&needle)
                    || doc_type
                        .description()
                        .is_some_and(|d| d.to_lowercase().contains(&needle))
            }
            _ => true,
        }
    }
}

/// Content listing filter
#[derive(Clone, Debug, Default)]
pub struct ContentFilter {
    pub document_type_id: Option<EntityId>,
    pub status: Option<ContentStatus>,
    pub category_id: Option<EntityId>,
    pub tag_id: Option<EntityId>,
}

impl ContentFilter {
    pub fn by_document_type(document_type_id: EntityId) -> Self {
        Self {
            document_type_id: Some(document_type_id),
            ..Default::default()
        }
    }

    /// Checks against a hydrated record
    pub fn matches(&self, content: &Content) -> bool {
        self.document_type_id
            .as_ref()
            .map_or(true, |id| content.document_type_id() == Some(id))
            && self.status.map_or(true, |s| content.status() == s)
            && self
                .category_id
                .as_ref()
                .map_or(true, |id| content.category_ids().contains(id))
            && self
                .tag_id
                .as_ref()
                .map_or(true, |id| content.tag_ids().contains(id))
    }
}

/// Document type repository port
#[async_trait]
pub trait DocumentTypeRepository: Send + Sync {
    /// Find by id within the organization
    async fn find_by_id(&self, org: &EntityId, id: &EntityId) -> RepoResult<Option<DocumentType>>;

    /// Find by slug within the organization, active or not
    async fn find_by_slug(&self, org: &EntityId, slug: &str) -> RepoResult<Option<DocumentType>>;

    /// First record whose title equals `title` or whose slug equals `slug`,
    /// ignoring `exclude`
    async fn find_conflict(
        &self,
        org: &EntityId,
        title: Option<&str>,
        slug: Option<&str>,
        exclude: Option<&EntityId>,
    ) -> RepoResult<Option<DocumentType>>;

    /// One page, newest first, plus the unpaged total
    async fn list(
        &self,
        org: &EntityId,
        filter: &DocumentTypeFilter,
        page: Pagination,
    ) -> RepoResult<(Vec<DocumentType>, u64)>;

    async fn create(&self, doc_type: &DocumentType) -> RepoResult<()>;

    async fn update(&self, doc_type: &DocumentType) -> RepoResult<()>;
}

/// Content repository port
#[async_trait]
pub trait ContentRepository: Send + Sync {
    async fn find_by_id(&self, org: &EntityId, id: &EntityId) -> RepoResult<Option<Content>>;

    async fn find_by_slug(&self, org: &EntityId, slug: &str) -> RepoResult<Option<Content>>;

    /// Whether `slug` is used in the organization by any record but `exclude`
    async fn slug_exists(
        &self,
        org: &EntityId,
        slug: &str,
        exclude: Option<&EntityId>,
    ) -> RepoResult<bool>;

    /// One page, newest first, plus the unpaged total
    async fn list(
        &self,
        org: &EntityId,
        filter: &ContentFilter,
        page: Pagination,
    ) -> RepoResult<(Vec<Content>, u64)>;

    async fn count_by_document_type(&self, org: &EntityId, document_type_id: &EntityId)
        -> RepoResult<u64>;

    /// Newest `limit` records of a document type
    async fn recent_by_document_type(
        &self,
        org: &EntityId,
        document_type_id: &EntityId,
        limit: usize,
    ) -> RepoResult<Vec<Content>>;

    /// Insert the record together with its category and tag links
    async fn create(&self, content: &Content) -> RepoResult<()>;

    /// Write scalar members only; links are managed through [`TaxonomyRepository`]
    async fn update(&self, content: &Content) -> RepoResult<()>;

    /// Hard delete, links included
    async fn delete(&self, org: &EntityId, id: &EntityId) -> RepoResult<()>;
}

/// Category/tag catalogue and content links
#[async_trait]
pub trait TaxonomyRepository: Send + Sync {
    /// Categories of the organization among `ids`; unknown ids are skipped
    async fn find_categories(&self, org: &EntityId, ids: &[EntityId]) -> RepoResult<Vec<Category>>;

    /// Tags of the organization among `ids`; unknown ids are skipped
    async fn find_tags(&self, org: &EntityId, ids: &[EntityId]) -> RepoResult<Vec<Tag>>;

    async fn delete_content_categories(&self, content_id: &EntityId) -> RepoResult<()>;

    async fn delete_content_tags(&self, content_id: &EntityId) -> RepoResult<()>;

    async fn attach_categories(&self, content_id: &EntityId, ids: &[EntityId]) -> RepoResult<()>;

    async fn attach_tags(&self, content_id: &EntityId, ids: &[EntityId]) -> RepoResult<()>;
}

/// Users and organizations, read-only
#[async_trait]
pub trait DirectoryRepository: Send + Sync {
    async fn find_user(&self, id: &EntityId) -> RepoResult<Option<UserSummary>>;

    async fn find_organization(&self, id: &EntityId) -> RepoResult<Option<OrganizationSummary>>;
}
