//! Slug scopes backed by the repositories

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::services::SlugScope;
use crate::domain::value_objects::EntityId;
use crate::ports::outbound::{ContentRepository, DocumentTypeRepository, RepoResult};

/// Content slugs: unique per organization, optionally ignoring one record
pub struct ContentSlugScope {
    contents: Arc<dyn ContentRepository>,
    organization_id: EntityId,
    exclude: Option<EntityId>,
}

impl ContentSlugScope {
    pub fn new(
        contents: Arc<dyn ContentRepository>,
        organization_id: EntityId,
        exclude: Option<EntityId>,
    ) -> Self {
        Self {
            contents,
            organization_id,
            exclude,
        }
    }
}

#[async_trait]
impl SlugScope for ContentSlugScope {
    async fn base_taken(&self, slug: &str) -> RepoResult<bool> {
        self.contents
            .slug_exists(&self.organization_id, slug, self.exclude.as_ref())
            .await
    }
}

/// Document type slugs: the requested slug collides on title or slug,
/// suffixed candidates on slug only
pub struct DocumentTypeSlugScope {
    doc_types: Arc<dyn DocumentTypeRepository>,
    organization_id: EntityId,
    title: String,
    exclude: Option<EntityId>,
}

impl DocumentTypeSlugScope {
    pub fn new(
        doc_types: Arc<dyn DocumentTypeRepository>,
        organization_id: EntityId,
        title: impl Into<String>,
        exclude: Option<EntityId>,
    ) -> Self {
        Self {
            doc_types,
            organization_id,
            title: title.into(),
            exclude,
        }
    }
}

#[async_trait]
impl SlugScope for DocumentTypeSlugScope {
    async fn base_taken(&self, slug: &str) -> RepoResult<bool> {
        let conflict = self
            .doc_types
            .find_conflict(
                &self.organization_id,
                Some(&self.title),
                Some(slug),
                self.exclude.as_ref(),
            )
            .await?;
        Ok(conflict.is_some())
    }

    async fn candidate_taken(&self, slug: &str) -> RepoResult<bool> {
        let conflict = self
            .doc_types
            .find_conflict(&self.organization_id, None, Some(slug), self.exclude.as_ref())
            .await?;
        Ok(conflict.is_some())
    }
}
