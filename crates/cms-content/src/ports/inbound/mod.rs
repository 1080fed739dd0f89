//! Inbound ports (Use case traits)

use async_trait::async_trait;
use cms_common::{ActorContext, CmsResult, EntityId, Page};

use crate::application::dto::*;

/// Document type use cases
#[async_trait]
pub trait DocumentTypeUseCases: Send + Sync {
    /// Create; title/slug collisions are rejected outright
    async fn create(
        &self,
        command: CreateDocumentTypeCommand,
        ctx: &ActorContext,
    ) -> CmsResult<DocumentTypeView>;

    async fn update(
        &self,
        id: &EntityId,
        command: UpdateDocumentTypeCommand,
        ctx: &ActorContext,
    ) -> CmsResult<DocumentTypeView>;

    /// Soft delete, refused while content references the type
    async fn deactivate(&self, id: &EntityId, ctx: &ActorContext) -> CmsResult<DocumentTypeView>;

    async fn toggle_active(&self, id: &EntityId, ctx: &ActorContext) -> CmsResult<DocumentTypeView>;

    async fn find_all(
        &self,
        ctx: &ActorContext,
        query: DocumentTypeQuery,
    ) -> CmsResult<Page<DocumentTypeView>>;

    /// Includes the most recent documents of the type
    async fn find_one(&self, id: &EntityId, ctx: &ActorContext) -> CmsResult<DocumentTypeView>;

    /// Active types only
    async fn find_by_slug(&self, slug: &str, ctx: &ActorContext) -> CmsResult<DocumentTypeView>;

    async fn documents_by_type(
        &self,
        id: &EntityId,
        ctx: &ActorContext,
        page: Option<u32>,
        limit: Option<u32>,
    ) -> CmsResult<Page<ContentSummary>>;

    /// First free slug for a new type
    async fn suggest_slug(
        &self,
        title: &str,
        slug: Option<&str>,
        ctx: &ActorContext,
    ) -> CmsResult<String>;
}

/// Content use cases
#[async_trait]
pub trait ContentUseCases: Send + Sync {
    /// Create; a taken slug gets a numeric suffix
    async fn create(&self, command: CreateContentCommand, ctx: &ActorContext)
        -> CmsResult<ContentView>;

    /// Update; category and tag sets are replaced wholesale
    async fn update(
        &self,
        id: &EntityId,
        command: UpdateContentCommand,
        ctx: &ActorContext,
    ) -> CmsResult<ContentView>;

    async fn find_all(&self, ctx: &ActorContext, query: ContentQuery) -> CmsResult<Page<ContentView>>;

    async fn find_one(&self, id: &EntityId, ctx: &ActorContext) -> CmsResult<ContentView>;

    async fn find_by_slug(&self, slug: &str, ctx: &ActorContext) -> CmsResult<ContentView>;

    async fn publish(&self, id: &EntityId, ctx: &ActorContext) -> CmsResult<ContentView>;

    /// Hard delete
    async fn remove(&self, id: &EntityId, ctx: &ActorContext) -> CmsResult<()>;
}
