//! Content application service

use std::sync::Arc;

use async_trait::async_trait;
use cms_common::{ActorContext, CmsError, CmsResult, EntityId, Page, Pagination};
use serde_json::Value;
use tracing::{debug, info};

use crate::application::dto::*;
use crate::application::relations::audit_relations;
use crate::application::scopes::ContentSlugScope;
use crate::domain::aggregates::{Category, Content, Tag};
use crate::domain::services::SlugAllocator;
use crate::infrastructure::cache::TaxonomyCache;
use crate::ports::inbound::ContentUseCases;
use crate::ports::outbound::{
    ContentFilter, ContentRepository, DirectoryRepository, DocumentTypeRepository,
    TaxonomyRepository,
};

const ENTITY: &str = "Content";

/// Content application service
pub struct ContentService {
    contents: Arc<dyn ContentRepository>,
    taxonomy: Arc<dyn TaxonomyRepository>,
    doc_types: Arc<dyn DocumentTypeRepository>,
    directory: Arc<dyn DirectoryRepository>,
    cache: TaxonomyCache,
}

impl ContentService {
    pub fn new(
        contents: Arc<dyn ContentRepository>,
        taxonomy: Arc<dyn TaxonomyRepository>,
        doc_types: Arc<dyn DocumentTypeRepository>,
        directory: Arc<dyn DirectoryRepository>,
        cache: TaxonomyCache,
    ) -> Self {
        Self {
            contents,
            taxonomy,
            doc_types,
            directory,
            cache,
        }
    }

    async fn load(&self, id: &EntityId, ctx: &ActorContext) -> CmsResult<Content> {
        self.contents
            .find_by_id(ctx.organization_id(), id)
            .await?
            .ok_or(CmsError::not_found(ENTITY))
    }

    async fn require_document_type(&self, id: &EntityId, ctx: &ActorContext) -> CmsResult<()> {
        self.doc_types
            .find_by_id(ctx.organization_id(), id)
            .await?
            .map(|_| ())
            .ok_or(CmsError::not_found("Document type"))
    }

    async fn allocate_slug(
        &self,
        requested: &str,
        ctx: &ActorContext,
        exclude: Option<EntityId>,
    ) -> CmsResult<String> {
        let scope = ContentSlugScope::new(
            Arc::clone(&self.contents),
            ctx.organization_id().clone(),
            exclude,
        );
        let slug = SlugAllocator::allocate(&scope, requested).await?;
        if slug != requested {
            debug!(requested, allocated = %slug, "Content slug suffixed");
        }
        Ok(slug)
    }

    /// Categories among `ids`, cache first, in the order given. Unknown ids
    /// are skipped.
    async fn fetch_categories(&self, org: &EntityId, ids: &[EntityId]) -> CmsResult<Vec<Category>> {
        let misses: Vec<EntityId> = ids
            .iter()
            .filter(|id| self.cache.category(org, id).is_none())
            .cloned()
            .collect();
        if !misses.is_empty() {
            for category in self.taxonomy.find_categories(org, &misses).await? {
                self.cache.insert_category(category);
            }
        }
        Ok(ids
            .iter()
            .filter_map(|id| self.cache.category(org, id))
            .collect())
    }

    async fn fetch_tags(&self, org: &EntityId, ids: &[EntityId]) -> CmsResult<Vec<Tag>> {
        let misses: Vec<EntityId> = ids
            .iter()
            .filter(|id| self.cache.tag(org, id).is_none())
            .cloned()
            .collect();
        if !misses.is_empty() {
            for tag in self.taxonomy.find_tags(org, &misses).await? {
                self.cache.insert_tag(tag);
            }
        }
        Ok(ids.iter().filter_map(|id| self.cache.tag(org, id)).collect())
    }

    /// Every requested category and tag must exist in the organization
    async fn resolve_taxonomy(
        &self,
        category_ids: &[EntityId],
        tag_ids: &[EntityId],
        ctx: &ActorContext,
    ) -> CmsResult<()> {
        let org = ctx.organization_id();
        if self.fetch_categories(org, category_ids).await?.len() != category_ids.len() {
            return Err(CmsError::not_found("Category"));
        }
        if self.fetch_tags(org, tag_ids).await?.len() != tag_ids.len() {
            return Err(CmsError::not_found("Tag"));
        }
        Ok(())
    }

    async fn view(&self, content: &Content) -> CmsResult<ContentView> {
        let org = content.organization_id();
        let document_type = match content.document_type_id() {
            Some(id) => self
                .doc_types
                .find_by_id(org, id)
                .await?
                .as_ref()
                .map(DocumentTypeSummary::from),
            None => None,
        };
        let relations = audit_relations(
            self.directory.as_ref(),
            content.created_by(),
            content.updated_by(),
            org,
        )
        .await?;
        let categories = self.fetch_categories(org, content.category_ids()).await?;
        let tags = self.fetch_tags(org, content.tag_ids()).await?;

        Ok(ContentView::new(content, document_type, relations, categories, tags))
    }
}

#[async_trait]
impl ContentUseCases for ContentService {
    async fn create(&self, command: CreateContentCommand, ctx: &ActorContext) -> CmsResult<ContentView> {
        command.validate()?;

        let document_type_id = command.document_type_id.map(EntityId::from_string);
        if let Some(id) = &document_type_id {
            self.require_document_type(id, ctx).await?;
        }

        let category_ids = distinct_ids(command.category_ids.as_deref());
        let tag_ids = distinct_ids(command.tag_ids.as_deref());
        self.resolve_taxonomy(&category_ids, &tag_ids, ctx).await?;

        let slug = self.allocate_slug(&command.slug, ctx, None).await?;

        let mut content = Content::create(
            command.title,
            slug,
            command.content.unwrap_or(Value::Null),
            document_type_id,
            ctx.organization_id().clone(),
            ctx.actor_id().clone(),
        );
        content.replace_taxonomy(category_ids, tag_ids);

        self.contents.create(&content).await?;

        info!(
            content_id = %content.id(),
            organization_id = %ctx.organization_id(),
            slug = content.slug(),
            "Content created"
        );

        self.view(&content).await
    }

    async fn update(
        &self,
        id: &EntityId,
        command: UpdateContentCommand,
        ctx: &ActorContext,
    ) -> CmsResult<ContentView> {
        let mut content = self.load(id, ctx).await?;
        command.validate()?;

        if let Some(document_type_id) = command.document_type_id {
            let document_type_id = EntityId::from_string(document_type_id);
            self.require_document_type(&document_type_id, ctx).await?;
            content.set_document_type(document_type_id);
        }

        if let Some(slug) = command.slug.as_deref() {
            if slug != content.slug() {
                let slug = self.allocate_slug(slug, ctx, Some(id.clone())).await?;
                content.set_slug(slug);
            }
        }

        let category_ids = distinct_ids(command.category_ids.as_deref());
        let tag_ids = distinct_ids(command.tag_ids.as_deref());
        self.resolve_taxonomy(&category_ids, &tag_ids, ctx).await?;

        // Not transactional: a failure between these calls leaves the links
        // partially replaced.
        self.taxonomy.delete_content_categories(id).await?;
        self.taxonomy.delete_content_tags(id).await?;
        self.taxonomy.attach_categories(id, &category_ids).await?;
        self.taxonomy.attach_tags(id, &tag_ids).await?;

        if let Some(title) = command.title {
            content.rename(title);
        }
        if let Some(body) = command.content {
            content.set_body(body);
        }
        if let Some(status) = command.status {
            content.set_status(status);
        }
        content.replace_taxonomy(category_ids, tag_ids);
        content.touch(ctx.actor_id().clone());

        self.contents.update(&content).await?;

        info!(content_id = %id, actor_id = %ctx.actor_id(), "Content updated");

        self.view(&content).await
    }

    async fn find_all(&self, ctx: &ActorContext, query: ContentQuery) -> CmsResult<Page<ContentView>> {
        let pagination = Pagination::from_offset(query.offset.unwrap_or(0), query.limit);
        let filter = ContentFilter {
            document_type_id: query.document_type_id.map(EntityId::from_string),
            status: query.status,
            category_id: query.category_id.map(EntityId::from_string),
            tag_id: query.tag_id.map(EntityId::from_string),
        };

        let (contents, total) = self
            .contents
            .list(ctx.organization_id(), &filter, pagination)
            .await?;

        let mut views = Vec::with_capacity(contents.len());
        for content in &contents {
            views.push(self.view(content).await?);
        }
        Ok(Page::new(views, total, pagination))
    }

    async fn find_one(&self, id: &EntityId, ctx: &ActorContext) -> CmsResult<ContentView> {
        let content = self.load(id, ctx).await?;
        self.view(&content).await
    }

    async fn find_by_slug(&self, slug: &str, ctx: &ActorContext) -> CmsResult<ContentView> {
        let content = self
            .contents
            .find_by_slug(ctx.organization_id(), slug)
            .await?
            .ok_or(CmsError::not_found(ENTITY))?;
        self.view(&content).await
    }

    async fn publish(&self, id: &EntityId, ctx: &ActorContext) -> CmsResult<ContentView> {
        let mut content = self.load(id, ctx).await?;
        content.publish(ctx.actor_id().clone());
        self.contents.update(&content).await?;

        info!(content_id = %id, actor_id = %ctx.actor_id(), "Content published");

        self.view(&content).await
    }

    async fn remove(&self, id: &EntityId, ctx: &ActorContext) -> CmsResult<()> {
        self.load(id, ctx).await?;
        self.contents.delete(ctx.organization_id(), id).await?;

        info!(content_id = %id, actor_id = %ctx.actor_id(), "Content removed");
        Ok(())
    }
}
