//! Document type application service

use std::sync::Arc;

use async_trait::async_trait;
use cms_common::{ActorContext, CmsError, CmsResult, EntityId, Page, Pagination};
use cms_forms::{FormSchema, FormSchemaValidator};
use tracing::info;

use crate::application::dto::*;
use crate::application::relations::audit_relations;
use crate::application::scopes::DocumentTypeSlugScope;
use crate::domain::aggregates::{DocumentType, DocumentTypeChanges};
use crate::domain::services::SlugAllocator;
use crate::domain::value_objects::slugify;
use crate::ports::inbound::DocumentTypeUseCases;
use crate::ports::outbound::{
    ContentFilter, ContentRepository, DirectoryRepository, DocumentTypeFilter,
    DocumentTypeRepository,
};

const ENTITY: &str = "Document type";
const RECENT_DOCUMENTS: usize = 5;

pub const CONFLICT_MESSAGE: &str = "Document type with this title or slug already exists";
pub const IN_USE_MESSAGE: &str = "Cannot delete document type that has associated documents. Please delete or reassign the documents first.";

/// Document type application service
pub struct DocumentTypeService {
    doc_types: Arc<dyn DocumentTypeRepository>,
    contents: Arc<dyn ContentRepository>,
    directory: Arc<dyn DirectoryRepository>,
}

impl DocumentTypeService {
    pub fn new(
        doc_types: Arc<dyn DocumentTypeRepository>,
        contents: Arc<dyn ContentRepository>,
        directory: Arc<dyn DirectoryRepository>,
    ) -> Self {
        Self {
            doc_types,
            contents,
            directory,
        }
    }

    async fn load(&self, id: &EntityId, ctx: &ActorContext) -> CmsResult<DocumentType> {
        self.doc_types
            .find_by_id(ctx.organization_id(), id)
            .await?
            .ok_or(CmsError::not_found(ENTITY))
    }

    async fn view(&self, doc_type: &DocumentType, with_recent: bool) -> CmsResult<DocumentTypeView> {
        let org = doc_type.organization_id();
        let document_count = self
            .contents
            .count_by_document_type(org, doc_type.id())
            .await?;
        let recent = if with_recent {
            let recent = self
                .contents
                .recent_by_document_type(org, doc_type.id(), RECENT_DOCUMENTS)
                .await?;
            Some(recent.iter().map(ContentSummary::from).collect())
        } else {
            None
        };
        let relations = audit_relations(
            self.directory.as_ref(),
            doc_type.created_by(),
            doc_type.updated_by(),
            org,
        )
        .await?;

        Ok(DocumentTypeView::new(doc_type, relations, document_count, recent))
    }
}

#[async_trait]
impl DocumentTypeUseCases for DocumentTypeService {
    async fn create(
        &self,
        command: CreateDocumentTypeCommand,
        ctx: &ActorContext,
    ) -> CmsResult<DocumentTypeView> {
        command.validate()?;
        let org = ctx.organization_id();

        let conflict = self
            .doc_types
            .find_conflict(org, Some(&command.title), Some(&command.slug), None)
            .await?;
        if conflict.is_some() {
            return Err(CmsError::Conflict(CONFLICT_MESSAGE.into()));
        }

        let fields = match &command.fields {
            Some(raw) => FormSchemaValidator::validate_fields(raw)?,
            None => FormSchema::default(),
        };

        let doc_type = DocumentType::create(
            command.title,
            command.slug,
            command.description,
            fields,
            org.clone(),
            ctx.actor_id().clone(),
        )
        .with_category(command.category_id.map(EntityId::from_string));

        self.doc_types.create(&doc_type).await?;

        info!(
            document_type_id = %doc_type.id(),
            organization_id = %org,
            slug = doc_type.slug(),
            fields = doc_type.fields().len(),
            "Document type created"
        );

        self.view(&doc_type, false).await
    }

    async fn update(
        &self,
        id: &EntityId,
        command: UpdateDocumentTypeCommand,
        ctx: &ActorContext,
    ) -> CmsResult<DocumentTypeView> {
        let mut doc_type = self.load(id, ctx).await?;
        command.validate()?;

        if command.title.is_some() || command.slug.is_some() {
            let conflict = self
                .doc_types
                .find_conflict(
                    ctx.organization_id(),
                    command.title.as_deref(),
                    command.slug.as_deref(),
                    Some(id),
                )
                .await?;
            if conflict.is_some() {
                return Err(CmsError::Conflict(CONFLICT_MESSAGE.into()));
            }
        }

        let fields = command
            .fields
            .as_ref()
            .map(FormSchemaValidator::validate_fields)
            .transpose()?;

        doc_type.apply(
            DocumentTypeChanges {
                title: command.title,
                slug: command.slug,
                description: command.description,
                fields,
                category_id: command.category_id.map(EntityId::from_string),
            },
            ctx.actor_id().clone(),
        );
        self.doc_types.update(&doc_type).await?;

        info!(document_type_id = %id, actor_id = %ctx.actor_id(), "Document type updated");

        self.view(&doc_type, false).await
    }

    async fn deactivate(&self, id: &EntityId, ctx: &ActorContext) -> CmsResult<DocumentTypeView> {
        let mut doc_type = self.load(id, ctx).await?;

        let documents = self
            .contents
            .count_by_document_type(ctx.organization_id(), id)
            .await?;
        if documents > 0 {
            return Err(CmsError::PreconditionFailed(IN_USE_MESSAGE.into()));
        }

        doc_type.deactivate(ctx.actor_id().clone());
        self.doc_types.update(&doc_type).await?;

        info!(document_type_id = %id, actor_id = %ctx.actor_id(), "Document type deactivated");

        self.view(&doc_type, false).await
    }

    async fn toggle_active(&self, id: &EntityId, ctx: &ActorContext) -> CmsResult<DocumentTypeView> {
        let mut doc_type = self.load(id, ctx).await?;
        doc_type.toggle_active(ctx.actor_id().clone());
        self.doc_types.update(&doc_type).await?;

        info!(
            document_type_id = %id,
            is_active = doc_type.is_active(),
            "Document type active flag toggled"
        );

        self.view(&doc_type, false).await
    }

    async fn find_all(
        &self,
        ctx: &ActorContext,
        query: DocumentTypeQuery,
    ) -> CmsResult<Page<DocumentTypeView>> {
        let pagination = Pagination::new(query.page, query.limit);
        let filter = DocumentTypeFilter {
            search: query.search.filter(|s| !s.is_empty()),
            is_active: query.is_active,
        };

        let (doc_types, total) = self
            .doc_types
            .list(ctx.organization_id(), &filter, pagination)
            .await?;

        let mut views = Vec::with_capacity(doc_types.len());
        for doc_type in &doc_types {
            views.push(self.view(doc_type, false).await?);
        }
        Ok(Page::new(views, total, pagination))
    }

    async fn find_one(&self, id: &EntityId, ctx: &ActorContext) -> CmsResult<DocumentTypeView> {
        let doc_type = self.load(id, ctx).await?;
        self.view(&doc_type, true).await
    }

    async fn find_by_slug(&self, slug: &str, ctx: &ActorContext) -> CmsResult<DocumentTypeView> {
        let doc_type = self
            .doc_types
            .find_by_slug(ctx.organization_id(), slug)
            .await?
            .filter(DocumentType::is_active)
            .ok_or(CmsError::not_found(ENTITY))?;
        self.view(&doc_type, false).await
    }

    async fn documents_by_type(
        &self,
        id: &EntityId,
        ctx: &ActorContext,
        page: Option<u32>,
        limit: Option<u32>,
    ) -> CmsResult<Page<ContentSummary>> {
        self.load(id, ctx).await?;
        let pagination = Pagination::new(page, limit);

        let (documents, total) = self
            .contents
            .list(
                ctx.organization_id(),
                &ContentFilter::by_document_type(id.clone()),
                pagination,
            )
            .await?;

        Ok(Page::new(
            documents.iter().map(ContentSummary::from).collect(),
            total,
            pagination,
        ))
    }

    async fn suggest_slug(
        &self,
        title: &str,
        slug: Option<&str>,
        ctx: &ActorContext,
    ) -> CmsResult<String> {
        let base = match slug.filter(|s| !s.is_empty()) {
            Some(slug) => slug.to_string(),
            None => slugify(title),
        };
        if base.is_empty() {
            return Err(CmsError::invalid_field(
                "A slug cannot be derived from this title",
                "title",
                "slug_source",
            ));
        }

        let scope = DocumentTypeSlugScope::new(
            Arc::clone(&self.doc_types),
            ctx.organization_id().clone(),
            title,
            None,
        );
        Ok(SlugAllocator::allocate(&scope, &base).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::aggregates::{Content, OrganizationSummary, UserSummary};
    use crate::infrastructure::persistence::{
        InMemoryContentStore, InMemoryDirectory, InMemoryDocumentTypeRepository,
    };
    use serde_json::{json, Value};

    struct Fixture {
        service: DocumentTypeService,
        contents: Arc<InMemoryContentStore>,
    }

    fn fixture() -> Fixture {
        let directory = Arc::new(InMemoryDirectory::new());
        directory.insert_user(UserSummary {
            id: EntityId::from("alice"),
            username: "alice".into(),
            first_name: Some("Alice".into()),
            last_name: Some("Ng".into()),
        });
        directory.insert_organization(OrganizationSummary {
            id: EntityId::from("org1"),
            name: "Org One".into(),
            slug: "org-one".into(),
        });
        let contents = Arc::new(InMemoryContentStore::new());
        let service = DocumentTypeService::new(
            Arc::new(InMemoryDocumentTypeRepository::new()),
            contents.clone(),
            directory,
        );
        Fixture { service, contents }
    }

    fn ctx(org: &str) -> ActorContext {
        ActorContext::new("alice", org).unwrap()
    }

    fn permit() -> CreateDocumentTypeCommand {
        CreateDocumentTypeCommand {
            title: "Permit".into(),
            slug: "permit".into(),
            description: None,
            fields: Some(json!([
                { "id": "f1", "name": "applicant", "type": "text", "label": "Applicant", "required": true }
            ])),
            category_id: None,
        }
    }

    async fn attach_document(fx: &Fixture, doc_type: &EntityId, slug: &str) -> Content {
        let content = Content::create(
            slug,
            slug,
            Value::Null,
            Some(doc_type.clone()),
            EntityId::from("org1"),
            EntityId::from("alice"),
        );
        fx.contents.create(&content).await.unwrap();
        content
    }

    #[tokio::test]
    async fn test_create_permit() {
        let fx = fixture();
        let view = fx.service.create(permit(), &ctx("org1")).await.unwrap();

        assert!(view.is_active);
        assert_eq!(view.document_count, 0);
        assert_eq!(view.fields.len(), 1);
        assert_eq!(view.fields[0].name, "applicant");
        assert_eq!(view.creator.as_ref().map(|u| u.username.as_str()), Some("alice"));
        assert_eq!(view.organization.as_ref().map(|o| o.slug.as_str()), Some("org-one"));
    }

    #[tokio::test]
    async fn test_title_collision_is_conflict() {
        let fx = fixture();
        fx.service.create(permit(), &ctx("org1")).await.unwrap();

        let again = CreateDocumentTypeCommand {
            slug: "permit-2".into(),
            ..permit()
        };
        let err = fx.service.create(again, &ctx("org1")).await.unwrap_err();
        assert_eq!(err, CmsError::Conflict(CONFLICT_MESSAGE.into()));

        // other organizations are unaffected
        assert!(fx.service.create(permit(), &ctx("org2")).await.is_ok());
    }

    #[tokio::test]
    async fn test_conflict_checked_before_fields() {
        let fx = fixture();
        fx.service.create(permit(), &ctx("org1")).await.unwrap();

        let invalid = CreateDocumentTypeCommand {
            fields: Some(json!([{ "id": "f1", "name": "x", "type": "file", "label": "X" }])),
            ..permit()
        };
        let err = fx.service.create(invalid, &ctx("org1")).await.unwrap_err();
        assert_eq!(err.code(), "CONFLICT");
    }

    #[tokio::test]
    async fn test_invalid_fields_rejected_with_detail() {
        let fx = fixture();
        let command = CreateDocumentTypeCommand {
            fields: Some(json!([
                { "id": "f1", "name": "email", "type": "email", "label": "Email" },
                { "id": "f2", "name": "email", "type": "email", "label": "Email again" }
            ])),
            ..permit()
        };
        let err = fx.service.create(command, &ctx("org1")).await.unwrap_err();
        assert_eq!(
            err,
            CmsError::invalid_field("Duplicate field name: email", "email", "duplicate_name")
        );
        let (_, total) = fx
            .service
            .doc_types
            .list(&EntityId::from("org1"), &DocumentTypeFilter::default(), Pagination::default())
            .await
            .unwrap();
        assert_eq!(total, 0);
    }

    #[tokio::test]
    async fn test_update_to_own_title_is_not_conflict() {
        let fx = fixture();
        let created = fx.service.create(permit(), &ctx("org1")).await.unwrap();

        let command = UpdateDocumentTypeCommand {
            title: Some("Permit".into()),
            slug: Some("permit".into()),
            description: Some("Building permits".into()),
            ..Default::default()
        };
        let updated = fx.service.update(&created.id, command, &ctx("org1")).await.unwrap();
        assert_eq!(updated.description.as_deref(), Some("Building permits"));
        assert_eq!(updated.fields.len(), 1);
    }

    #[tokio::test]
    async fn test_update_conflict_with_other_type() {
        let fx = fixture();
        fx.service.create(permit(), &ctx("org1")).await.unwrap();
        let other = fx
            .service
            .create(
                CreateDocumentTypeCommand {
                    title: "License".into(),
                    slug: "license".into(),
                    ..Default::default()
                },
                &ctx("org1"),
            )
            .await
            .unwrap();

        let command = UpdateDocumentTypeCommand {
            slug: Some("permit".into()),
            ..Default::default()
        };
        let err = fx.service.update(&other.id, command, &ctx("org1")).await.unwrap_err();
        assert_eq!(err.code(), "CONFLICT");
    }

    #[tokio::test]
    async fn test_not_found_before_shape() {
        let fx = fixture();
        let command = UpdateDocumentTypeCommand {
            slug: Some("BAD SLUG".into()),
            ..Default::default()
        };
        let err = fx
            .service
            .update(&EntityId::from("missing"), command, &ctx("org1"))
            .await
            .unwrap_err();
        assert_eq!(err, CmsError::not_found("Document type"));
    }

    #[tokio::test]
    async fn test_cross_organization_is_not_found() {
        let fx = fixture();
        let created = fx.service.create(permit(), &ctx("org1")).await.unwrap();

        assert_eq!(
            fx.service.find_one(&created.id, &ctx("org2")).await.unwrap_err(),
            CmsError::not_found("Document type")
        );
        assert!(fx.service.deactivate(&created.id, &ctx("org2")).await.is_err());
        assert!(fx.service.find_by_slug("permit", &ctx("org2")).await.is_err());
    }

    #[tokio::test]
    async fn test_deactivate_blocked_by_documents() {
        let fx = fixture();
        let created = fx.service.create(permit(), &ctx("org1")).await.unwrap();
        let document = attach_document(&fx, &created.id, "first-permit").await;

        let err = fx.service.deactivate(&created.id, &ctx("org1")).await.unwrap_err();
        assert_eq!(err, CmsError::PreconditionFailed(IN_USE_MESSAGE.into()));

        fx.contents
            .delete(&EntityId::from("org1"), document.id())
            .await
            .unwrap();
        let view = fx.service.deactivate(&created.id, &ctx("org1")).await.unwrap();
        assert!(!view.is_active);

        // retained, but no longer reachable by slug
        assert!(fx.service.find_one(&created.id, &ctx("org1")).await.is_ok());
        assert!(fx.service.find_by_slug("permit", &ctx("org1")).await.is_err());
    }

    #[tokio::test]
    async fn test_toggle_active() {
        let fx = fixture();
        let created = fx.service.create(permit(), &ctx("org1")).await.unwrap();

        let off = fx.service.toggle_active(&created.id, &ctx("org1")).await.unwrap();
        assert!(!off.is_active);
        let on = fx.service.toggle_active(&created.id, &ctx("org1")).await.unwrap();
        assert!(on.is_active);
    }

    #[tokio::test]
    async fn test_find_all_paging_and_search() {
        let fx = fixture();
        for (title, slug) in [("Permit", "permit"), ("License", "license"), ("Permit Renewal", "permit-renewal")] {
            let command = CreateDocumentTypeCommand {
                title: title.into(),
                slug: slug.into(),
                ..Default::default()
            };
            fx.service.create(command, &ctx("org1")).await.unwrap();
        }

        let query = DocumentTypeQuery {
            search: Some("permit".into()),
            limit: Some(1),
            ..Default::default()
        };
        let page = fx.service.find_all(&ctx("org1"), query).await.unwrap();
        assert_eq!(page.meta.total, 2);
        assert_eq!(page.meta.total_pages, 2);
        assert_eq!(page.data[0].slug, "permit-renewal");

        let query = DocumentTypeQuery {
            page: Some(0),
            limit: Some(1000),
            ..Default::default()
        };
        let page = fx.service.find_all(&ctx("org1"), query).await.unwrap();
        assert_eq!(page.meta.page, 1);
        assert_eq!(page.meta.limit, 100);
        assert_eq!(page.data.len(), 3);
    }

    #[tokio::test]
    async fn test_find_one_lists_recent_documents() {
        let fx = fixture();
        let created = fx.service.create(permit(), &ctx("org1")).await.unwrap();
        for n in 0..7 {
            attach_document(&fx, &created.id, &format!("doc-{n}")).await;
        }

        let view = fx.service.find_one(&created.id, &ctx("org1")).await.unwrap();
        assert_eq!(view.document_count, 7);
        let recent = view.recent_documents.unwrap();
        assert_eq!(recent.len(), 5);
        assert_eq!(recent[0].slug, "doc-6");

        let page = fx
            .service
            .documents_by_type(&created.id, &ctx("org1"), Some(2), Some(5))
            .await
            .unwrap();
        assert_eq!(page.meta.total, 7);
        assert_eq!(page.data.len(), 2);
    }

    #[tokio::test]
    async fn test_suggest_slug() {
        let fx = fixture();
        assert_eq!(
            fx.service.suggest_slug("Building Permit", None, &ctx("org1")).await.unwrap(),
            "building-permit"
        );

        fx.service.create(permit(), &ctx("org1")).await.unwrap();
        assert_eq!(
            fx.service.suggest_slug("Permit", None, &ctx("org1")).await.unwrap(),
            "permit-1"
        );
        // title collides even though the requested slug is free
        assert_eq!(
            fx.service.suggest_slug("Permit", Some("fresh"), &ctx("org1")).await.unwrap(),
            "fresh-1"
        );
        assert!(fx.service.suggest_slug("!!!", None, &ctx("org1")).await.is_err());
    }

    #[tokio::test]
    async fn test_suggested_slug_for_accented_title_is_accepted() {
        let fx = fixture();
        let slug = fx
            .service
            .suggest_slug("Café Permit", None, &ctx("org1"))
            .await
            .unwrap();
        assert_eq!(slug, "caf-permit");

        let command = CreateDocumentTypeCommand {
            title: "Café Permit".into(),
            slug,
            ..Default::default()
        };
        let view = fx.service.create(command, &ctx("org1")).await.unwrap();
        assert_eq!(view.slug, "caf-permit");
    }

    #[tokio::test]
    async fn test_update_with_invalid_fields_persists_nothing() {
        let fx = fixture();
        let created = fx.service.create(permit(), &ctx("org1")).await.unwrap();

        let command = UpdateDocumentTypeCommand {
            title: Some("Permit v2".into()),
            fields: Some(json!([
                { "id": "f2", "name": "choice", "type": "select", "label": "Choice", "options": [] }
            ])),
            ..Default::default()
        };
        let err = fx.service.update(&created.id, command, &ctx("org1")).await.unwrap_err();
        assert_eq!(
            err,
            CmsError::invalid_field(
                "Select fields must have at least one option",
                "choice",
                "select_options"
            )
        );

        let view = fx.service.find_one(&created.id, &ctx("org1")).await.unwrap();
        assert_eq!(view.title, "Permit");
        assert_eq!(view.fields.len(), 1);
        assert_eq!(view.fields[0].name, "applicant");
    }

    #[tokio::test]
    async fn test_update_replaces_fields() {
        let fx = fixture();
        let created = fx.service.create(permit(), &ctx("org1")).await.unwrap();

        let command = UpdateDocumentTypeCommand {
            fields: Some(json!([
                { "id": "f2", "name": "kind", "type": "select", "label": "Kind", "options": ["new", "renewal"] },
                { "id": "f3", "name": "email", "type": "email", "label": "Email", "required": true }
            ])),
            ..Default::default()
        };
        let updated = fx.service.update(&created.id, command, &ctx("org1")).await.unwrap();
        let names: Vec<_> = updated.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["kind", "email"]);

        let view = fx.service.find_one(&created.id, &ctx("org1")).await.unwrap();
        assert_eq!(view.title, "Permit");
        assert_eq!(view.fields.len(), 2);
        assert_eq!(view.fields[0].options(), ["new", "renewal"]);
        assert!(view.fields[1].is_required());
    }
}
