//! In-memory repository implementations for tests and the dev server
//!
//! Records live in insertion order so "newest first" is stable when two
//! records share a timestamp. Content links are held apart from the records,
//! the way a join table would hold them, and are hydrated on every read.

use std::collections::HashMap;

use async_trait::async_trait;
use dashmap::DashMap;
use parking_lot::RwLock;

use cms_common::Pagination;

use crate::domain::aggregates::{
    Category, Content, DocumentType, OrganizationSummary, Tag, UserSummary,
};
use crate::domain::value_objects::EntityId;
use crate::ports::outbound::{
    ContentFilter, ContentRepository, DirectoryRepository, DocumentTypeFilter,
    DocumentTypeRepository, RepoResult, RepositoryError, TaxonomyRepository,
};

/// Newest first, ties broken by later insertion
fn newest_first<T>(mut items: Vec<T>, created_at: impl Fn(&T) -> chrono::DateTime<chrono::Utc>) -> Vec<T> {
    items.reverse();
    items.sort_by(|a, b| created_at(b).cmp(&created_at(a)));
    items
}

fn paginate<T>(items: Vec<T>, page: Pagination) -> (Vec<T>, u64) {
    let total = items.len() as u64;
    let data = items
        .into_iter()
        .skip(page.offset())
        .take(page.limit() as usize)
        .collect();
    (data, total)
}

// =============================================================================
// Document types
// =============================================================================

/// In-memory document type repository
#[derive(Default)]
pub struct InMemoryDocumentTypeRepository {
    records: RwLock<Vec<DocumentType>>,
}

impl InMemoryDocumentTypeRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn in_org(&self, org: &EntityId) -> Vec<DocumentType> {
        self.records
            .read()
            .iter()
            .filter(|d| d.organization_id() == org)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl DocumentTypeRepository for InMemoryDocumentTypeRepository {
    async fn find_by_id(&self, org: &EntityId, id: &EntityId) -> RepoResult<Option<DocumentType>> {
        Ok(self
            .records
            .read()
            .iter()
            .find(|d| d.id() == id && d.organization_id() == org)
            .cloned())
    }

    async fn find_by_slug(&self, org: &EntityId, slug: &str) -> RepoResult<Option<DocumentType>> {
        Ok(self
            .records
            .read()
            .iter()
            .find(|d| d.slug() == slug && d.organization_id() == org)
            .cloned())
    }

    async fn find_conflict(
        &self,
        org: &EntityId,
        title: Option<&str>,
        slug: Option<&str>,
        exclude: Option<&EntityId>,
    ) -> RepoResult<Option<DocumentType>> {
        Ok(self
            .records
            .read()
            .iter()
            .filter(|d| d.organization_id() == org)
            .filter(|d| exclude.map_or(true, |ex| d.id() != ex))
            .find(|d| d.collides_with(title, slug))
            .cloned())
    }

    async fn list(
        &self,
        org: &EntityId,
        filter: &DocumentTypeFilter,
        page: Pagination,
    ) -> RepoResult<(Vec<DocumentType>, u64)> {
        let matching: Vec<_> = self
            .in_org(org)
            .into_iter()
            .filter(|d| filter.matches(d))
            .collect();
        Ok(paginate(newest_first(matching, DocumentType::created_at), page))
    }

    async fn create(&self, doc_type: &DocumentType) -> RepoResult<()> {
        let mut records = self.records.write();
        let duplicate = records.iter().any(|d| {
            d.organization_id() == doc_type.organization_id()
                && (d.id() == doc_type.id() || d.slug() == doc_type.slug())
        });
        if duplicate {
            return Err(RepositoryError::DuplicateKey(format!(
                "document_type({}, {})",
                doc_type.organization_id(),
                doc_type.slug()
            )));
        }
        records.push(doc_type.clone());
        Ok(())
    }

    async fn update(&self, doc_type: &DocumentType) -> RepoResult<()> {
        let mut records = self.records.write();
        let slot = records
            .iter_mut()
            .find(|d| d.id() == doc_type.id())
            .ok_or_else(|| RepositoryError::Missing(doc_type.id().to_string()))?;
        *slot = doc_type.clone();
        Ok(())
    }
}

// =============================================================================
// Content and taxonomy
// =============================================================================

/// In-memory content store: records, taxonomy catalogue and link tables
#[derive(Default)]
pub struct InMemoryContentStore {
    records: RwLock<Vec<Content>>,
    content_categories: RwLock<HashMap<EntityId, Vec<EntityId>>>,
    content_tags: RwLock<HashMap<EntityId, Vec<EntityId>>>,
    categories: RwLock<HashMap<EntityId, Category>>,
    tags: RwLock<HashMap<EntityId, Tag>>,
}

impl InMemoryContentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a category
    pub fn insert_category(&self, category: Category) {
        self.categories.write().insert(category.id.clone(), category);
    }

    /// Seed a tag
    pub fn insert_tag(&self, tag: Tag) {
        self.tags.write().insert(tag.id.clone(), tag);
    }

    fn hydrate(&self, mut content: Content) -> Content {
        let categories = self
            .content_categories
            .read()
            .get(content.id())
            .cloned()
            .unwrap_or_default();
        let tags = self
            .content_tags
            .read()
            .get(content.id())
            .cloned()
            .unwrap_or_default();
        content.replace_taxonomy(categories, tags);
        content
    }

    fn in_org(&self, org: &EntityId) -> Vec<Content> {
        let records: Vec<Content> = self
            .records
            .read()
            .iter()
            .filter(|c| c.organization_id() == org)
            .cloned()
            .collect();
        records.into_iter().map(|c| self.hydrate(c)).collect()
    }
}

fn link(table: &RwLock<HashMap<EntityId, Vec<EntityId>>>, owner: &EntityId, ids: &[EntityId]) {
    if ids.is_empty() {
        return;
    }
    let mut table = table.write();
    let links = table.entry(owner.clone()).or_default();
    for id in ids {
        if !links.contains(id) {
            links.push(id.clone());
        }
    }
}

#[async_trait]
impl ContentRepository for InMemoryContentStore {
    async fn find_by_id(&self, org: &EntityId, id: &EntityId) -> RepoResult<Option<Content>> {
        let found = self
            .records
            .read()
            .iter()
            .find(|c| c.id() == id && c.organization_id() == org)
            .cloned();
        Ok(found.map(|c| self.hydrate(c)))
    }

    async fn find_by_slug(&self, org: &EntityId, slug: &str) -> RepoResult<Option<Content>> {
        let found = self
            .records
            .read()
            .iter()
            .find(|c| c.slug() == slug && c.organization_id() == org)
            .cloned();
        Ok(found.map(|c| self.hydrate(c)))
    }

    async fn slug_exists(
        &self,
        org: &EntityId,
        slug: &str,
        exclude: Option<&EntityId>,
    ) -> RepoResult<bool> {
        Ok(self.records.read().iter().any(|c| {
            c.organization_id() == org
                && c.slug() == slug
                && exclude.map_or(true, |ex| c.id() != ex)
        }))
    }

    async fn list(
        &self,
        org: &EntityId,
        filter: &ContentFilter,
        page: Pagination,
    ) -> RepoResult<(Vec<Content>, u64)> {
        let matching: Vec<_> = self
            .in_org(org)
            .into_iter()
            .filter(|c| filter.matches(c))
            .collect();
        Ok(paginate(newest_first(matching, Content::created_at), page))
    }

    async fn count_by_document_type(
        &self,
        org: &EntityId,
        document_type_id: &EntityId,
    ) -> RepoResult<u64> {
        Ok(self
            .records
            .read()
            .iter()
            .filter(|c| c.organization_id() == org && c.document_type_id() == Some(document_type_id))
            .count() as u64)
    }

    async fn recent_by_document_type(
        &self,
        org: &EntityId,
        document_type_id: &EntityId,
        limit: usize,
    ) -> RepoResult<Vec<Content>> {
        let matching: Vec<_> = self
            .in_org(org)
            .into_iter()
            .filter(|c| c.document_type_id() == Some(document_type_id))
            .collect();
        Ok(newest_first(matching, Content::created_at)
            .into_iter()
            .take(limit)
            .collect())
    }

    async fn create(&self, content: &Content) -> RepoResult<()> {
        {
            let mut records = self.records.write();
            let duplicate = records.iter().any(|c| {
                c.id() == content.id()
                    || (c.organization_id() == content.organization_id() && c.slug() == content.slug())
            });
            if duplicate {
                return Err(RepositoryError::DuplicateKey(format!(
                    "content({}, {})",
                    content.organization_id(),
                    content.slug()
                )));
            }
            records.push(content.clone());
        }
        link(&self.content_categories, content.id(), content.category_ids());
        link(&self.content_tags, content.id(), content.tag_ids());
        Ok(())
    }

    async fn update(&self, content: &Content) -> RepoResult<()> {
        let mut records = self.records.write();
        if records.iter().any(|c| {
            c.id() != content.id()
                && c.organization_id() == content.organization_id()
                && c.slug() == content.slug()
        }) {
            return Err(RepositoryError::DuplicateKey(format!(
                "content({}, {})",
                content.organization_id(),
                content.slug()
            )));
        }
        let slot = records
            .iter_mut()
            .find(|c| c.id() == content.id())
            .ok_or_else(|| RepositoryError::Missing(content.id().to_string()))?;
        *slot = content.clone();
        Ok(())
    }

    async fn delete(&self, org: &EntityId, id: &EntityId) -> RepoResult<()> {
        let removed = {
            let mut records = self.records.write();
            let before = records.len();
            records.retain(|c| !(c.id() == id && c.organization_id() == org));
            before != records.len()
        };
        if !removed {
            return Err(RepositoryError::Missing(id.to_string()));
        }
        self.content_categories.write().remove(id);
        self.content_tags.write().remove(id);
        Ok(())
    }
}

#[async_trait]
impl TaxonomyRepository for InMemoryContentStore {
    async fn find_categories(&self, org: &EntityId, ids: &[EntityId]) -> RepoResult<Vec<Category>> {
        let categories = self.categories.read();
        Ok(ids
            .iter()
            .filter_map(|id| categories.get(id))
            .filter(|c| &c.organization_id == org)
            .cloned()
            .collect())
    }

    async fn find_tags(&self, org: &EntityId, ids: &[EntityId]) -> RepoResult<Vec<Tag>> {
        let tags = self.tags.read();
        Ok(ids
            .iter()
            .filter_map(|id| tags.get(id))
            .filter(|t| &t.organization_id == org)
            .cloned()
            .collect())
    }

    async fn delete_content_categories(&self, content_id: &EntityId) -> RepoResult<()> {
        self.content_categories.write().remove(content_id);
        Ok(())
    }

    async fn delete_content_tags(&self, content_id: &EntityId) -> RepoResult<()> {
        self.content_tags.write().remove(content_id);
        Ok(())
    }

    async fn attach_categories(&self, content_id: &EntityId, ids: &[EntityId]) -> RepoResult<()> {
        link(&self.content_categories, content_id, ids);
        Ok(())
    }

    async fn attach_tags(&self, content_id: &EntityId, ids: &[EntityId]) -> RepoResult<()> {
        link(&self.content_tags, content_id, ids);
        Ok(())
    }
}

// =============================================================================
// Directory
// =============================================================================

/// In-memory user/organization directory
#[derive(Default)]
pub struct InMemoryDirectory {
    users: DashMap<EntityId, UserSummary>,
    organizations: DashMap<EntityId, OrganizationSummary>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_user(&self, user: UserSummary) {
        self.users.insert(user.id.clone(), user);
    }

    pub fn insert_organization(&self, organization: OrganizationSummary) {
        self.organizations.insert(organization.id.clone(), organization);
    }
}

#[async_trait]
impl DirectoryRepository for InMemoryDirectory {
    async fn find_user(&self, id: &EntityId) -> RepoResult<Option<UserSummary>> {
        Ok(self.users.get(id).map(|u| u.value().clone()))
    }

    async fn find_organization(&self, id: &EntityId) -> RepoResult<Option<OrganizationSummary>> {
        Ok(self.organizations.get(id).map(|o| o.value().clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cms_forms::FormSchema;
    use serde_json::Value;

    fn org() -> EntityId {
        EntityId::from("org1")
    }

    fn content(slug: &str) -> Content {
        Content::create(slug, slug, Value::Null, None, org(), EntityId::from("alice"))
    }

    #[tokio::test]
    async fn test_document_type_repository() {
        let repo = InMemoryDocumentTypeRepository::new();
        let permit = DocumentType::create("Permit", "permit", None, FormSchema::default(), org(), EntityId::from("alice"));
        repo.create(&permit).await.unwrap();

        assert!(repo.find_by_id(&org(), permit.id()).await.unwrap().is_some());
        assert!(repo.find_by_id(&EntityId::from("org2"), permit.id()).await.unwrap().is_none());
        assert!(repo.find_conflict(&org(), Some("Permit"), Some("x"), None).await.unwrap().is_some());
        assert!(repo.find_conflict(&org(), Some("Permit"), None, Some(permit.id())).await.unwrap().is_none());
        assert!(matches!(repo.create(&permit).await, Err(RepositoryError::DuplicateKey(_))));
    }

    #[tokio::test]
    async fn test_list_newest_first() {
        let repo = InMemoryDocumentTypeRepository::new();
        for slug in ["a", "b", "c"] {
            let doc_type = DocumentType::create(slug, slug, None, FormSchema::default(), org(), EntityId::from("alice"));
            repo.create(&doc_type).await.unwrap();
        }
        let (page, total) = repo
            .list(&org(), &DocumentTypeFilter::default(), Pagination::new(Some(1), Some(2)))
            .await
            .unwrap();
        assert_eq!(total, 3);
        let slugs: Vec<_> = page.iter().map(|d| d.slug()).collect();
        assert_eq!(slugs, vec!["c", "b"]);
    }

    #[tokio::test]
    async fn test_links_are_hydrated_and_replaced() {
        let store = InMemoryContentStore::new();
        let mut post = content("post");
        post.replace_taxonomy(vec![EntityId::from("c1")], vec![EntityId::from("t1")]);
        store.create(&post).await.unwrap();

        let loaded = store.find_by_id(&org(), post.id()).await.unwrap().unwrap();
        assert_eq!(loaded.category_ids(), [EntityId::from("c1")]);

        store.delete_content_categories(post.id()).await.unwrap();
        store.attach_categories(post.id(), &[EntityId::from("c2")]).await.unwrap();
        let loaded = store.find_by_id(&org(), post.id()).await.unwrap().unwrap();
        assert_eq!(loaded.category_ids(), [EntityId::from("c2")]);
        assert_eq!(loaded.tag_ids(), [EntityId::from("t1")]);

        let filter = ContentFilter {
            category_id: Some(EntityId::from("c2")),
            ..Default::default()
        };
        let (found, total) = store.list(&org(), &filter, Pagination::default()).await.unwrap();
        assert_eq!(total, 1);
        assert_eq!(found[0].id(), post.id());
    }

    #[tokio::test]
    async fn test_slug_exists_scoping() {
        let store = InMemoryContentStore::new();
        let post = content("post");
        store.create(&post).await.unwrap();

        assert!(store.slug_exists(&org(), "post", None).await.unwrap());
        assert!(!store.slug_exists(&org(), "post", Some(post.id())).await.unwrap());
        assert!(!store.slug_exists(&EntityId::from("org2"), "post", None).await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_removes_links() {
        let store = InMemoryContentStore::new();
        let mut post = content("post");
        post.replace_taxonomy(vec![EntityId::from("c1")], vec![]);
        store.create(&post).await.unwrap();
        store.delete(&org(), post.id()).await.unwrap();

        assert!(store.find_by_id(&org(), post.id()).await.unwrap().is_none());
        assert!(store.content_categories.read().is_empty());
        assert!(matches!(store.delete(&org(), post.id()).await, Err(RepositoryError::Missing(_))));
    }

    #[tokio::test]
    async fn test_directory() {
        let directory = InMemoryDirectory::new();
        directory.insert_user(UserSummary {
            id: EntityId::from("alice"),
            username: "alice".into(),
            first_name: Some("Alice".into()),
            last_name: None,
        });
        assert!(directory.find_user(&EntityId::from("alice")).await.unwrap().is_some());
        assert!(directory.find_organization(&org()).await.unwrap().is_none());
    }
}
