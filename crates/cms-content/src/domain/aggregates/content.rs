//! Content Aggregate
//!
//! One piece of content, optionally an instance of a document type.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::value_objects::EntityId;

/// Content lifecycle status
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ContentStatus {
    #[default]
    Draft,
    Published,
    Archived,
}

/// Content aggregate root.
///
/// Category and tag links are owned by the taxonomy store; the sets here are
/// whatever the repository hydrated on load.
#[derive(Clone, Debug)]
pub struct Content {
    id: EntityId,
    title: String,
    slug: String,
    body: Value,
    status: ContentStatus,
    document_type_id: Option<EntityId>,
    category_ids: Vec<EntityId>,
    tag_ids: Vec<EntityId>,
    organization_id: EntityId,
    created_by: EntityId,
    updated_by: EntityId,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    published_at: Option<DateTime<Utc>>,
}

impl Content {
    /// Create a draft
    pub fn create(
        title: impl Into<String>,
        slug: impl Into<String>,
        body: Value,
        document_type_id: Option<EntityId>,
        organization_id: EntityId,
        actor: EntityId,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: EntityId::new(),
            title: title.into(),
            slug: slug.into(),
            body,
            status: ContentStatus::Draft,
            document_type_id,
            category_ids: Vec::new(),
            tag_ids: Vec::new(),
            organization_id,
            created_by: actor.clone(),
            updated_by: actor,
            created_at: now,
            updated_at: now,
            published_at: None,
        }
    }

    // Getters

    pub fn id(&self) -> &EntityId { &self.id }
    pub fn title(&self) -> &str { &self.title }
    pub fn slug(&self) -> &str { &self.slug }
    pub fn body(&self) -> &Value { &self.body }
    pub fn status(&self) -> ContentStatus { self.status }
    pub fn document_type_id(&self) -> Option<&EntityId> { self.document_type_id.as_ref() }
    pub fn category_ids(&self) -> &[EntityId] { &self.category_ids }
    pub fn tag_ids(&self) -> &[EntityId] { &self.tag_ids }
    pub fn organization_id(&self) -> &EntityId { &self.organization_id }
    pub fn created_by(&self) -> &EntityId { &self.created_by }
    pub fn updated_by(&self) -> &EntityId { &self.updated_by }
    pub fn created_at(&self) -> DateTime<Utc> { self.created_at }
    pub fn updated_at(&self) -> DateTime<Utc> { self.updated_at }
    pub fn published_at(&self) -> Option<DateTime<Utc>> { self.published_at }

    // Operations

    pub fn rename(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn set_slug(&mut self, slug: impl Into<String>) {
        self.slug = slug.into();
    }

    pub fn set_body(&mut self, body: Value) {
        self.body = body;
    }

    pub fn set_status(&mut self, status: ContentStatus) {
        self.status = status;
    }

    pub fn set_document_type(&mut self, document_type_id: EntityId) {
        self.document_type_id = Some(document_type_id);
    }

    /// Replace both link sets wholesale
    pub fn replace_taxonomy(&mut self, category_ids: Vec<EntityId>, tag_ids: Vec<EntityId>) {
        self.category_ids = category_ids;
        self.tag_ids = tag_ids;
    }

    pub fn publish(&mut self, actor: EntityId) {
        self.status = ContentStatus::Published;
        self.published_at = Some(Utc::now());
        self.touch(actor);
    }

    pub fn touch(&mut self, actor: EntityId) {
        self.updated_by = actor;
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_is_draft() {
        let content = Content::create(
            "Hello",
            "hello",
            json!({ "body": "..." }),
            None,
            EntityId::from("org1"),
            EntityId::from("alice"),
        );
        assert_eq!(content.status(), ContentStatus::Draft);
        assert!(content.published_at().is_none());
        assert!(content.category_ids().is_empty());
    }

    #[test]
    fn test_publish() {
        let mut content = Content::create(
            "Hello",
            "hello",
            Value::Null,
            None,
            EntityId::from("org1"),
            EntityId::from("alice"),
        );
        content.publish(EntityId::from("bob"));
        assert_eq!(content.status(), ContentStatus::Published);
        assert!(content.published_at().is_some());
        assert_eq!(content.updated_by().as_str(), "bob");
    }

    #[test]
    fn test_status_wire_names() {
        let archived: ContentStatus = serde_json::from_value(json!("ARCHIVED")).unwrap();
        assert_eq!(archived, ContentStatus::Archived);
        assert!(serde_json::from_value::<ContentStatus>(json!("draft")).is_err());
        assert_eq!(serde_json::to_value(ContentStatus::Published).unwrap(), json!("PUBLISHED"));
    }
}
