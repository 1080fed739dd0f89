//! DocumentType Aggregate
//!
//! Tenant-defined content schema: a titled, slugged, ordered field list.

use chrono::{DateTime, Utc};
use cms_forms::FormSchema;

use crate::domain::value_objects::EntityId;

/// Document type aggregate root
#[derive(Clone, Debug)]
pub struct DocumentType {
    id: EntityId,
    title: String,
    slug: String,
    description: Option<String>,
    fields: FormSchema,
    category_id: Option<EntityId>,
    organization_id: EntityId,
    created_by: EntityId,
    updated_by: EntityId,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    is_active: bool,
}

/// Members a document-type update may replace
#[derive(Clone, Debug, Default)]
pub struct DocumentTypeChanges {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub fields: Option<FormSchema>,
    pub category_id: Option<EntityId>,
}

impl DocumentType {
    /// Create an active document type owned by `actor`
    pub fn create(
        title: impl Into<String>,
        slug: impl Into<String>,
        description: Option<String>,
        fields: FormSchema,
        organization_id: EntityId,
        actor: EntityId,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: EntityId::new(),
            title: title.into(),
            slug: slug.into(),
            description,
            fields,
            category_id: None,
            organization_id,
            created_by: actor.clone(),
            updated_by: actor,
            created_at: now,
            updated_at: now,
            is_active: true,
        }
    }

    pub fn with_category(mut self, category_id: Option<EntityId>) -> Self {
        self.category_id = category_id;
        self
    }

    // Getters

    pub fn id(&self) -> &EntityId { &self.id }
    pub fn title(&self) -> &str { &self.title }
    pub fn slug(&self) -> &str { &self.slug }
    pub fn description(&self) -> Option<&str> { self.description.as_deref() }
    pub fn fields(&self) -> &FormSchema { &self.fields }
    pub fn category_id(&self) -> Option<&EntityId> { self.category_id.as_ref() }
    pub fn organization_id(&self) -> &EntityId { &self.organization_id }
    pub fn created_by(&self) -> &EntityId { &self.created_by }
    pub fn updated_by(&self) -> &EntityId { &self.updated_by }
    pub fn created_at(&self) -> DateTime<Utc> { self.created_at }
    pub fn updated_at(&self) -> DateTime<Utc> { self.updated_at }
    pub fn is_active(&self) -> bool { self.is_active }

    /// Collides with `title` or `slug`
    pub fn collides_with(&self, title: Option<&str>, slug: Option<&str>) -> bool {
        title.is_some_and(|t| t == self.title) || slug.is_some_and(|s| s == self.slug)
    }

    // Operations

    /// Merge the provided members
    pub fn apply(&mut self, changes: DocumentTypeChanges, actor: EntityId) {
        if let Some(title) = changes.title {
            self.title = title;
        }
        if let Some(slug) = changes.slug {
            self.slug = slug;
        }
        if changes.description.is_some() {
            self.description = changes.description;
        }
        if let Some(fields) = changes.fields {
            self.fields = fields;
        }
        if changes.category_id.is_some() {
            self.category_id = changes.category_id;
        }
        self.touch(actor);
    }

    /// Soft delete; the record is retained
    pub fn deactivate(&mut self, actor: EntityId) {
        self.is_active = false;
        self.touch(actor);
    }

    pub fn toggle_active(&mut self, actor: EntityId) {
        self.is_active = !self.is_active;
        self.touch(actor);
    }

    fn touch(&mut self, actor: EntityId) {
        self.updated_by = actor;
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn permit() -> DocumentType {
        DocumentType::create(
            "Permit",
            "permit",
            None,
            FormSchema::default(),
            EntityId::from("org1"),
            EntityId::from("alice"),
        )
    }

    #[test]
    fn test_create_is_active() {
        let doc_type = permit();
        assert!(doc_type.is_active());
        assert_eq!(doc_type.created_by(), doc_type.updated_by());
        assert_eq!(doc_type.created_at(), doc_type.updated_at());
    }

    #[test]
    fn test_apply_merges_and_stamps() {
        let mut doc_type = permit();
        doc_type.apply(
            DocumentTypeChanges {
                description: Some("Building permits".into()),
                ..Default::default()
            },
            EntityId::from("bob"),
        );
        assert_eq!(doc_type.title(), "Permit");
        assert_eq!(doc_type.description(), Some("Building permits"));
        assert_eq!(doc_type.updated_by().as_str(), "bob");
        assert_eq!(doc_type.created_by().as_str(), "alice");
    }

    #[test]
    fn test_toggle_and_deactivate() {
        let mut doc_type = permit();
        doc_type.toggle_active(EntityId::from("bob"));
        assert!(!doc_type.is_active());
        doc_type.toggle_active(EntityId::from("bob"));
        assert!(doc_type.is_active());
        doc_type.deactivate(EntityId::from("carol"));
        assert!(!doc_type.is_active());
        assert_eq!(doc_type.updated_by().as_str(), "carol");
    }

    #[test]
    fn test_collides_with() {
        let doc_type = permit();
        assert!(doc_type.collides_with(Some("Permit"), None));
        assert!(doc_type.collides_with(Some("Other"), Some("permit")));
        assert!(!doc_type.collides_with(Some("permit"), Some("Permit")));
        assert!(!doc_type.collides_with(None, None));
    }
}
