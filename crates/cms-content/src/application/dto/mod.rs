//! Data Transfer Objects (DTOs)
//!
//! Commands coming in, views going out. Commands carry their own shape
//! checks; schema validation of `fields` happens in the services.

use chrono::{DateTime, Utc};
use cms_common::{CmsError, CmsResult};
use cms_forms::FieldDefinition;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::aggregates::{
    Category, Content, ContentStatus, DocumentType, OrganizationSummary, Tag, UserSummary,
};
use crate::domain::value_objects::{is_valid_slug, EntityId, MAX_SLUG_LEN};

// =============================================================================
// Shape checks
// =============================================================================

fn check_length(field: &str, value: &str, max: usize) -> CmsResult<()> {
    if value.is_empty() {
        return Err(CmsError::invalid_field(
            format!("{field} should not be empty"),
            field,
            "not_empty",
        ));
    }
    if value.chars().count() > max {
        return Err(CmsError::invalid_field(
            format!("{field} must be shorter than or equal to {max} characters"),
            field,
            "max_length",
        ));
    }
    Ok(())
}

fn check_slug(value: &str) -> CmsResult<()> {
    check_length("slug", value, MAX_SLUG_LEN)?;
    if !is_valid_slug(value) {
        return Err(CmsError::invalid_field(
            "slug must match ^[a-z0-9-]+$ regular expression",
            "slug",
            "pattern",
        ));
    }
    Ok(())
}

fn check_description(value: Option<&str>) -> CmsResult<()> {
    match value {
        Some(d) if d.chars().count() > MAX_DESCRIPTION_LEN => Err(CmsError::invalid_field(
            format!("description must be shorter than or equal to {MAX_DESCRIPTION_LEN} characters"),
            "description",
            "max_length",
        )),
        _ => Ok(()),
    }
}

fn check_ids(field: &str, ids: Option<&[String]>) -> CmsResult<()> {
    if ids.is_some_and(|ids| ids.iter().any(String::is_empty)) {
        return Err(CmsError::invalid_field(
            format!("each value in {field} should not be empty"),
            field,
            "not_empty",
        ));
    }
    Ok(())
}

pub const MAX_DOCUMENT_TYPE_TITLE_LEN: usize = 100;
pub const MAX_CONTENT_TITLE_LEN: usize = 200;
pub const MAX_DESCRIPTION_LEN: usize = 500;

/// Distinct ids in first-seen order
pub fn distinct_ids(ids: Option<&[String]>) -> Vec<EntityId> {
    let mut out: Vec<EntityId> = Vec::new();
    for id in ids.unwrap_or_default() {
        let id = EntityId::from_string(id.as_str());
        if !out.contains(&id) {
            out.push(id);
        }
    }
    out
}

// =============================================================================
// Document Type Commands
// =============================================================================

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDocumentTypeCommand {
    pub title: String,
    pub slug: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Raw field list; validated before anything is persisted
    #[serde(default)]
    pub fields: Option<Value>,
    #[serde(default)]
    pub category_id: Option<String>,
}

impl CreateDocumentTypeCommand {
    pub fn validate(&self) -> CmsResult<()> {
        check_length("title", &self.title, MAX_DOCUMENT_TYPE_TITLE_LEN)?;
        check_slug(&self.slug)?;
        check_description(self.description.as_deref())
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDocumentTypeCommand {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub fields: Option<Value>,
    #[serde(default)]
    pub category_id: Option<String>,
}

impl UpdateDocumentTypeCommand {
    pub fn validate(&self) -> CmsResult<()> {
        if let Some(title) = &self.title {
            check_length("title", title, MAX_DOCUMENT_TYPE_TITLE_LEN)?;
        }
        if let Some(slug) = &self.slug {
            check_slug(slug)?;
        }
        check_description(self.description.as_deref())
    }
}

/// Document type listing query
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentTypeQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub search: Option<String>,
    pub is_active: Option<bool>,
}

// =============================================================================
// Content Commands
// =============================================================================

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateContentCommand {
    pub title: String,
    pub slug: String,
    #[serde(default)]
    pub content: Option<Value>,
    #[serde(default)]
    pub document_type_id: Option<String>,
    #[serde(default)]
    pub category_ids: Option<Vec<String>>,
    #[serde(default)]
    pub tag_ids: Option<Vec<String>>,
}

impl CreateContentCommand {
    pub fn validate(&self) -> CmsResult<()> {
        check_length("title", &self.title, MAX_CONTENT_TITLE_LEN)?;
        check_slug(&self.slug)?;
        check_ids("categoryIds", self.category_ids.as_deref())?;
        check_ids("tagIds", self.tag_ids.as_deref())
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateContentCommand {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub content: Option<Value>,
    #[serde(default)]
    pub document_type_id: Option<String>,
    #[serde(default)]
    pub category_ids: Option<Vec<String>>,
    #[serde(default)]
    pub tag_ids: Option<Vec<String>>,
    #[serde(default)]
    pub status: Option<ContentStatus>,
}

impl UpdateContentCommand {
    pub fn validate(&self) -> CmsResult<()> {
        if let Some(title) = &self.title {
            check_length("title", title, MAX_CONTENT_TITLE_LEN)?;
        }
        if let Some(slug) = &self.slug {
            check_slug(slug)?;
        }
        if self.document_type_id.as_deref() == Some("") {
            return Err(CmsError::invalid_field(
                "documentTypeId should not be empty",
                "documentTypeId",
                "not_empty",
            ));
        }
        check_ids("categoryIds", self.category_ids.as_deref())?;
        check_ids("tagIds", self.tag_ids.as_deref())
    }
}

/// Content listing query
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentQuery {
    pub document_type_id: Option<String>,
    pub status: Option<ContentStatus>,
    pub category_id: Option<String>,
    pub tag_id: Option<String>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

// =============================================================================
// Views (Read Models)
// =============================================================================

/// Resolved audit relations
#[derive(Clone, Debug, Default)]
pub struct AuditRelations {
    pub creator: Option<UserSummary>,
    pub updater: Option<UserSummary>,
    pub organization: Option<OrganizationSummary>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentSummary {
    pub id: EntityId,
    pub title: String,
    pub slug: String,
    pub status: ContentStatus,
    pub created_at: DateTime<Utc>,
}

impl From<&Content> for ContentSummary {
    fn from(content: &Content) -> Self {
        Self {
            id: content.id().clone(),
            title: content.title().to_string(),
            slug: content.slug().to_string(),
            status: content.status(),
            created_at: content.created_at(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentTypeView {
    pub id: EntityId,
    pub title: String,
    pub slug: String,
    pub description: Option<String>,
    pub fields: Vec<FieldDefinition>,
    pub category_id: Option<EntityId>,
    pub organization_id: EntityId,
    pub is_active: bool,
    pub created_by: EntityId,
    pub updated_by: EntityId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub creator: Option<UserSummary>,
    pub updater: Option<UserSummary>,
    pub organization: Option<OrganizationSummary>,
    pub document_count: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recent_documents: Option<Vec<ContentSummary>>,
}

impl DocumentTypeView {
    pub fn new(
        doc_type: &DocumentType,
        relations: AuditRelations,
        document_count: u64,
        recent_documents: Option<Vec<ContentSummary>>,
    ) -> Self {
        Self {
            id: doc_type.id().clone(),
            title: doc_type.title().to_string(),
            slug: doc_type.slug().to_string(),
            description: doc_type.description().map(str::to_string),
            fields: doc_type.fields().fields().to_vec(),
            category_id: doc_type.category_id().cloned(),
            organization_id: doc_type.organization_id().clone(),
            is_active: doc_type.is_active(),
            created_by: doc_type.created_by().clone(),
            updated_by: doc_type.updated_by().clone(),
            created_at: doc_type.created_at(),
            updated_at: doc_type.updated_at(),
            creator: relations.creator,
            updater: relations.updater,
            organization: relations.organization,
            document_count,
            recent_documents,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentTypeSummary {
    pub id: EntityId,
    pub title: String,
    pub slug: String,
}

impl From<&DocumentType> for DocumentTypeSummary {
    fn from(doc_type: &DocumentType) -> Self {
        Self {
            id: doc_type.id().clone(),
            title: doc_type.title().to_string(),
            slug: doc_type.slug().to_string(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentView {
    pub id: EntityId,
    pub title: String,
    pub slug: String,
    pub content: Value,
    pub status: ContentStatus,
    pub document_type_id: Option<EntityId>,
    pub document_type: Option<DocumentTypeSummary>,
    pub organization_id: EntityId,
    pub organization: Option<OrganizationSummary>,
    pub created_by: EntityId,
    pub updated_by: EntityId,
    pub creator: Option<UserSummary>,
    pub updater: Option<UserSummary>,
    pub categories: Vec<Category>,
    pub tags: Vec<Tag>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub published_at: Option<DateTime<Utc>>,
}

impl ContentView {
    pub fn new(
        content: &Content,
        document_type: Option<DocumentTypeSummary>,
        relations: AuditRelations,
        categories: Vec<Category>,
        tags: Vec<Tag>,
    ) -> Self {
        Self {
            id: content.id().clone(),
            title: content.title().to_string(),
            slug: content.slug().to_string(),
            content: content.body().clone(),
            status: content.status(),
            document_type_id: content.document_type_id().cloned(),
            document_type,
            organization_id: content.organization_id().clone(),
            organization: relations.organization,
            created_by: content.created_by().clone(),
            updated_by: content.updated_by().clone(),
            creator: relations.creator,
            updater: relations.updater,
            categories,
            tags,
            created_at: content.created_at(),
            updated_at: content.updated_at(),
            published_at: content.published_at(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_document_type_shape() {
        let ok = CreateDocumentTypeCommand {
            title: "Permit".into(),
            slug: "permit".into(),
            ..Default::default()
        };
        assert!(ok.validate().is_ok());

        let bad_slug = CreateDocumentTypeCommand {
            slug: "Not A Slug".into(),
            ..ok.clone()
        };
        assert_eq!(
            bad_slug.validate(),
            Err(CmsError::invalid_field(
                "slug must match ^[a-z0-9-]+$ regular expression",
                "slug",
                "pattern"
            ))
        );

        let long_title = CreateDocumentTypeCommand {
            title: "x".repeat(101),
            ..ok.clone()
        };
        assert!(long_title.validate().is_err());

        let long_description = CreateDocumentTypeCommand {
            description: Some("d".repeat(501)),
            ..ok
        };
        assert!(long_description.validate().is_err());
    }

    #[test]
    fn test_update_shape_only_checks_present_members() {
        assert!(UpdateDocumentTypeCommand::default().validate().is_ok());
        let empty_title = UpdateDocumentTypeCommand {
            title: Some(String::new()),
            ..Default::default()
        };
        assert!(empty_title.validate().is_err());
    }

    #[test]
    fn test_content_command_wire_names() {
        let command: CreateContentCommand = serde_json::from_value(json!({
            "title": "Hello",
            "slug": "hello",
            "documentTypeId": "dt-1",
            "categoryIds": ["c1", "c1", "c2"],
        }))
        .unwrap();
        assert_eq!(command.document_type_id.as_deref(), Some("dt-1"));
        assert_eq!(
            distinct_ids(command.category_ids.as_deref()),
            vec![EntityId::from("c1"), EntityId::from("c2")]
        );
        assert!(distinct_ids(command.tag_ids.as_deref()).is_empty());

        let content_title_limit = CreateContentCommand {
            title: "t".repeat(200),
            ..command
        };
        assert!(content_title_limit.validate().is_ok());
    }

    #[test]
    fn test_update_status_wire() {
        let command: UpdateContentCommand =
            serde_json::from_value(json!({ "status": "ARCHIVED" })).unwrap();
        assert_eq!(command.status, Some(ContentStatus::Archived));
        assert!(serde_json::from_value::<UpdateContentCommand>(json!({ "status": "gone" })).is_err());
    }
}
