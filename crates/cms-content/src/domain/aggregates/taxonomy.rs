//! Taxonomy and directory records
//!
//! Read-mostly records owned by other parts of the system. This crate only
//! resolves them for views.

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::EntityId;

/// Organization-scoped category
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: EntityId,
    #[serde(skip)]
    pub organization_id: EntityId,
    pub name: String,
    pub slug: String,
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<EntityId>,
}

/// Organization-scoped tag
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    pub id: EntityId,
    #[serde(skip)]
    pub organization_id: EntityId,
    pub name: String,
    pub slug: String,
    pub color: Option<String>,
}

/// Public part of a user record
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: EntityId,
    pub username: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// Public part of an organization record
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationSummary {
    pub id: EntityId,
    pub name: String,
    pub slug: String,
}

impl Category {
    pub fn new(
        organization_id: EntityId,
        name: impl Into<String>,
        slug: impl Into<String>,
    ) -> Self {
        Self {
            id: EntityId::new(),
            organization_id,
            name: name.into(),
            slug: slug.into(),
            color: None,
            parent_id: None,
        }
    }
}

impl Tag {
    pub fn new(
        organization_id: EntityId,
        name: impl Into<String>,
        slug: impl Into<String>,
    ) -> Self {
        Self {
            id: EntityId::new(),
            organization_id,
            name: name.into(),
            slug: slug.into(),
            color: None,
        }
    }
}
