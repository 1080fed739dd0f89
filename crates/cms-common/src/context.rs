//! Actor context and identifiers

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{CmsError, CmsResult};

/// Identifier value object for entities
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    /// Fresh random identifier
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Wrap an existing identifier
    pub fn from_string(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the inner value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for EntityId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for EntityId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Authenticated actor, supplied by the authentication collaborator.
///
/// This crate never authenticates; it only carries the values used to stamp
/// audit fields and scope every lookup to one organization.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActorContext {
    actor_id: EntityId,
    organization_id: EntityId,
}

impl ActorContext {
    /// Build a context; empty values are rejected as unauthorized
    pub fn new(actor_id: impl Into<String>, organization_id: impl Into<String>) -> CmsResult<Self> {
        let actor_id = actor_id.into();
        let organization_id = organization_id.into();
        if actor_id.trim().is_empty() || organization_id.trim().is_empty() {
            return Err(CmsError::Unauthorized);
        }
        Ok(Self {
            actor_id: EntityId::from_string(actor_id),
            organization_id: EntityId::from_string(organization_id),
        })
    }

    /// Acting user
    pub fn actor_id(&self) -> &EntityId {
        &self.actor_id
    }

    /// Tenant boundary
    pub fn organization_id(&self) -> &EntityId {
        &self.organization_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_requires_both_ids() {
        assert!(ActorContext::new("user-1", "org-1").is_ok());
        assert_eq!(ActorContext::new("", "org-1"), Err(CmsError::Unauthorized));
        assert_eq!(ActorContext::new("user-1", "  "), Err(CmsError::Unauthorized));
    }

    #[test]
    fn test_entity_id() {
        let id = EntityId::from_string("abc");
        assert_eq!(id.as_str(), "abc");
        assert_eq!(id.to_string(), "abc");
        assert_ne!(EntityId::new(), EntityId::new());
    }
}
