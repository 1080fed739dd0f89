//! Taxonomy lookup cache
//!
//! Bounded cache of categories and tags keyed by (organization, id), owned
//! by the content service. Content writes never change these records, so
//! entries are not invalidated; a renamed or deleted category stays visible
//! for at most the time-to-live.

use std::time::Duration;

use moka::sync::Cache;

use crate::domain::aggregates::{Category, Tag};
use crate::domain::value_objects::EntityId;

type Key = (EntityId, EntityId);

/// Category/tag cache
pub struct TaxonomyCache {
    categories: Cache<Key, Category>,
    tags: Cache<Key, Tag>,
}

impl TaxonomyCache {
    /// Create cache holding at most `capacity` entries of each kind
    pub fn new(capacity: u64, ttl: Duration) -> Self {
        let categories = Cache::builder()
            .max_capacity(capacity)
            .time_to_live(ttl)
            .build();
        let tags = Cache::builder()
            .max_capacity(capacity)
            .time_to_live(ttl)
            .build();

        Self { categories, tags }
    }

    pub fn category(&self, org: &EntityId, id: &EntityId) -> Option<Category> {
        self.categories.get(&(org.clone(), id.clone()))
    }

    pub fn insert_category(&self, category: Category) {
        let key = (category.organization_id.clone(), category.id.clone());
        self.categories.insert(key, category);
    }

    pub fn tag(&self, org: &EntityId, id: &EntityId) -> Option<Tag> {
        self.tags.get(&(org.clone(), id.clone()))
    }

    pub fn insert_tag(&self, tag: Tag) {
        let key = (tag.organization_id.clone(), tag.id.clone());
        self.tags.insert(key, tag);
    }
}

impl Default for TaxonomyCache {
    fn default() -> Self {
        Self::new(10_000, Duration::from_secs(300))
    }
}
