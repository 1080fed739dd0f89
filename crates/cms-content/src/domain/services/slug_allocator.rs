//! Slug allocation with numeric suffixes
//!
//! `base` if free, otherwise the first free `base-1`, `base-2`, ... probed
//! one at a time. Check-then-act: two concurrent callers may get the same
//! answer, and the store's uniqueness constraint is the final arbiter.

use async_trait::async_trait;
use tracing::debug;

use crate::domain::value_objects::with_suffix;
use crate::ports::outbound::RepoResult;

/// Where a slug must be unique
#[async_trait]
pub trait SlugScope: Send + Sync {
    /// Collision probe for the requested slug
    async fn base_taken(&self, slug: &str) -> RepoResult<bool>;

    /// Collision probe for a suffixed candidate
    async fn candidate_taken(&self, slug: &str) -> RepoResult<bool> {
        self.base_taken(slug).await
    }
}

/// Slug allocator
pub struct SlugAllocator;

impl SlugAllocator {
    /// Allocate a slug in `scope`. A repository error ends the search.
    pub async fn allocate(scope: &dyn SlugScope, base: &str) -> RepoResult<String> {
        if !scope.base_taken(base).await? {
            return Ok(base.to_string());
        }

        let mut n: u64 = 1;
        loop {
            let candidate = with_suffix(base, n);
            debug!(base, candidate = %candidate, "Probing slug candidate");
            if !scope.candidate_taken(&candidate).await? {
                return Ok(candidate);
            }
            n += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::outbound::RepositoryError;
    use proptest::prelude::*;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct TakenSet(HashSet<String>);

    #[async_trait]
    impl SlugScope for TakenSet {
        async fn base_taken(&self, slug: &str) -> RepoResult<bool> {
            Ok(self.0.contains(slug))
        }
    }

    /// Base collides on a second key; candidates only on the slug set
    struct TitleOrSlug {
        title_taken: bool,
        slugs: HashSet<String>,
    }

    #[async_trait]
    impl SlugScope for TitleOrSlug {
        async fn base_taken(&self, slug: &str) -> RepoResult<bool> {
            Ok(self.title_taken || self.slugs.contains(slug))
        }

        async fn candidate_taken(&self, slug: &str) -> RepoResult<bool> {
            Ok(self.slugs.contains(slug))
        }
    }

    struct FailsAfter {
        probes: AtomicUsize,
        ok_probes: usize,
    }

    #[async_trait]
    impl SlugScope for FailsAfter {
        async fn base_taken(&self, _slug: &str) -> RepoResult<bool> {
            if self.probes.fetch_add(1, Ordering::SeqCst) >= self.ok_probes {
                return Err(RepositoryError::Connection("store unreachable".into()));
            }
            Ok(true)
        }
    }

    fn taken(slugs: &[&str]) -> TakenSet {
        TakenSet(slugs.iter().map(|s| s.to_string()).collect())
    }

    #[tokio::test]
    async fn test_free_base_is_returned() {
        let slug = SlugAllocator::allocate(&taken(&["other"]), "post").await.unwrap();
        assert_eq!(slug, "post");
    }

    #[tokio::test]
    async fn test_first_free_suffix() {
        let scope = taken(&["post", "post-1", "post-2"]);
        assert_eq!(SlugAllocator::allocate(&scope, "post").await.unwrap(), "post-3");

        let scope = taken(&["post", "post-2"]);
        assert_eq!(SlugAllocator::allocate(&scope, "post").await.unwrap(), "post-1");
    }

    #[tokio::test]
    async fn test_base_collision_on_title_only() {
        let scope = TitleOrSlug {
            title_taken: true,
            slugs: HashSet::new(),
        };
        assert_eq!(SlugAllocator::allocate(&scope, "permit").await.unwrap(), "permit-1");
    }

    #[tokio::test]
    async fn test_repository_error_aborts() {
        let scope = FailsAfter {
            probes: AtomicUsize::new(0),
            ok_probes: 3,
        };
        let err = SlugAllocator::allocate(&scope, "post").await.unwrap_err();
        assert!(matches!(err, RepositoryError::Connection(_)));
        assert_eq!(scope.probes.load(Ordering::SeqCst), 4);
    }

    proptest! {
        #[test]
        fn prop_free_slug_unchanged(
            base in "[a-z0-9]{1,12}",
            others in proptest::collection::hash_set("[a-z0-9-]{1,14}", 0..20),
        ) {
            let mut others = others;
            others.remove(&base);
            let scope = TakenSet(others);
            let slug = tokio_test::block_on(SlugAllocator::allocate(&scope, &base)).unwrap();
            prop_assert_eq!(slug, base);
        }

        #[test]
        fn prop_suffix_is_first_free(
            base in "[a-z0-9]{1,12}",
            occupied in proptest::collection::hash_set(1u64..12, 0..10),
        ) {
            let mut slugs: HashSet<String> = occupied.iter().map(|n| with_suffix(&base, *n)).collect();
            slugs.insert(base.clone());
            let scope = TakenSet(slugs.clone());

            let slug = tokio_test::block_on(SlugAllocator::allocate(&scope, &base)).unwrap();
            let expected = (1u64..).find(|n| !occupied.contains(n)).map(|n| with_suffix(&base, n));

            prop_assert!(!slugs.contains(&slug));
            prop_assert_eq!(Some(slug), expected);
        }
    }
}
