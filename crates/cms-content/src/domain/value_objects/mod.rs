//! Content value objects

pub mod slug;

pub use cms_common::EntityId;
pub use slug::{is_valid_slug, slugify, with_suffix, MAX_SLUG_LEN};
