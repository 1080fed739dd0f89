//! Domain services

pub mod slug_allocator;

pub use slug_allocator::{SlugAllocator, SlugScope};
