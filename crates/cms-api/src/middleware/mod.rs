//! Request middleware and extractors

pub mod auth;
pub mod extract;

pub use auth::Actor;
pub use extract::{ApiJson, ApiQuery};
