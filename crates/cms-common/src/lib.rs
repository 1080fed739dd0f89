//! OpenSASE CMS Common - Shared types for the document-type engine
//!
//! This crate provides the primitives every other CMS crate speaks:
//! - Error taxonomy ([`CmsError`])
//! - Authenticated actor context ([`ActorContext`])
//! - Entity identifiers ([`EntityId`])
//! - Pagination ([`Pagination`], [`Page`])
//!
//! Error kinds are kept disjoint so callers can discriminate not-found,
//! validation, conflict and precondition failures without string matching.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod context;
pub mod error;
pub mod pagination;

pub use context::{ActorContext, EntityId};
pub use error::{CmsError, CmsResult};
pub use pagination::{Page, PageMeta, Pagination};
