//! Actor context extraction
//!
//! Authentication happens upstream. The gateway forwards the verified user
//! and organization as headers; requests without both are rejected.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use cms_common::{ActorContext, CmsError};

use crate::models::ApiError;

pub const ACTOR_HEADER: &str = "x-actor-id";
pub const ORGANIZATION_HEADER: &str = "x-organization-id";

/// Authenticated actor of the request
#[derive(Debug, Clone)]
pub struct Actor(pub ActorContext);

fn header<'a>(parts: &'a Parts, name: &str) -> Option<&'a str> {
    parts.headers.get(name).and_then(|v| v.to_str().ok())
}

#[async_trait]
impl<S> FromRequestParts<S> for Actor
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let actor = header(parts, ACTOR_HEADER).ok_or(CmsError::Unauthorized)?;
        let organization = header(parts, ORGANIZATION_HEADER).ok_or(CmsError::Unauthorized)?;
        Ok(Self(ActorContext::new(actor, organization)?))
    }
}
