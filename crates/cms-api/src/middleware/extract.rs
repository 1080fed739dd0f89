//! Body and query extractors that answer malformed input in the API envelope

use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, Query, Request},
    http::request::Parts,
    Json,
};
use cms_common::CmsError;
use serde::de::DeserializeOwned;

use crate::models::ApiError;

/// JSON body; undecodable bodies become `VALIDATION_FAILED` on `body`
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| {
                CmsError::invalid_field(rejection.body_text(), "body", "invalid_body")
            })?;
        Ok(Self(value))
    }
}

/// Query string; undecodable parameters become `VALIDATION_FAILED` on `query`
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiQuery<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for ApiQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| {
                CmsError::invalid_field(rejection.body_text(), "query", "invalid_query")
            })?;
        Ok(Self(value))
    }
}
