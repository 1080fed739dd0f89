//! API Models

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use cms_common::CmsError;
use serde::{Deserialize, Serialize};
use tracing::error;

/// Standard API response
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<ErrorResponse>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self { success: true, data: Some(data), error: None }
    }

    pub fn error(error: ErrorResponse) -> Self {
        Self { success: false, data: None, error: Some(error) }
    }
}

/// Error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule: Option<String>,
}

// ============ Slug suggestion ============

/// Slug suggestion query
#[derive(Debug, Deserialize)]
pub struct SlugSuggestionQuery {
    pub title: String,
    pub slug: Option<String>,
}

/// Suggested slug
#[derive(Debug, Serialize, Deserialize)]
pub struct SlugSuggestion {
    pub slug: String,
}

/// Page/limit query
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

// ============ Errors ============

/// Engine error rendered as an HTTP response
#[derive(Debug)]
pub struct ApiError(pub CmsError);

impl From<CmsError> for ApiError {
    fn from(err: CmsError) -> Self {
        Self(err)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self.0 {
            CmsError::NotFound { .. } => StatusCode::NOT_FOUND,
            CmsError::Conflict(_) => StatusCode::CONFLICT,
            CmsError::ValidationFailed { .. } | CmsError::PreconditionFailed(_) => {
                StatusCode::BAD_REQUEST
            }
            CmsError::Unauthorized => StatusCode::UNAUTHORIZED,
            CmsError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (field, rule) = match &self.0 {
            CmsError::ValidationFailed { field, rule, .. } => (field.clone(), rule.clone()),
            _ => (None, None),
        };
        let message = match &self.0 {
            CmsError::Storage(detail) => {
                error!(error = %detail, "Storage failure");
                "internal error".to_string()
            }
            other => other.to_string(),
        };

        let body = ApiResponse::<()>::error(ErrorResponse {
            code: self.0.code().to_string(),
            message,
            field,
            rule,
        });
        (status, Json(body)).into_response()
    }
}

/// Handler result
pub type ApiResult<T> = Result<T, ApiError>;
