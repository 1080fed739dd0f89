//! Document type endpoints

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, patch};
use axum::{Json, Router};
use cms_common::{EntityId, Page};
use cms_content::application::{
    ContentSummary, CreateDocumentTypeCommand, DocumentTypeQuery, DocumentTypeView,
    UpdateDocumentTypeCommand,
};
use std::sync::Arc;

use crate::middleware::{Actor, ApiJson, ApiQuery};
use crate::models::*;
use crate::ApiState;

pub fn router() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/", get(list_document_types).post(create_document_type))
        .route("/slug-suggestion", get(suggest_slug))
        .route("/slug/:slug", get(get_document_type_by_slug))
        .route(
            "/:id",
            get(get_document_type)
                .patch(update_document_type)
                .delete(deactivate_document_type),
        )
        .route("/:id/toggle-active", patch(toggle_document_type))
        .route("/:id/documents", get(list_documents))
}

/// Create a document type
pub async fn create_document_type(
    State(state): State<Arc<ApiState>>,
    Actor(ctx): Actor,
    ApiJson(input): ApiJson<CreateDocumentTypeCommand>,
) -> ApiResult<(StatusCode, Json<ApiResponse<DocumentTypeView>>)> {
    let view = state.document_types.create(input, &ctx).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(view))))
}

/// List document types
pub async fn list_document_types(
    State(state): State<Arc<ApiState>>,
    Actor(ctx): Actor,
    ApiQuery(mut query): ApiQuery<DocumentTypeQuery>,
) -> ApiResult<Json<ApiResponse<Page<DocumentTypeView>>>> {
    query.limit = query.limit.or(Some(state.config.default_page_limit));
    let page = state.document_types.find_all(&ctx, query).await?;
    Ok(Json(ApiResponse::success(page)))
}

/// First free slug for a title
pub async fn suggest_slug(
    State(state): State<Arc<ApiState>>,
    Actor(ctx): Actor,
    ApiQuery(query): ApiQuery<SlugSuggestionQuery>,
) -> ApiResult<Json<ApiResponse<SlugSuggestion>>> {
    let slug = state
        .document_types
        .suggest_slug(&query.title, query.slug.as_deref(), &ctx)
        .await?;
    Ok(Json(ApiResponse::success(SlugSuggestion { slug })))
}

pub async fn get_document_type_by_slug(
    State(state): State<Arc<ApiState>>,
    Actor(ctx): Actor,
    Path(slug): Path<String>,
) -> ApiResult<Json<ApiResponse<DocumentTypeView>>> {
    let view = state.document_types.find_by_slug(&slug, &ctx).await?;
    Ok(Json(ApiResponse::success(view)))
}

pub async fn get_document_type(
    State(state): State<Arc<ApiState>>,
    Actor(ctx): Actor,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<DocumentTypeView>>> {
    let view = state
        .document_types
        .find_one(&EntityId::from_string(id), &ctx)
        .await?;
    Ok(Json(ApiResponse::success(view)))
}

pub async fn update_document_type(
    State(state): State<Arc<ApiState>>,
    Actor(ctx): Actor,
    Path(id): Path<String>,
    ApiJson(input): ApiJson<UpdateDocumentTypeCommand>,
) -> ApiResult<Json<ApiResponse<DocumentTypeView>>> {
    let view = state
        .document_types
        .update(&EntityId::from_string(id), input, &ctx)
        .await?;
    Ok(Json(ApiResponse::success(view)))
}

/// Soft delete
pub async fn deactivate_document_type(
    State(state): State<Arc<ApiState>>,
    Actor(ctx): Actor,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state
        .document_types
        .deactivate(&EntityId::from_string(id), &ctx)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn toggle_document_type(
    State(state): State<Arc<ApiState>>,
    Actor(ctx): Actor,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<DocumentTypeView>>> {
    let view = state
        .document_types
        .toggle_active(&EntityId::from_string(id), &ctx)
        .await?;
    Ok(Json(ApiResponse::success(view)))
}

/// Documents of one type, newest first
pub async fn list_documents(
    State(state): State<Arc<ApiState>>,
    Actor(ctx): Actor,
    Path(id): Path<String>,
    ApiQuery(query): ApiQuery<PageQuery>,
) -> ApiResult<Json<ApiResponse<Page<ContentSummary>>>> {
    let limit = query.limit.or(Some(state.config.default_page_limit));
    let page = state
        .document_types
        .documents_by_type(&EntityId::from_string(id), &ctx, query.page, limit)
        .await?;
    Ok(Json(ApiResponse::success(page)))
}
