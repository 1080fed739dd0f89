//! Content endpoints

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use cms_common::{EntityId, Page};
use cms_content::application::{
    ContentQuery, ContentView, CreateContentCommand, UpdateContentCommand,
};
use std::sync::Arc;

use crate::middleware::{Actor, ApiJson, ApiQuery};
use crate::models::*;
use crate::ApiState;

pub fn router() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/", get(list_content).post(create_content))
        .route("/slug/:slug", get(get_content_by_slug))
        .route(
            "/:id",
            get(get_content).patch(update_content).delete(remove_content),
        )
        .route("/:id/publish", post(publish_content))
}

/// Create content; a taken slug is suffixed
pub async fn create_content(
    State(state): State<Arc<ApiState>>,
    Actor(ctx): Actor,
    ApiJson(input): ApiJson<CreateContentCommand>,
) -> ApiResult<(StatusCode, Json<ApiResponse<ContentView>>)> {
    let view = state.content.create(input, &ctx).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(view))))
}

pub async fn list_content(
    State(state): State<Arc<ApiState>>,
    Actor(ctx): Actor,
    ApiQuery(mut query): ApiQuery<ContentQuery>,
) -> ApiResult<Json<ApiResponse<Page<ContentView>>>> {
    query.limit = query.limit.or(Some(state.config.default_page_limit));
    let page = state.content.find_all(&ctx, query).await?;
    Ok(Json(ApiResponse::success(page)))
}

pub async fn get_content_by_slug(
    State(state): State<Arc<ApiState>>,
    Actor(ctx): Actor,
    Path(slug): Path<String>,
) -> ApiResult<Json<ApiResponse<ContentView>>> {
    let view = state.content.find_by_slug(&slug, &ctx).await?;
    Ok(Json(ApiResponse::success(view)))
}

pub async fn get_content(
    State(state): State<Arc<ApiState>>,
    Actor(ctx): Actor,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<ContentView>>> {
    let view = state.content.find_one(&EntityId::from_string(id), &ctx).await?;
    Ok(Json(ApiResponse::success(view)))
}

/// Update; category and tag lists replace the current sets
pub async fn update_content(
    State(state): State<Arc<ApiState>>,
    Actor(ctx): Actor,
    Path(id): Path<String>,
    ApiJson(input): ApiJson<UpdateContentCommand>,
) -> ApiResult<Json<ApiResponse<ContentView>>> {
    let view = state
        .content
        .update(&EntityId::from_string(id), input, &ctx)
        .await?;
    Ok(Json(ApiResponse::success(view)))
}

pub async fn publish_content(
    State(state): State<Arc<ApiState>>,
    Actor(ctx): Actor,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<ContentView>>> {
    let view = state.content.publish(&EntityId::from_string(id), &ctx).await?;
    Ok(Json(ApiResponse::success(view)))
}

pub async fn remove_content(
    State(state): State<Arc<ApiState>>,
    Actor(ctx): Actor,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state.content.remove(&EntityId::from_string(id), &ctx).await?;
    Ok(StatusCode::NO_CONTENT)
}
