//! OpenSASE CMS API
//!
//! REST surface for document types and content. Every route except the
//! health check requires the actor headers set by the authentication gateway.

pub mod config;
pub mod middleware;
pub mod models;
pub mod routes;

use axum::{routing::get, Router};
use cms_content::{
    ContentService, ContentUseCases, DocumentTypeService, DocumentTypeUseCases,
    InMemoryContentStore, InMemoryDirectory, InMemoryDocumentTypeRepository, TaxonomyCache,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub use config::ServerConfig;
pub use models::*;

/// API state
#[derive(Clone)]
pub struct ApiState {
    pub document_types: Arc<dyn DocumentTypeUseCases>,
    pub content: Arc<dyn ContentUseCases>,
    pub config: Arc<ServerConfig>,
}

impl ApiState {
    /// Services over the in-memory adapters
    pub fn in_memory(config: ServerConfig) -> Self {
        let doc_types = Arc::new(InMemoryDocumentTypeRepository::new());
        let store = Arc::new(InMemoryContentStore::new());
        let directory = Arc::new(InMemoryDirectory::new());
        let cache = TaxonomyCache::new(config.cache.capacity, config.cache.ttl());

        let document_types =
            DocumentTypeService::new(doc_types.clone(), store.clone(), directory.clone());
        let content = ContentService::new(store.clone(), store, doc_types, directory, cache);

        Self {
            document_types: Arc::new(document_types),
            content: Arc::new(content),
            config: Arc::new(config),
        }
    }
}

/// Build the API router
pub fn build_router(state: ApiState) -> Router {
    Router::new()
        .route("/health", get(routes::health::health_check))
        .nest("/api/v1", api_routes())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(Arc::new(state))
}

fn api_routes() -> Router<Arc<ApiState>> {
    Router::new()
        .nest("/document-types", routes::document_types::router())
        .nest("/content", routes::content::router())
}
