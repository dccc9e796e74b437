use axum::{
    Router,
    routing::{delete, get},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::engine::JobEngine;

pub mod handlers;
pub mod models;

pub fn create_router(engine: Arc<JobEngine>) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route(
            "/api/jobs/search",
            get(handlers::search_query_handler).post(handlers::search_handler),
        )
        .route(
            "/api/jobs/details",
            get(handlers::detail_query_handler).post(handlers::detail_handler),
        )
        .route("/api/cache", delete(handlers::clear_cache_handler))
        .route("/api/cache/info", get(handlers::cache_info_handler))
        .route("/health", get(handlers::health_handler))
        .with_state(engine)
        .layer(cors)
}
