use std::path::Path;

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    services::{ServeDir, ServeFile},
};

use crate::{handlers, request_context::request_context_middleware, state::AppState};

/// Webhook payloads carry whole markdown articles.
const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

pub fn create_router(state: AppState, static_dir: &Path) -> Router {
    // Configure CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api = Router::new()
        .route("/receive-post", post(handlers::receive_post))
        .route("/posts", get(handlers::list_posts))
        .route("/posts/:slug", get(handlers::get_post))
        .route("/products", get(handlers::list_products))
        .route("/health", get(handlers::health))
        .route("/debug", get(handlers::debug_info))
        .route("/webhook-info", get(handlers::webhook_info))
        .fallback(handlers::api_not_found)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES));

    // Anything outside /api is the SPA: real files first, then the app shell so
    // client-side routes survive a reload.
    let frontend =
        ServeDir::new(static_dir).fallback(ServeFile::new(static_dir.join("index.html")));

    Router::new()
        .nest("/api", api)
        .fallback_service(frontend)
        .with_state(state)
        .layer(middleware::from_fn(request_context_middleware))
        .layer(cors)
}
