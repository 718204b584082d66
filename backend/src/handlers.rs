use affiliate_shared::{Post, Product, ReceivePostPayload, StoreStats};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use serde_json::{json, Value};

use crate::{auth::RequireApiKey, error::ApiError, state::AppState};

/// Cap on posts/products echoed by the debug endpoint.
const DEBUG_SAMPLE_SIZE: usize = 5;

#[derive(Debug, Serialize)]
pub struct ReceivePostResponse {
    pub success: bool,
    pub message: &'static str,
    pub id: String,
    pub title: String,
    pub slug: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub database: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub records: Option<StoreStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DebugResponse {
    pub message: &'static str,
    pub database: &'static str,
    pub stats: StoreStats,
    pub sample_posts: Vec<Post>,
    pub sample_products: Vec<Product>,
    pub api_key_configured: bool,
}

/// Webhook used by the content generator. Auth runs before the body is parsed.
pub async fn receive_post(
    State(state): State<AppState>,
    _auth: RequireApiKey,
    payload: Result<Json<ReceivePostPayload>, JsonRejection>,
) -> Result<Json<ReceivePostResponse>, ApiError> {
    let Json(payload) = payload?;
    let post = payload.validate()?;

    tracing::info!(id = %post.id, title = %post.title, "received post");

    let stored = state
        .store()
        .upsert_post(&post)
        .await
        .map_err(ApiError::storage("Failed to save post"))?;

    tracing::info!(id = %stored.id, slug = %stored.slug, "post saved");

    Ok(Json(ReceivePostResponse {
        success: true,
        message: "Post received and saved",
        id: stored.id,
        title: stored.title,
        slug: stored.slug,
    }))
}

pub async fn list_posts(State(state): State<AppState>) -> Result<Json<Vec<Post>>, ApiError> {
    let posts = state
        .store()
        .list_published_posts()
        .await
        .map_err(ApiError::storage("Failed to fetch posts"))?;
    tracing::debug!("fetched {} posts", posts.len());
    Ok(Json(posts))
}

pub async fn get_post(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<Post>, ApiError> {
    match state.store().get_post_by_slug(&slug).await {
        Ok(post) => Ok(Json(post)),
        Err(err) if err.is_not_found() => Err(ApiError::PostNotFound),
        Err(err) => Err(ApiError::storage("Failed to fetch post")(err)),
    }
}

pub async fn list_products(State(state): State<AppState>) -> Result<Json<Vec<Product>>, ApiError> {
    let products = state
        .store()
        .list_products()
        .await
        .map_err(ApiError::storage("Failed to fetch products"))?;
    tracing::debug!("fetched {} products", products.len());
    Ok(Json(products))
}

pub async fn health(State(state): State<AppState>) -> Response {
    let database = state.store().backend_name();
    match state.store().stats().await {
        Ok(stats) => Json(HealthResponse {
            status: "healthy",
            database,
            records: Some(stats),
            error: None,
        })
        .into_response(),
        Err(err) => {
            tracing::error!("health check failed: {}", err);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthResponse {
                    status: "unhealthy",
                    database,
                    records: None,
                    error: Some(err.to_string()),
                }),
            )
                .into_response()
        },
    }
}

pub async fn debug_info(State(state): State<AppState>) -> Result<Json<DebugResponse>, ApiError> {
    let store = state.store();
    let stats = store
        .stats()
        .await
        .map_err(ApiError::storage("Debug query failed"))?;
    let mut sample_posts = store
        .list_published_posts()
        .await
        .map_err(ApiError::storage("Debug query failed"))?;
    let mut sample_products = store
        .list_products()
        .await
        .map_err(ApiError::storage("Debug query failed"))?;
    sample_posts.truncate(DEBUG_SAMPLE_SIZE);
    sample_products.truncate(DEBUG_SAMPLE_SIZE);

    Ok(Json(DebugResponse {
        message: "Database debug info",
        database: store.backend_name(),
        stats,
        sample_posts,
        sample_products,
        api_key_configured: state.api_key().is_configured(),
    }))
}

/// Integration instructions for whoever wires up the content generator. The
/// key itself is only ever printed in the server log.
pub async fn webhook_info() -> Json<Value> {
    Json(json!({
        "endpoint": "/api/receive-post",
        "method": "POST",
        "headers": {
            "Content-Type": "application/json",
            "x-api-key": "YOUR_API_KEY",
        },
        "required_fields": affiliate_shared::REQUIRED_FIELDS,
        "sample_payload": {
            "id": "unique-product-id",
            "title": "Product Name",
            "content": "Full review content in markdown",
            "price": 299.99,
            "image_url": "https://example.com/image.jpg",
            "affiliate_url": "https://affiliate-link.com",
            "category": affiliate_shared::DEFAULT_CATEGORY,
        },
    }))
}

pub async fn api_not_found() -> ApiError {
    ApiError::RouteNotFound
}
