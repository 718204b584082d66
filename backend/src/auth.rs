use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use crate::{error::ApiError, state::AppState};

pub const API_KEY_HEADER: &str = "x-api-key";

/// Extractor that only succeeds when the request carries the webhook secret.
///
/// Place it before any body extractor so unauthenticated requests are rejected
/// without the payload ever being parsed.
pub struct RequireApiKey;

#[async_trait]
impl FromRequestParts<AppState> for RequireApiKey {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let provided = parts
            .headers
            .get(API_KEY_HEADER)
            .and_then(|value| value.to_str().ok())
            .filter(|value| !value.is_empty());

        match provided {
            Some(candidate) if state.api_key().matches(candidate) => Ok(RequireApiKey),
            Some(_) => {
                tracing::warn!("rejected ingestion request with wrong API key");
                Err(ApiError::Unauthorized)
            },
            None => {
                tracing::warn!("rejected ingestion request without API key");
                Err(ApiError::Unauthorized)
            },
        }
    }
}
