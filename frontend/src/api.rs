use affiliate_shared::{Post, Product, StoreStats};
use gloo_net::http::Request;
use serde::{de::DeserializeOwned, Deserialize};

use crate::config::api_url;
#[cfg(feature = "demo")]
use crate::sample_data;

/// Where a loaded value came from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DataSource {
    /// Returned by the API.
    #[default]
    Live,
    /// Bundled sample content substituted because the API call failed.
    Sample { reason: String },
}

impl DataSource {
    pub fn is_sample(&self) -> bool {
        matches!(self, DataSource::Sample { .. })
    }
}

/// A fetched value tagged with its provenance.
#[derive(Debug, Clone, PartialEq)]
pub struct Loaded<T> {
    pub data: T,
    pub source: DataSource,
}

impl<T> Loaded<T> {
    pub fn live(data: T) -> Self {
        Self {
            data,
            source: DataSource::Live,
        }
    }

    #[cfg(feature = "demo")]
    fn sample(data: T, reason: String) -> Self {
        Self {
            data,
            source: DataSource::Sample {
                reason,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub database: String,
    #[serde(default)]
    pub records: Option<StoreStats>,
    #[serde(default)]
    pub error: Option<String>,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

/// GET a JSON document; `Ok(None)` on 404.
async fn get_json<T: DeserializeOwned>(path: &str) -> Result<Option<T>, String> {
    let url = api_url(path);

    let response = Request::get(&url)
        .header("Accept", "application/json")
        .send()
        .await
        .map_err(|e| format!("Network error: {:?}", e))?;

    if response.status() == 404 {
        return Ok(None);
    }

    if !response.ok() {
        let body = response.text().await.unwrap_or_default();
        return Err(error_message(response.status(), &body));
    }

    let value: T = response
        .json()
        .await
        .map_err(|e| format!("Parse error: {:?}", e))?;

    Ok(Some(value))
}

/// Prefer the server's `{error, details}` body over a bare status code.
fn error_message(status: u16, body: &str) -> String {
    #[derive(Deserialize)]
    struct ErrorBody {
        error: String,
        #[serde(default)]
        details: Option<String>,
    }

    match serde_json::from_str::<ErrorBody>(body) {
        Ok(ErrorBody {
            error,
            details: Some(details),
        }) => format!("HTTP error {}: {} ({})", status, error, details),
        Ok(ErrorBody {
            error, ..
        }) => format!("HTTP error {}: {}", status, error),
        Err(_) => format!("HTTP error: {}", status),
    }
}

/// 获取已发布的评测列表
pub async fn fetch_posts() -> Result<Vec<Post>, String> {
    get_json("/posts")
        .await?
        .ok_or_else(|| "HTTP error: 404".to_string())
}

/// 获取单篇评测；不存在时返回 None
pub async fn fetch_post(slug: &str) -> Result<Option<Post>, String> {
    get_json(&format!("/posts/{}", urlencoding::encode(slug))).await
}

/// 获取带联盟链接的商品列表
pub async fn fetch_products() -> Result<Vec<Product>, String> {
    get_json("/products")
        .await?
        .ok_or_else(|| "HTTP error: 404".to_string())
}

/// Health endpoint. A 503 still carries a body, so it is decoded rather than
/// reported as a transport error.
pub async fn fetch_health() -> Result<HealthStatus, String> {
    let response = Request::get(&api_url("/health"))
        .send()
        .await
        .map_err(|e| format!("Network error: {:?}", e))?;

    response
        .json::<HealthStatus>()
        .await
        .map_err(|e| format!("Parse error: {:?}", e))
}

pub async fn load_posts() -> Result<Loaded<Vec<Post>>, String> {
    match fetch_posts().await {
        Ok(posts) => Ok(Loaded::live(posts)),
        #[cfg(feature = "demo")]
        Err(e) => {
            report_fallback("posts", &e);
            Ok(Loaded::sample(sample_data::posts(), e))
        },
        #[cfg(not(feature = "demo"))]
        Err(e) => Err(e),
    }
}

/// A live 404 stays `None`; sample data is only used when the request failed.
pub async fn load_post(slug: &str) -> Result<Loaded<Option<Post>>, String> {
    match fetch_post(slug).await {
        Ok(post) => Ok(Loaded::live(post)),
        #[cfg(feature = "demo")]
        Err(e) => {
            report_fallback("post", &e);
            Ok(Loaded::sample(sample_data::post_by_slug(slug), e))
        },
        #[cfg(not(feature = "demo"))]
        Err(e) => Err(e),
    }
}

pub async fn load_products() -> Result<Loaded<Vec<Product>>, String> {
    match fetch_products().await {
        Ok(products) => Ok(Loaded::live(products)),
        #[cfg(feature = "demo")]
        Err(e) => {
            report_fallback("products", &e);
            Ok(Loaded::sample(sample_data::products(), e))
        },
        #[cfg(not(feature = "demo"))]
        Err(e) => Err(e),
    }
}

#[cfg(feature = "demo")]
fn report_fallback(what: &str, error: &str) {
    web_sys::console::warn_1(
        &format!("Failed to fetch {}, showing sample data: {}", what, error).into(),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_message_uses_server_body() {
        let body = r#"{"error":"Failed to fetch posts","details":"database is locked"}"#;
        assert_eq!(
            error_message(503, body),
            "HTTP error 503: Failed to fetch posts (database is locked)"
        );
        assert_eq!(error_message(401, r#"{"error":"Unauthorized"}"#), "HTTP error 401: Unauthorized");
        assert_eq!(error_message(502, "<html>bad gateway</html>"), "HTTP error: 502");
    }

    #[test]
    fn health_body_without_records_parses() {
        let health: HealthStatus = serde_json::from_str(
            r#"{"status":"unhealthy","database":"sqlite","error":"disk I/O error"}"#,
        )
        .expect("parse health");
        assert!(!health.is_healthy());
        assert_eq!(health.records, None);
    }

    #[test]
    fn sample_source_is_flagged() {
        assert!(!DataSource::Live.is_sample());
        assert!(DataSource::Sample {
            reason: "offline".into()
        }
        .is_sample());
    }
}
