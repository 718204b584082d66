use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Category assigned to posts and products when the payload names none.
pub const DEFAULT_CATEGORY: &str = "Produto";

/// Publication state of a review. Only published posts are ever served.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    /// Stored but hidden from every read path.
    Draft,
    /// Visible through the read API.
    #[default]
    Published,
}

impl PostStatus {
    /// Column value used in both SQL backends.
    pub fn as_str(self) -> &'static str {
        match self {
            PostStatus::Draft => "draft",
            PostStatus::Published => "published",
        }
    }
}

impl fmt::Display for PostStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PostStatus {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "draft" => Ok(PostStatus::Draft),
            "published" => Ok(PostStatus::Published),
            other => Err(format!("unknown post status `{other}`")),
        }
    }
}

// 完整评测文章
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub content: String, // Markdown 文本
    pub cover_image: Option<String>,
    pub price: Option<f64>,
    pub affiliate_url: Option<String>,
    pub category: String,
    pub status: PostStatus,
    /// Id of the mirrored product when it is listable, i.e. carries an
    /// affiliate link.
    #[serde(default)]
    pub product_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// Whether the read API may return this post.
    pub fn is_visible(&self) -> bool {
        self.status == PostStatus::Published && !self.content.is_empty()
    }
}

// 联盟商品，与同 id 的评测镜像写入
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub affiliate_url: String,
    pub image_url: Option<String>,
    pub price: f64,
    pub category: String,
    pub created_at: DateTime<Utc>,
}

/// Raw row counts reported by the health endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreStats {
    pub posts: u64,
    pub products: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parses_case_insensitively() {
        assert_eq!(" Draft ".parse::<PostStatus>(), Ok(PostStatus::Draft));
        assert_eq!("PUBLISHED".parse::<PostStatus>(), Ok(PostStatus::Published));
        assert!("archived".parse::<PostStatus>().is_err());
    }

    #[test]
    fn status_serializes_lowercase() {
        let json = serde_json::to_string(&PostStatus::Published).expect("serialize status");
        assert_eq!(json, "\"published\"");
    }

    #[test]
    fn post_without_product_id_deserializes() {
        let json = r#"{
            "id": "1",
            "title": "Teclado",
            "slug": "teclado",
            "content": "body",
            "cover_image": null,
            "price": 10.5,
            "affiliate_url": null,
            "category": "Produto",
            "status": "draft",
            "created_at": "2024-01-15T10:00:00Z",
            "updated_at": "2024-01-15T10:00:00Z"
        }"#;
        let post: Post = serde_json::from_str(json).expect("parse post");
        assert_eq!(post.product_id, None);
        assert_eq!(post.status, PostStatus::Draft);
        assert!(!post.is_visible());
    }
}
