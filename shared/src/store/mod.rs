//! Relational storage for posts and their mirrored products.
//!
//! Both backends implement [`ContentStore`]; callers hold an
//! `Arc<dyn ContentStore>` and never learn which driver is underneath.

mod config;
#[cfg(feature = "mysql")]
mod mysql;
mod sqlite;

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use thiserror::Error;

pub use self::config::StoreConfig;
#[cfg(feature = "mysql")]
pub use self::mysql::MySqlStore;
pub use self::sqlite::SqliteStore;
use crate::{NewPost, Post, Product, StoreStats};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    #[error("storage query failed: {0}")]
    Query(String),
    #[error("storage task failed: {0}")]
    Task(String),
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound)
    }
}

/// The four content operations plus the counters used by health checks.
///
/// Read operations only ever return published posts with content and products
/// with an affiliate link. Errors are never folded into empty results.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Write or replace the post keyed by `post.id`, recomputing its slug, and
    /// mirror a product row with the same id. Both rows are written in one
    /// transaction. Another post already holding the same slug is removed along
    /// with its product.
    async fn upsert_post(&self, post: &NewPost) -> Result<Post, StoreError>;

    /// Published, non-empty posts, newest first.
    async fn list_published_posts(&self) -> Result<Vec<Post>, StoreError>;

    /// Returns [`StoreError::NotFound`] when no visible post has that slug.
    async fn get_post_by_slug(&self, slug: &str) -> Result<Post, StoreError>;

    /// Products with an affiliate link, newest first.
    async fn list_products(&self) -> Result<Vec<Product>, StoreError>;

    /// Total rows in both tables, visible or not.
    async fn stats(&self) -> Result<StoreStats, StoreError>;

    fn backend_name(&self) -> &'static str;
}

/// Open the backend selected by `config`, creating the schema if needed.
pub async fn open_store(config: &StoreConfig) -> Result<Arc<dyn ContentStore>> {
    match config {
        StoreConfig::Sqlite {
            path,
        } => {
            let path = path.clone();
            let store = tokio::task::spawn_blocking(move || SqliteStore::open(&path)).await??;
            Ok(Arc::new(store))
        },
        #[cfg(feature = "mysql")]
        StoreConfig::MySql {
            url,
        } => Ok(Arc::new(MySqlStore::connect(url).await?)),
        #[cfg(not(feature = "mysql"))]
        StoreConfig::MySql {
            ..
        } => anyhow::bail!(
            "a MySQL database is configured but this binary was built without the `mysql` \
             feature"
        ),
    }
}
