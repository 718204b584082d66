use std::{path::Path, sync::Arc, time::Duration};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rusqlite::{params, types::Type, Connection, ErrorCode, OptionalExtension, Row};

use super::{ContentStore, StoreError};
use crate::{NewPost, Post, PostStatus, Product, StoreStats};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS posts (
    id            TEXT PRIMARY KEY,
    title         TEXT NOT NULL,
    slug          TEXT NOT NULL UNIQUE,
    content       TEXT NOT NULL,
    cover_image   TEXT,
    price         REAL,
    affiliate_url TEXT,
    category      TEXT NOT NULL DEFAULT 'Produto',
    status        TEXT NOT NULL DEFAULT 'published',
    created_at    INTEGER NOT NULL,
    updated_at    INTEGER NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_posts_created_at ON posts (created_at);

CREATE TABLE IF NOT EXISTS products (
    id            TEXT PRIMARY KEY,
    name          TEXT NOT NULL,
    affiliate_url TEXT NOT NULL DEFAULT '',
    image_url     TEXT,
    price         REAL NOT NULL DEFAULT 0,
    category      TEXT NOT NULL DEFAULT 'Produto',
    created_at    INTEGER NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_products_created_at ON products (created_at);
"#;

const POST_COLUMNS: &str = "p.id, p.title, p.slug, p.content, p.cover_image, p.price, \
                            p.affiliate_url, p.category, p.status, p.created_at, p.updated_at, \
                            pr.id AS product_id";

const POST_SOURCE: &str = "posts p LEFT JOIN products pr ON pr.id = p.id AND pr.affiliate_url <> ''";

/// Embedded SQLite backend: one file, one connection shared behind a mutex.
///
/// rusqlite is synchronous, so every operation hops onto the blocking pool.
#[derive(Clone)]
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open (or create) the database file, creating parent directories and
    /// the schema as needed.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|err| {
                StoreError::Unavailable(format!("failed to create {}: {err}", parent.display()))
            })?;
        }
        let conn = Connection::open(path)?;
        let mode: String =
            conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;
        tracing::debug!(journal_mode = %mode, "sqlite journal mode set");
        tracing::info!("Using SQLite database at {}", path.display());
        Self::init(conn)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, StoreError> {
        conn.busy_timeout(Duration::from_secs(5))?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    async fn with_conn<T, F>(&self, op: F) -> Result<T, StoreError>
    where
        T: Send + 'static,
        F: FnOnce(&mut Connection) -> Result<T, StoreError> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let mut guard = conn.lock();
            op(&mut guard)
        })
        .await
        .map_err(|err| StoreError::Task(err.to_string()))?
    }
}

#[async_trait]
impl ContentStore for SqliteStore {
    async fn upsert_post(&self, post: &NewPost) -> Result<Post, StoreError> {
        let post = post.clone();
        self.with_conn(move |conn| {
            let slug = post.slug();
            let now = Utc::now().timestamp_millis();
            let tx = conn.transaction()?;

            // The evicted review's product goes with it.
            tx.execute(
                "DELETE FROM products WHERE id IN (SELECT id FROM posts WHERE slug = ?1 AND id <> ?2)",
                params![slug, post.id],
            )?;
            let evicted = tx.execute("DELETE FROM posts WHERE slug = ?1 AND id <> ?2", params![
                slug, post.id
            ])?;
            if evicted > 0 {
                tracing::warn!(slug = %slug, id = %post.id, "slug collision replaced an older post");
            }

            tx.execute(
                "INSERT INTO posts (id, title, slug, content, cover_image, price, affiliate_url, \
                 category, status, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?10)
                 ON CONFLICT(id) DO UPDATE SET
                    title = excluded.title,
                    slug = excluded.slug,
                    content = excluded.content,
                    cover_image = excluded.cover_image,
                    price = excluded.price,
                    affiliate_url = excluded.affiliate_url,
                    category = excluded.category,
                    status = excluded.status,
                    updated_at = excluded.updated_at",
                params![
                    post.id,
                    post.title,
                    slug,
                    post.content,
                    post.image_url,
                    post.price,
                    post.affiliate_url,
                    post.category,
                    post.status.as_str(),
                    now,
                ],
            )?;

            tx.execute(
                "INSERT INTO products (id, name, affiliate_url, image_url, price, category, \
                 created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                 ON CONFLICT(id) DO UPDATE SET
                    name = excluded.name,
                    affiliate_url = excluded.affiliate_url,
                    image_url = excluded.image_url,
                    price = excluded.price,
                    category = excluded.category",
                params![
                    post.id,
                    post.title,
                    post.product_affiliate_url(),
                    post.image_url,
                    post.product_price(),
                    post.category,
                    now,
                ],
            )?;

            let stored = tx.query_row(
                &format!("SELECT {POST_COLUMNS} FROM {POST_SOURCE} WHERE p.id = ?1"),
                params![post.id],
                post_from_row,
            )?;
            tx.commit()?;
            Ok(stored)
        })
        .await
    }

    async fn list_published_posts(&self) -> Result<Vec<Post>, StoreError> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {POST_COLUMNS} FROM {POST_SOURCE}
                 WHERE p.status = 'published' AND p.content <> ''
                 ORDER BY p.created_at DESC, p.id ASC"
            ))?;
            let posts = stmt
                .query_map([], post_from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(posts)
        })
        .await
    }

    async fn get_post_by_slug(&self, slug: &str) -> Result<Post, StoreError> {
        let slug = slug.to_string();
        self.with_conn(move |conn| {
            conn.query_row(
                &format!(
                    "SELECT {POST_COLUMNS} FROM {POST_SOURCE}
                     WHERE p.slug = ?1 AND p.status = 'published' AND p.content <> ''
                     LIMIT 1"
                ),
                params![slug],
                post_from_row,
            )
            .optional()?
            .ok_or(StoreError::NotFound)
        })
        .await
    }

    async fn list_products(&self) -> Result<Vec<Product>, StoreError> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, name, affiliate_url, image_url, price, category, created_at
                 FROM products
                 WHERE affiliate_url <> ''
                 ORDER BY created_at DESC, id ASC",
            )?;
            let products = stmt
                .query_map([], product_from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(products)
        })
        .await
    }

    async fn stats(&self) -> Result<StoreStats, StoreError> {
        self.with_conn(|conn| {
            let posts: i64 = conn.query_row("SELECT COUNT(*) FROM posts", [], |row| row.get(0))?;
            let products: i64 =
                conn.query_row("SELECT COUNT(*) FROM products", [], |row| row.get(0))?;
            Ok(StoreStats {
                posts: posts.max(0) as u64,
                products: products.max(0) as u64,
            })
        })
        .await
    }

    fn backend_name(&self) -> &'static str {
        "sqlite"
    }
}

fn post_from_row(row: &Row<'_>) -> rusqlite::Result<Post> {
    let status: String = row.get(8)?;
    let status = status.parse::<PostStatus>().map_err(|err| {
        rusqlite::Error::FromSqlConversionFailure(8, Type::Text, err.into())
    })?;
    Ok(Post {
        id: row.get(0)?,
        title: row.get(1)?,
        slug: row.get(2)?,
        content: row.get(3)?,
        cover_image: row.get(4)?,
        price: row.get(5)?,
        affiliate_url: row.get(6)?,
        category: row.get(7)?,
        status,
        created_at: millis_at(row, 9)?,
        updated_at: millis_at(row, 10)?,
        product_id: row.get(11)?,
    })
}

fn product_from_row(row: &Row<'_>) -> rusqlite::Result<Product> {
    Ok(Product {
        id: row.get(0)?,
        name: row.get(1)?,
        affiliate_url: row.get(2)?,
        image_url: row.get(3)?,
        price: row.get(4)?,
        category: row.get(5)?,
        created_at: millis_at(row, 6)?,
    })
}

fn millis_at(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let millis: i64 = row.get(idx)?;
    DateTime::from_timestamp_millis(millis).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            Type::Integer,
            format!("timestamp {millis} out of range").into(),
        )
    })
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::QueryReturnedNoRows => StoreError::NotFound,
            rusqlite::Error::SqliteFailure(failure, _)
                if matches!(
                    failure.code,
                    ErrorCode::DatabaseBusy
                        | ErrorCode::DatabaseLocked
                        | ErrorCode::CannotOpen
                        | ErrorCode::SystemIoFailure
                        | ErrorCode::ReadOnly
                        | ErrorCode::DiskFull
                        | ErrorCode::NotADatabase
                        | ErrorCode::DatabaseCorrupt
                ) =>
            {
                StoreError::Unavailable(err.to_string())
            },
            _ => StoreError::Query(err.to_string()),
        }
    }
}
