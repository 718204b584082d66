use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{
    mysql::{MySqlPool, MySqlPoolOptions, MySqlRow},
    Row,
};

use super::{ContentStore, StoreError};
use crate::{NewPost, Post, PostStatus, Product, StoreStats};

const SCHEMA: [&str; 2] = [
    r#"CREATE TABLE IF NOT EXISTS posts (
        id            VARCHAR(191) NOT NULL PRIMARY KEY,
        title         TEXT NOT NULL,
        slug          VARCHAR(191) NOT NULL UNIQUE,
        content       LONGTEXT NOT NULL,
        cover_image   TEXT NULL,
        price         DOUBLE NULL,
        affiliate_url TEXT NULL,
        category      VARCHAR(191) NOT NULL DEFAULT 'Produto',
        status        VARCHAR(16) NOT NULL DEFAULT 'published',
        created_at    BIGINT NOT NULL,
        updated_at    BIGINT NOT NULL,
        INDEX idx_posts_created_at (created_at)
    ) CHARACTER SET utf8mb4"#,
    r#"CREATE TABLE IF NOT EXISTS products (
        id            VARCHAR(191) NOT NULL PRIMARY KEY,
        name          TEXT NOT NULL,
        affiliate_url TEXT NOT NULL,
        image_url     TEXT NULL,
        price         DOUBLE NOT NULL,
        category      VARCHAR(191) NOT NULL DEFAULT 'Produto',
        created_at    BIGINT NOT NULL,
        INDEX idx_products_created_at (created_at)
    ) CHARACTER SET utf8mb4"#,
];

const SELECT_POSTS: &str = "SELECT p.id, p.title, p.slug, p.content, p.cover_image, p.price, \
                            p.affiliate_url, p.category, p.status, p.created_at, p.updated_at, \
                            pr.id AS product_id
                            FROM posts p
                            LEFT JOIN products pr ON pr.id = p.id AND pr.affiliate_url <> ''";

/// Networked MySQL backend backed by an sqlx connection pool.
#[derive(Clone)]
pub struct MySqlStore {
    pool: MySqlPool,
}

impl MySqlStore {
    pub async fn connect(url: &str) -> Result<Self, StoreError> {
        let pool = MySqlPoolOptions::new()
            .max_connections(10)
            .connect(url)
            .await?;
        for statement in SCHEMA {
            sqlx::query(statement).execute(&pool).await?;
        }
        tracing::info!("Connected to MySQL database");
        Ok(Self {
            pool,
        })
    }
}

#[async_trait]
impl ContentStore for MySqlStore {
    async fn upsert_post(&self, post: &NewPost) -> Result<Post, StoreError> {
        let slug = post.slug();
        let now = Utc::now().timestamp_millis();
        let mut tx = self.pool.begin().await?;

        // The evicted review's product goes with it.
        sqlx::query(
            "DELETE FROM products WHERE id IN (SELECT id FROM posts WHERE slug = ? AND id <> ?)",
        )
        .bind(&slug)
        .bind(&post.id)
        .execute(&mut *tx)
        .await?;
        let evicted = sqlx::query("DELETE FROM posts WHERE slug = ? AND id <> ?")
            .bind(&slug)
            .bind(&post.id)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        if evicted > 0 {
            tracing::warn!(slug = %slug, id = %post.id, "slug collision replaced an older post");
        }

        sqlx::query(
            "INSERT INTO posts (id, title, slug, content, cover_image, price, affiliate_url, \
             category, status, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             ON DUPLICATE KEY UPDATE
                title = VALUES(title),
                slug = VALUES(slug),
                content = VALUES(content),
                cover_image = VALUES(cover_image),
                price = VALUES(price),
                affiliate_url = VALUES(affiliate_url),
                category = VALUES(category),
                status = VALUES(status),
                updated_at = VALUES(updated_at)",
        )
        .bind(&post.id)
        .bind(&post.title)
        .bind(&slug)
        .bind(&post.content)
        .bind(&post.image_url)
        .bind(post.price)
        .bind(&post.affiliate_url)
        .bind(&post.category)
        .bind(post.status.as_str())
        .bind(now)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            "INSERT INTO products (id, name, affiliate_url, image_url, price, category, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)
             ON DUPLICATE KEY UPDATE
                name = VALUES(name),
                affiliate_url = VALUES(affiliate_url),
                image_url = VALUES(image_url),
                price = VALUES(price),
                category = VALUES(category)",
        )
        .bind(&post.id)
        .bind(&post.title)
        .bind(post.product_affiliate_url())
        .bind(&post.image_url)
        .bind(post.product_price())
        .bind(&post.category)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        let row = sqlx::query(&format!("{SELECT_POSTS} WHERE p.id = ?"))
            .bind(&post.id)
            .fetch_one(&mut *tx)
            .await?;
        let stored = post_from_row(&row)?;
        tx.commit().await?;
        Ok(stored)
    }

    async fn list_published_posts(&self) -> Result<Vec<Post>, StoreError> {
        let rows = sqlx::query(&format!(
            "{SELECT_POSTS} WHERE p.status = 'published' AND p.content <> '' ORDER BY \
             p.created_at DESC, p.id ASC"
        ))
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(post_from_row).collect()
    }

    async fn get_post_by_slug(&self, slug: &str) -> Result<Post, StoreError> {
        let row = sqlx::query(&format!(
            "{SELECT_POSTS} WHERE p.slug = ? AND p.status = 'published' AND p.content <> '' LIMIT 1"
        ))
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound)?;
        post_from_row(&row)
    }

    async fn list_products(&self) -> Result<Vec<Product>, StoreError> {
        let rows = sqlx::query(
            "SELECT id, name, affiliate_url, image_url, price, category, created_at
             FROM products
             WHERE affiliate_url <> ''
             ORDER BY created_at DESC, id ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(product_from_row).collect()
    }

    async fn stats(&self) -> Result<StoreStats, StoreError> {
        let posts: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM posts")
            .fetch_one(&self.pool)
            .await?;
        let products: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;
        Ok(StoreStats {
            posts: posts.max(0) as u64,
            products: products.max(0) as u64,
        })
    }

    fn backend_name(&self) -> &'static str {
        "mysql"
    }
}

fn post_from_row(row: &MySqlRow) -> Result<Post, StoreError> {
    let status: String = row.try_get("status")?;
    Ok(Post {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        slug: row.try_get("slug")?,
        content: row.try_get("content")?,
        cover_image: row.try_get("cover_image")?,
        price: row.try_get("price")?,
        affiliate_url: row.try_get("affiliate_url")?,
        category: row.try_get("category")?,
        status: status.parse::<PostStatus>().map_err(StoreError::Query)?,
        product_id: row.try_get("product_id")?,
        created_at: millis(row.try_get("created_at")?)?,
        updated_at: millis(row.try_get("updated_at")?)?,
    })
}

fn product_from_row(row: &MySqlRow) -> Result<Product, StoreError> {
    Ok(Product {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        affiliate_url: row.try_get("affiliate_url")?,
        image_url: row.try_get("image_url")?,
        price: row.try_get("price")?,
        category: row.try_get("category")?,
        created_at: millis(row.try_get("created_at")?)?,
    })
}

fn millis(value: i64) -> Result<DateTime<Utc>, StoreError> {
    DateTime::from_timestamp_millis(value)
        .ok_or_else(|| StoreError::Query(format!("timestamp {value} out of range")))
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => StoreError::NotFound,
            sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::Configuration(_)
            | sqlx::Error::WorkerCrashed => StoreError::Unavailable(err.to_string()),
            other => StoreError::Query(other.to_string()),
        }
    }
}
