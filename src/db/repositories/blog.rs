//! Blog repository

use crate::config::DatabaseDriver;
use crate::db::{require_mysql, require_sqlite, DynDatabasePool};
use crate::models::Blog;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{MySqlPool, Row, SqlitePool};
use std::sync::Arc;

#[async_trait]
pub trait BlogRepository: Send + Sync {
    async fn create(&self) -> Result<Blog>;
    async fn get_by_id(&self, id: i64) -> Result<Option<Blog>>;
    /// The blog with the lowest id, if any
    async fn first(&self) -> Result<Option<Blog>>;
}

pub struct SqlxBlogRepository {
    pool: DynDatabasePool,
}

impl SqlxBlogRepository {
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn BlogRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl BlogRepository for SqlxBlogRepository {
    async fn create(&self) -> Result<Blog> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => create_sqlite(require_sqlite(&self.pool)?).await,
            DatabaseDriver::Mysql => create_mysql(require_mysql(&self.pool)?).await,
        }
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Blog>> {
        const SQL: &str = "SELECT id, created_at FROM blogs WHERE id = ?";
        let blog = match self.pool.driver() {
            DatabaseDriver::Sqlite => sqlx::query(SQL)
                .bind(id)
                .fetch_optional(require_sqlite(&self.pool)?)
                .await
                .context("Failed to get blog")?
                .map(|r| Blog { id: r.get("id"), created_at: r.get("created_at") }),
            DatabaseDriver::Mysql => sqlx::query(SQL)
                .bind(id)
                .fetch_optional(require_mysql(&self.pool)?)
                .await
                .context("Failed to get blog")?
                .map(|r| Blog { id: r.get("id"), created_at: r.get("created_at") }),
        };
        Ok(blog)
    }

    async fn first(&self) -> Result<Option<Blog>> {
        const SQL: &str = "SELECT id, created_at FROM blogs ORDER BY id ASC LIMIT 1";
        let blog = match self.pool.driver() {
            DatabaseDriver::Sqlite => sqlx::query(SQL)
                .fetch_optional(require_sqlite(&self.pool)?)
                .await
                .context("Failed to get first blog")?
                .map(|r| Blog { id: r.get("id"), created_at: r.get("created_at") }),
            DatabaseDriver::Mysql => sqlx::query(SQL)
                .fetch_optional(require_mysql(&self.pool)?)
                .await
                .context("Failed to get first blog")?
                .map(|r| Blog { id: r.get("id"), created_at: r.get("created_at") }),
        };
        Ok(blog)
    }
}

async fn create_sqlite(pool: &SqlitePool) -> Result<Blog> {
    let now = Utc::now();
    let result = sqlx::query("INSERT INTO blogs (created_at) VALUES (?)")
        .bind(now)
        .execute(pool)
        .await
        .context("Failed to create blog")?;
    Ok(Blog { id: result.last_insert_rowid(), created_at: now })
}

async fn create_mysql(pool: &MySqlPool) -> Result<Blog> {
    let now = Utc::now();
    let result = sqlx::query("INSERT INTO blogs (created_at) VALUES (?)")
        .bind(now)
        .execute(pool)
        .await
        .context("Failed to create blog")?;
    Ok(Blog { id: result.last_insert_id() as i64, created_at: now })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_test_pool, migrations};

    async fn setup_repo() -> SqlxBlogRepository {
        let pool = create_test_pool().await.unwrap();
        migrations::run_migrations(&pool).await.unwrap();
        SqlxBlogRepository::new(pool)
    }

    #[tokio::test]
    async fn test_first_returns_lowest_id() {
        let repo = setup_repo().await;
        assert!(repo.first().await.unwrap().is_none());

        let a = repo.create().await.unwrap();
        repo.create().await.unwrap();

        let first = repo.first().await.unwrap().unwrap();
        assert_eq!(first.id, a.id);
        assert_eq!(repo.get_by_id(a.id).await.unwrap().map(|b| b.id), Some(a.id));
        assert!(repo.get_by_id(999).await.unwrap().is_none());
    }
}
