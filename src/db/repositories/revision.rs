//! Revision repository
//!
//! Revisions are written by the post repository as part of an update
//! transaction; this repository only reads them back.

use crate::config::DatabaseDriver;
use crate::db::{require_mysql, require_sqlite, DynDatabasePool};
use crate::models::Revision;
use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::Row;
use std::sync::Arc;

#[async_trait]
pub trait RevisionRepository: Send + Sync {
    /// Revisions of a post, newest first
    async fn list_by_post(&self, post_id: i64) -> Result<Vec<Revision>>;

    async fn count_by_post(&self, post_id: i64) -> Result<i64>;
}

pub struct SqlxRevisionRepository {
    pool: DynDatabasePool,
}

impl SqlxRevisionRepository {
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn RevisionRepository> {
        Arc::new(Self::new(pool))
    }
}

macro_rules! row_to_revision {
    ($row:expr) => {
        Revision {
            id: $row.get("id"),
            post_id: $row.get("post_id"),
            title: $row.get("title"),
            teaser: $row.get("teaser"),
            content: $row.get("content"),
            author_id: $row.get("author_id"),
            updated: $row.get("updated"),
            published: $row.get("published"),
            view_count: $row.get("view_count"),
        }
    };
}

#[async_trait]
impl RevisionRepository for SqlxRevisionRepository {
    async fn list_by_post(&self, post_id: i64) -> Result<Vec<Revision>> {
        const SQL: &str = r#"
            SELECT id, post_id, title, teaser, content, author_id, updated, published, view_count
            FROM revisions
            WHERE post_id = ?
            ORDER BY id DESC
        "#;
        let revisions = match self.pool.driver() {
            DatabaseDriver::Sqlite => sqlx::query(SQL)
                .bind(post_id)
                .fetch_all(require_sqlite(&self.pool)?)
                .await
                .context("Failed to list revisions")?
                .iter()
                .map(|row| row_to_revision!(row))
                .collect(),
            DatabaseDriver::Mysql => sqlx::query(SQL)
                .bind(post_id)
                .fetch_all(require_mysql(&self.pool)?)
                .await
                .context("Failed to list revisions")?
                .iter()
                .map(|row| row_to_revision!(row))
                .collect(),
        };
        Ok(revisions)
    }

    async fn count_by_post(&self, post_id: i64) -> Result<i64> {
        const SQL: &str = "SELECT COUNT(*) as count FROM revisions WHERE post_id = ?";
        let count = match self.pool.driver() {
            DatabaseDriver::Sqlite => sqlx::query(SQL)
                .bind(post_id)
                .fetch_one(require_sqlite(&self.pool)?)
                .await
                .context("Failed to count revisions")?
                .get("count"),
            DatabaseDriver::Mysql => sqlx::query(SQL)
                .bind(post_id)
                .fetch_one(require_mysql(&self.pool)?)
                .await
                .context("Failed to count revisions")?
                .get("count"),
        };
        Ok(count)
    }
}
