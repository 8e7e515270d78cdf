//! Section repository

use crate::config::DatabaseDriver;
use crate::db::{require_mysql, require_sqlite, DynDatabasePool};
use crate::models::{CreateSectionInput, Section};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{MySqlPool, Row, SqlitePool};
use std::sync::Arc;

#[async_trait]
pub trait SectionRepository: Send + Sync {
    async fn create(&self, input: &CreateSectionInput) -> Result<Section>;
    async fn get_by_id(&self, id: i64) -> Result<Option<Section>>;
    async fn get_by_slug(&self, slug: &str) -> Result<Option<Section>>;
    /// Sections ordered by name; `enabled_only` drops disabled ones
    async fn list(&self, enabled_only: bool) -> Result<Vec<Section>>;
    async fn exists_by_slug(&self, slug: &str) -> Result<bool>;
}

pub struct SqlxSectionRepository {
    pool: DynDatabasePool,
}

impl SqlxSectionRepository {
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn SectionRepository> {
        Arc::new(Self::new(pool))
    }
}

const SELECT_SECTION: &str = "SELECT id, name, slug, enabled, created_at FROM sections";

#[async_trait]
impl SectionRepository for SqlxSectionRepository {
    async fn create(&self, input: &CreateSectionInput) -> Result<Section> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => create_sqlite(require_sqlite(&self.pool)?, input).await,
            DatabaseDriver::Mysql => create_mysql(require_mysql(&self.pool)?, input).await,
        }
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Section>> {
        let sql = format!("{} WHERE id = ?", SELECT_SECTION);
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                let row = sqlx::query(&sql)
                    .bind(id)
                    .fetch_optional(require_sqlite(&self.pool)?)
                    .await
                    .context("Failed to get section")?;
                Ok(row.map(|r| row_to_section_sqlite(&r)))
            }
            DatabaseDriver::Mysql => {
                let row = sqlx::query(&sql)
                    .bind(id)
                    .fetch_optional(require_mysql(&self.pool)?)
                    .await
                    .context("Failed to get section")?;
                Ok(row.map(|r| row_to_section_mysql(&r)))
            }
        }
    }

    async fn get_by_slug(&self, slug: &str) -> Result<Option<Section>> {
        let sql = format!("{} WHERE slug = ?", SELECT_SECTION);
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                let row = sqlx::query(&sql)
                    .bind(slug)
                    .fetch_optional(require_sqlite(&self.pool)?)
                    .await
                    .context("Failed to get section by slug")?;
                Ok(row.map(|r| row_to_section_sqlite(&r)))
            }
            DatabaseDriver::Mysql => {
                let row = sqlx::query(&sql)
                    .bind(slug)
                    .fetch_optional(require_mysql(&self.pool)?)
                    .await
                    .context("Failed to get section by slug")?;
                Ok(row.map(|r| row_to_section_mysql(&r)))
            }
        }
    }

    async fn list(&self, enabled_only: bool) -> Result<Vec<Section>> {
        let sql = if enabled_only {
            format!("{} WHERE enabled = TRUE ORDER BY name ASC, id ASC", SELECT_SECTION)
        } else {
            format!("{} ORDER BY name ASC, id ASC", SELECT_SECTION)
        };
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                let rows = sqlx::query(&sql)
                    .fetch_all(require_sqlite(&self.pool)?)
                    .await
                    .context("Failed to list sections")?;
                Ok(rows.iter().map(row_to_section_sqlite).collect())
            }
            DatabaseDriver::Mysql => {
                let rows = sqlx::query(&sql)
                    .fetch_all(require_mysql(&self.pool)?)
                    .await
                    .context("Failed to list sections")?;
                Ok(rows.iter().map(row_to_section_mysql).collect())
            }
        }
    }

    async fn exists_by_slug(&self, slug: &str) -> Result<bool> {
        Ok(self.get_by_slug(slug).await?.is_some())
    }
}

async fn create_sqlite(pool: &SqlitePool, input: &CreateSectionInput) -> Result<Section> {
    let now = Utc::now();
    let result = sqlx::query(
        "INSERT INTO sections (name, slug, enabled, created_at) VALUES (?, ?, ?, ?)",
    )
    .bind(&input.name)
    .bind(&input.slug)
    .bind(input.enabled)
    .bind(now)
    .execute(pool)
    .await
    .context("Failed to create section")?;

    Ok(Section {
        id: result.last_insert_rowid(),
        name: input.name.clone(),
        slug: input.slug.clone(),
        enabled: input.enabled,
        created_at: now,
    })
}

fn row_to_section_sqlite(row: &sqlx::sqlite::SqliteRow) -> Section {
    Section {
        id: row.get("id"),
        name: row.get("name"),
        slug: row.get("slug"),
        enabled: row.get("enabled"),
        created_at: row.get("created_at"),
    }
}

async fn create_mysql(pool: &MySqlPool, input: &CreateSectionInput) -> Result<Section> {
    let now = Utc::now();
    let result = sqlx::query(
        "INSERT INTO sections (name, slug, enabled, created_at) VALUES (?, ?, ?, ?)",
    )
    .bind(&input.name)
    .bind(&input.slug)
    .bind(input.enabled)
    .bind(now)
    .execute(pool)
    .await
    .context("Failed to create section")?;

    Ok(Section {
        id: result.last_insert_id() as i64,
        name: input.name.clone(),
        slug: input.slug.clone(),
        enabled: input.enabled,
        created_at: now,
    })
}

fn row_to_section_mysql(row: &sqlx::mysql::MySqlRow) -> Section {
    Section {
        id: row.get("id"),
        name: row.get("name"),
        slug: row.get("slug"),
        enabled: row.get("enabled"),
        created_at: row.get("created_at"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_test_pool, migrations};

    async fn setup_repo() -> SqlxSectionRepository {
        let pool = create_test_pool().await.unwrap();
        migrations::run_migrations(&pool).await.unwrap();
        SqlxSectionRepository::new(pool)
    }

    #[tokio::test]
    async fn test_create_and_lookup() {
        let repo = setup_repo().await;
        let apples = repo.create(&CreateSectionInput::new("Apples", "apples")).await.unwrap();

        assert!(apples.id > 0);
        assert!(apples.enabled);
        let found = repo.get_by_slug("apples").await.unwrap().unwrap();
        assert_eq!(found.id, apples.id);
        assert_eq!(found.name, "Apples");
        assert_eq!(
            repo.get_by_id(apples.id).await.unwrap().map(|s| s.slug),
            Some("apples".to_string())
        );
        assert!(repo.get_by_slug("bananas").await.unwrap().is_none());
        assert!(repo.exists_by_slug("apples").await.unwrap());
    }

    #[tokio::test]
    async fn test_duplicate_slug_fails() {
        let repo = setup_repo().await;
        repo.create(&CreateSectionInput::new("Apples", "apples")).await.unwrap();
        assert!(repo.create(&CreateSectionInput::new("Again", "apples")).await.is_err());
    }

    #[tokio::test]
    async fn test_list_enabled_only() {
        let repo = setup_repo().await;
        repo.create(&CreateSectionInput::new("Oranges", "oranges")).await.unwrap();
        repo.create(&CreateSectionInput::new("Apples", "apples")).await.unwrap();
        let mut hidden = CreateSectionInput::new("Hidden", "hidden");
        hidden.enabled = false;
        repo.create(&hidden).await.unwrap();

        let all: Vec<String> = repo.list(false).await.unwrap().into_iter().map(|s| s.slug).collect();
        assert_eq!(all, vec!["apples", "hidden", "oranges"]);

        let enabled: Vec<String> = repo.list(true).await.unwrap().into_iter().map(|s| s.slug).collect();
        assert_eq!(enabled, vec!["apples", "oranges"]);
    }
}
