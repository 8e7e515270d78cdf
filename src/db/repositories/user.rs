//! User repository
//!
//! - `UserRepository` trait defining the interface for account data access
//! - `SqlxUserRepository` implementing the trait for SQLite and MySQL

use crate::config::DatabaseDriver;
use crate::db::{require_mysql, require_sqlite, DynDatabasePool};
use crate::models::User;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{MySqlPool, Row, SqlitePool};
use std::sync::Arc;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: &User) -> Result<User>;

    async fn get_by_id(&self, id: i64) -> Result<Option<User>>;

    async fn get_by_username(&self, username: &str) -> Result<Option<User>>;

    /// Persist `password_hash`, `is_staff` and `is_active`
    async fn update(&self, user: &User) -> Result<User>;

    async fn count(&self) -> Result<i64>;
}

pub struct SqlxUserRepository {
    pool: DynDatabasePool,
}

impl SqlxUserRepository {
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn UserRepository> {
        Arc::new(Self::new(pool))
    }
}

const SELECT_USER: &str =
    "SELECT id, username, password_hash, is_staff, is_active, created_at, updated_at FROM users";

#[async_trait]
impl UserRepository for SqlxUserRepository {
    async fn create(&self, user: &User) -> Result<User> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => create_user_sqlite(require_sqlite(&self.pool)?, user).await,
            DatabaseDriver::Mysql => create_user_mysql(require_mysql(&self.pool)?, user).await,
        }
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<User>> {
        let sql = format!("{} WHERE id = ?", SELECT_USER);
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                let row = sqlx::query(&sql)
                    .bind(id)
                    .fetch_optional(require_sqlite(&self.pool)?)
                    .await
                    .context("Failed to get user by id")?;
                Ok(row.map(|r| row_to_user_sqlite(&r)))
            }
            DatabaseDriver::Mysql => {
                let row = sqlx::query(&sql)
                    .bind(id)
                    .fetch_optional(require_mysql(&self.pool)?)
                    .await
                    .context("Failed to get user by id")?;
                Ok(row.map(|r| row_to_user_mysql(&r)))
            }
        }
    }

    async fn get_by_username(&self, username: &str) -> Result<Option<User>> {
        let sql = format!("{} WHERE username = ?", SELECT_USER);
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                let row = sqlx::query(&sql)
                    .bind(username)
                    .fetch_optional(require_sqlite(&self.pool)?)
                    .await
                    .context("Failed to get user by username")?;
                Ok(row.map(|r| row_to_user_sqlite(&r)))
            }
            DatabaseDriver::Mysql => {
                let row = sqlx::query(&sql)
                    .bind(username)
                    .fetch_optional(require_mysql(&self.pool)?)
                    .await
                    .context("Failed to get user by username")?;
                Ok(row.map(|r| row_to_user_mysql(&r)))
            }
        }
    }

    async fn update(&self, user: &User) -> Result<User> {
        const SQL: &str = "UPDATE users SET password_hash = ?, is_staff = ?, is_active = ?, updated_at = ? WHERE id = ?";
        let now = Utc::now();
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                sqlx::query(SQL)
                    .bind(&user.password_hash)
                    .bind(user.is_staff)
                    .bind(user.is_active)
                    .bind(now)
                    .bind(user.id)
                    .execute(require_sqlite(&self.pool)?)
                    .await
                    .context("Failed to update user")?;
            }
            DatabaseDriver::Mysql => {
                sqlx::query(SQL)
                    .bind(&user.password_hash)
                    .bind(user.is_staff)
                    .bind(user.is_active)
                    .bind(now)
                    .bind(user.id)
                    .execute(require_mysql(&self.pool)?)
                    .await
                    .context("Failed to update user")?;
            }
        }
        self.get_by_id(user.id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("User not found after update"))
    }

    async fn count(&self) -> Result<i64> {
        const SQL: &str = "SELECT COUNT(*) as count FROM users";
        let row_count = match self.pool.driver() {
            DatabaseDriver::Sqlite => sqlx::query(SQL)
                .fetch_one(require_sqlite(&self.pool)?)
                .await?
                .get("count"),
            DatabaseDriver::Mysql => sqlx::query(SQL)
                .fetch_one(require_mysql(&self.pool)?)
                .await?
                .get("count"),
        };
        Ok(row_count)
    }
}

// ============================================================================
// SQLite implementations
// ============================================================================

async fn create_user_sqlite(pool: &SqlitePool, user: &User) -> Result<User> {
    let now = Utc::now();
    let result = sqlx::query(
        r#"
        INSERT INTO users (username, password_hash, is_staff, is_active, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&user.username)
    .bind(&user.password_hash)
    .bind(user.is_staff)
    .bind(user.is_active)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await
    .context("Failed to create user")?;

    Ok(User {
        id: result.last_insert_rowid(),
        created_at: now,
        updated_at: now,
        ..user.clone()
    })
}

fn row_to_user_sqlite(row: &sqlx::sqlite::SqliteRow) -> User {
    User {
        id: row.get("id"),
        username: row.get("username"),
        password_hash: row.get("password_hash"),
        is_staff: row.get("is_staff"),
        is_active: row.get("is_active"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

// ============================================================================
// MySQL implementations
// ============================================================================

async fn create_user_mysql(pool: &MySqlPool, user: &User) -> Result<User> {
    let now = Utc::now();
    let result = sqlx::query(
        r#"
        INSERT INTO users (username, password_hash, is_staff, is_active, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&user.username)
    .bind(&user.password_hash)
    .bind(user.is_staff)
    .bind(user.is_active)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await
    .context("Failed to create user")?;

    Ok(User {
        id: result.last_insert_id() as i64,
        created_at: now,
        updated_at: now,
        ..user.clone()
    })
}

fn row_to_user_mysql(row: &sqlx::mysql::MySqlRow) -> User {
    User {
        id: row.get("id"),
        username: row.get("username"),
        password_hash: row.get("password_hash"),
        is_staff: row.get("is_staff"),
        is_active: row.get("is_active"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_test_pool, migrations};

    async fn setup_test_repo() -> SqlxUserRepository {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");
        SqlxUserRepository::new(pool)
    }

    #[tokio::test]
    async fn test_create_and_get_user() {
        let repo = setup_test_repo().await;
        let created = repo.create(&User::new("patrick", "hash123")).await.unwrap();

        assert!(created.id > 0);
        let by_name = repo.get_by_username("patrick").await.unwrap().unwrap();
        assert_eq!(by_name.id, created.id);
        assert_eq!(by_name.password_hash, "hash123");
        assert!(!by_name.is_staff);
        assert!(by_name.is_active);

        assert!(repo.get_by_id(created.id).await.unwrap().is_some());
        assert!(repo.get_by_username("nobody").await.unwrap().is_none());
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_username_fails() {
        let repo = setup_test_repo().await;
        repo.create(&User::new("jani", "a")).await.unwrap();
        assert!(repo.create(&User::new("jani", "b")).await.is_err());
    }

    #[tokio::test]
    async fn test_update_staff_flag() {
        let repo = setup_test_repo().await;
        let mut user = repo.create(&User::new("jani", "hash")).await.unwrap();

        user.is_staff = true;
        let updated = repo.update(&user).await.unwrap();
        assert!(updated.is_staff);
        assert!(repo.get_by_id(user.id).await.unwrap().unwrap().is_staff);
    }
}
