//! Post repository
//!
//! This module provides:
//! - `PostRepository` trait defining the interface for post data access
//! - `SqlxPostRepository` implementing the trait for SQLite and MySQL
//! - `PostFilter` describing the listing queries the views need
//!
//! Updates and their revision snapshot are written in one transaction.

use crate::config::DatabaseDriver;
use crate::db::{require_mysql, require_sqlite, DynDatabasePool};
use crate::models::{Markup, Post, PostState, Revision};
use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{MySqlPool, Row, SqlitePool};
use std::sync::Arc;

/// Sort order for post listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PostOrder {
    /// Newest publication first
    #[default]
    Published,
    /// Most recently edited first
    Updated,
}

impl PostOrder {
    fn sql(self) -> &'static str {
        match self {
            PostOrder::Published => "published DESC, id DESC",
            PostOrder::Updated => "updated DESC, id DESC",
        }
    }
}

/// Which posts a listing includes
#[derive(Debug, Clone, Default)]
pub struct PostFilter {
    pub published_only: bool,
    pub section_id: Option<i64>,
    pub author_id: Option<i64>,
    /// Case-insensitive substring of the title
    pub title_contains: Option<String>,
    pub order: PostOrder,
}

impl PostFilter {
    /// Published posts, optionally restricted to one section
    pub fn published(section_id: Option<i64>) -> Self {
        Self {
            published_only: true,
            section_id,
            ..Self::default()
        }
    }

    /// Posts shown on the management list
    pub fn managed_by(author_id: Option<i64>) -> Self {
        Self {
            author_id,
            order: PostOrder::Updated,
            ..Self::default()
        }
    }

    fn search_pattern(&self) -> Option<String> {
        self.title_contains
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(|q| format!("%{}%", escape_like(&q.to_lowercase())))
    }

    /// WHERE clause; placeholders are bound in the order section, author, search.
    fn where_clause(&self) -> String {
        let mut conditions = Vec::new();
        if self.published_only {
            conditions.push(format!("state = {}", PostState::published().value()));
        }
        if self.section_id.is_some() {
            conditions.push("section_id = ?".to_string());
        }
        if self.author_id.is_some() {
            conditions.push("author_id = ?".to_string());
        }
        if self.search_pattern().is_some() {
            conditions.push("LOWER(title) LIKE ? ESCAPE '!'".to_string());
        }
        if conditions.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", conditions.join(" AND "))
        }
    }
}

/// Escape LIKE wildcards with `!` so user input matches literally.
fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '%' | '_' | '!') {
            escaped.push('!');
        }
        escaped.push(c);
    }
    escaped
}

#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn create(&self, post: &Post) -> Result<Post>;

    async fn get_by_id(&self, id: i64) -> Result<Option<Post>>;

    async fn get_by_secret_key(&self, secret_key: &str) -> Result<Option<Post>>;

    /// Published posts carrying `slug`, newest first
    async fn list_published_by_slug(&self, slug: &str) -> Result<Vec<Post>>;

    async fn list(&self, filter: &PostFilter, offset: i64, limit: i64) -> Result<Vec<Post>>;

    async fn count(&self, filter: &PostFilter) -> Result<i64>;

    /// Write the post and its revision snapshot atomically
    async fn update_with_revision(&self, post: &Post, revision: &Revision) -> Result<Post>;

    /// Returns whether a row was removed
    async fn delete(&self, id: i64) -> Result<bool>;

    async fn increment_view_count(&self, id: i64) -> Result<()>;
}

pub struct SqlxPostRepository {
    pool: DynDatabasePool,
}

impl SqlxPostRepository {
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn PostRepository> {
        Arc::new(Self::new(pool))
    }
}

const POST_COLUMNS: &str = "id, blog_id, section_id, title, slug, author_id, markup, teaser, \
    teaser_html, content, content_html, description, state, secret_key, view_count, created, \
    updated, published";

const INSERT_POST: &str = r#"
    INSERT INTO posts (blog_id, section_id, title, slug, author_id, markup, teaser, teaser_html,
                       content, content_html, description, state, secret_key, view_count,
                       created, updated, published)
    VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
"#;

const UPDATE_POST: &str = r#"
    UPDATE posts SET blog_id = ?, section_id = ?, title = ?, slug = ?, author_id = ?, markup = ?,
                     teaser = ?, teaser_html = ?, content = ?, content_html = ?, description = ?,
                     state = ?, secret_key = ?, view_count = ?, created = ?, updated = ?,
                     published = ?
    WHERE id = ?
"#;

const INSERT_REVISION: &str = r#"
    INSERT INTO revisions (post_id, title, teaser, content, author_id, updated, published, view_count)
    VALUES (?, ?, ?, ?, ?, ?, ?, ?)
"#;

/// Bind every writable post column in `INSERT_POST` / `UPDATE_POST` order.
macro_rules! bind_post {
    ($query:expr, $post:expr) => {
        $query
            .bind($post.blog_id)
            .bind($post.section_id)
            .bind(&$post.title)
            .bind(&$post.slug)
            .bind($post.author_id)
            .bind($post.markup.as_str())
            .bind(&$post.teaser)
            .bind(&$post.teaser_html)
            .bind(&$post.content)
            .bind(&$post.content_html)
            .bind(&$post.description)
            .bind($post.state.value())
            .bind(&$post.secret_key)
            .bind($post.view_count)
            .bind($post.created)
            .bind($post.updated)
            .bind($post.published)
    };
}

macro_rules! bind_revision {
    ($query:expr, $rev:expr) => {
        $query
            .bind($rev.post_id)
            .bind(&$rev.title)
            .bind(&$rev.teaser)
            .bind(&$rev.content)
            .bind($rev.author_id)
            .bind($rev.updated)
            .bind($rev.published)
            .bind($rev.view_count)
    };
}

macro_rules! bind_filter {
    ($query:expr, $filter:expr) => {{
        let mut query = $query;
        if let Some(section_id) = $filter.section_id {
            query = query.bind(section_id);
        }
        if let Some(author_id) = $filter.author_id {
            query = query.bind(author_id);
        }
        if let Some(pattern) = $filter.search_pattern() {
            query = query.bind(pattern);
        }
        query
    }};
}

/// Map a row to `Post`; unknown markup or state values are errors.
macro_rules! row_to_post {
    ($row:expr) => {{
        let markup: String = $row.get("markup");
        let state: i32 = $row.get("state");
        markup
            .parse::<Markup>()
            .map_err(|e| anyhow::anyhow!(e))
            .and_then(|markup| {
                let state = PostState::from_value(state)
                    .ok_or_else(|| anyhow::anyhow!("Invalid post state: {}", state))?;
                Ok(Post {
                    id: $row.get("id"),
                    blog_id: $row.get("blog_id"),
                    section_id: $row.get("section_id"),
                    title: $row.get("title"),
                    slug: $row.get("slug"),
                    author_id: $row.get("author_id"),
                    markup,
                    teaser: $row.get("teaser"),
                    teaser_html: $row.get("teaser_html"),
                    content: $row.get("content"),
                    content_html: $row.get("content_html"),
                    description: $row.get("description"),
                    state,
                    secret_key: $row.get("secret_key"),
                    view_count: $row.get("view_count"),
                    created: $row.get("created"),
                    updated: $row.get("updated"),
                    published: $row.get("published"),
                })
            })
    }};
}

#[async_trait]
impl PostRepository for SqlxPostRepository {
    async fn create(&self, post: &Post) -> Result<Post> {
        let id = match self.pool.driver() {
            DatabaseDriver::Sqlite => bind_post!(sqlx::query(INSERT_POST), post)
                .execute(require_sqlite(&self.pool)?)
                .await
                .context("Failed to create post")?
                .last_insert_rowid(),
            DatabaseDriver::Mysql => bind_post!(sqlx::query(INSERT_POST), post)
                .execute(require_mysql(&self.pool)?)
                .await
                .context("Failed to create post")?
                .last_insert_id() as i64,
        };
        Ok(Post { id, ..post.clone() })
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Post>> {
        let sql = format!("SELECT {} FROM posts WHERE id = ?", POST_COLUMNS);
        let post = match self.pool.driver() {
            DatabaseDriver::Sqlite => sqlx::query(&sql)
                .bind(id)
                .fetch_optional(require_sqlite(&self.pool)?)
                .await
                .context("Failed to get post")?
                .map(|row| row_to_post!(row))
                .transpose()?,
            DatabaseDriver::Mysql => sqlx::query(&sql)
                .bind(id)
                .fetch_optional(require_mysql(&self.pool)?)
                .await
                .context("Failed to get post")?
                .map(|row| row_to_post!(row))
                .transpose()?,
        };
        Ok(post)
    }

    async fn get_by_secret_key(&self, secret_key: &str) -> Result<Option<Post>> {
        let sql = format!("SELECT {} FROM posts WHERE secret_key = ?", POST_COLUMNS);
        let post = match self.pool.driver() {
            DatabaseDriver::Sqlite => sqlx::query(&sql)
                .bind(secret_key)
                .fetch_optional(require_sqlite(&self.pool)?)
                .await
                .context("Failed to get post by secret key")?
                .map(|row| row_to_post!(row))
                .transpose()?,
            DatabaseDriver::Mysql => sqlx::query(&sql)
                .bind(secret_key)
                .fetch_optional(require_mysql(&self.pool)?)
                .await
                .context("Failed to get post by secret key")?
                .map(|row| row_to_post!(row))
                .transpose()?,
        };
        Ok(post)
    }

    async fn list_published_by_slug(&self, slug: &str) -> Result<Vec<Post>> {
        let sql = format!(
            "SELECT {} FROM posts WHERE slug = ? AND state = {} ORDER BY {}",
            POST_COLUMNS,
            PostState::published().value(),
            PostOrder::Published.sql()
        );
        let posts = match self.pool.driver() {
            DatabaseDriver::Sqlite => sqlx::query(&sql)
                .bind(slug)
                .fetch_all(require_sqlite(&self.pool)?)
                .await
                .context("Failed to list posts by slug")?
                .iter()
                .map(|row| row_to_post!(row))
                .collect::<Result<Vec<_>>>()?,
            DatabaseDriver::Mysql => sqlx::query(&sql)
                .bind(slug)
                .fetch_all(require_mysql(&self.pool)?)
                .await
                .context("Failed to list posts by slug")?
                .iter()
                .map(|row| row_to_post!(row))
                .collect::<Result<Vec<_>>>()?,
        };
        Ok(posts)
    }

    async fn list(&self, filter: &PostFilter, offset: i64, limit: i64) -> Result<Vec<Post>> {
        let sql = format!(
            "SELECT {} FROM posts{} ORDER BY {} LIMIT ? OFFSET ?",
            POST_COLUMNS,
            filter.where_clause(),
            filter.order.sql()
        );
        let posts = match self.pool.driver() {
            DatabaseDriver::Sqlite => bind_filter!(sqlx::query(&sql), filter)
                .bind(limit)
                .bind(offset)
                .fetch_all(require_sqlite(&self.pool)?)
                .await
                .context("Failed to list posts")?
                .iter()
                .map(|row| row_to_post!(row))
                .collect::<Result<Vec<_>>>()?,
            DatabaseDriver::Mysql => bind_filter!(sqlx::query(&sql), filter)
                .bind(limit)
                .bind(offset)
                .fetch_all(require_mysql(&self.pool)?)
                .await
                .context("Failed to list posts")?
                .iter()
                .map(|row| row_to_post!(row))
                .collect::<Result<Vec<_>>>()?,
        };
        Ok(posts)
    }

    async fn count(&self, filter: &PostFilter) -> Result<i64> {
        let sql = format!("SELECT COUNT(*) as count FROM posts{}", filter.where_clause());
        let count = match self.pool.driver() {
            DatabaseDriver::Sqlite => bind_filter!(sqlx::query(&sql), filter)
                .fetch_one(require_sqlite(&self.pool)?)
                .await
                .context("Failed to count posts")?
                .get("count"),
            DatabaseDriver::Mysql => bind_filter!(sqlx::query(&sql), filter)
                .fetch_one(require_mysql(&self.pool)?)
                .await
                .context("Failed to count posts")?
                .get("count"),
        };
        Ok(count)
    }

    async fn update_with_revision(&self, post: &Post, revision: &Revision) -> Result<Post> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                update_with_revision_sqlite(require_sqlite(&self.pool)?, post, revision).await?
            }
            DatabaseDriver::Mysql => {
                update_with_revision_mysql(require_mysql(&self.pool)?, post, revision).await?
            }
        }
        self.get_by_id(post.id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Post not found after update"))
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        const SQL: &str = "DELETE FROM posts WHERE id = ?";
        let affected = match self.pool.driver() {
            DatabaseDriver::Sqlite => sqlx::query(SQL)
                .bind(id)
                .execute(require_sqlite(&self.pool)?)
                .await
                .context("Failed to delete post")?
                .rows_affected(),
            DatabaseDriver::Mysql => sqlx::query(SQL)
                .bind(id)
                .execute(require_mysql(&self.pool)?)
                .await
                .context("Failed to delete post")?
                .rows_affected(),
        };
        Ok(affected > 0)
    }

    async fn increment_view_count(&self, id: i64) -> Result<()> {
        const SQL: &str = "UPDATE posts SET view_count = view_count + 1 WHERE id = ?";
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                sqlx::query(SQL)
                    .bind(id)
                    .execute(require_sqlite(&self.pool)?)
                    .await
                    .context("Failed to increment view count")?;
            }
            DatabaseDriver::Mysql => {
                sqlx::query(SQL)
                    .bind(id)
                    .execute(require_mysql(&self.pool)?)
                    .await
                    .context("Failed to increment view count")?;
            }
        }
        Ok(())
    }
}

async fn update_with_revision_sqlite(
    pool: &SqlitePool,
    post: &Post,
    revision: &Revision,
) -> Result<()> {
    let mut tx = pool.begin().await?;
    bind_post!(sqlx::query(UPDATE_POST), post)
        .bind(post.id)
        .execute(&mut *tx)
        .await
        .context("Failed to update post")?;
    bind_revision!(sqlx::query(INSERT_REVISION), revision)
        .execute(&mut *tx)
        .await
        .context("Failed to record revision")?;
    tx.commit().await?;
    Ok(())
}

async fn update_with_revision_mysql(
    pool: &MySqlPool,
    post: &Post,
    revision: &Revision,
) -> Result<()> {
    let mut tx = pool.begin().await?;
    bind_post!(sqlx::query(UPDATE_POST), post)
        .bind(post.id)
        .execute(&mut *tx)
        .await
        .context("Failed to update post")?;
    bind_revision!(sqlx::query(INSERT_REVISION), revision)
        .execute(&mut *tx)
        .await
        .context("Failed to record revision")?;
    tx.commit().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::{RevisionRepository, SqlxRevisionRepository};
    use crate::db::{create_test_pool, migrations};
    use chrono::{Duration, Utc};

    struct Fixture {
        pool: DynDatabasePool,
        repo: SqlxPostRepository,
    }

    async fn setup() -> Fixture {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool).await.unwrap();
        let sqlite = require_sqlite(&pool).unwrap();
        for sql in [
            "INSERT INTO users (id, username, password_hash) VALUES (1, 'patrick', 'x')",
            "INSERT INTO users (id, username, password_hash) VALUES (2, 'jani', 'x')",
            "INSERT INTO blogs (id) VALUES (1)",
            "INSERT INTO sections (id, name, slug) VALUES (1, 'Apples', 'apples')",
            "INSERT INTO sections (id, name, slug) VALUES (2, 'Oranges', 'oranges')",
        ] {
            sqlx::query(sql).execute(sqlite).await.unwrap();
        }
        Fixture {
            repo: SqlxPostRepository::new(pool.clone()),
            pool,
        }
    }

    fn post(section_id: i64, author_id: i64, title: &str, key: &str, published: bool) -> Post {
        let mut post = Post::new(1, section_id, author_id, title);
        post.slug = title.to_lowercase().replace(' ', "-");
        post.secret_key = key.to_string();
        if published {
            post.state = PostState::Published;
            post.published = Some(Utc::now());
        }
        post
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let fx = setup().await;
        let created = fx.repo.create(&post(1, 1, "Apple of My Eye", "aaaaaaaa", true)).await.unwrap();
        assert!(created.id > 0);

        let found = fx.repo.get_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(found.title, "Apple of My Eye");
        assert_eq!(found.slug, "apple-of-my-eye");
        assert_eq!(found.state, PostState::Published);
        assert_eq!(found.markup, Markup::Markdown);
        assert!(found.published.is_some());

        let by_key = fx.repo.get_by_secret_key("aaaaaaaa").await.unwrap().unwrap();
        assert_eq!(by_key.id, created.id);
        assert!(fx.repo.get_by_secret_key("zzzzzzzz").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_secret_key_rejected() {
        let fx = setup().await;
        fx.repo.create(&post(1, 1, "One", "samekey1", false)).await.unwrap();
        assert!(fx.repo.create(&post(1, 1, "Two", "samekey1", false)).await.is_err());
    }

    #[tokio::test]
    async fn test_published_filter_and_section_isolation() {
        let fx = setup().await;
        let apple = fx.repo.create(&post(1, 1, "Apple", "key00001", true)).await.unwrap();
        let orange = fx.repo.create(&post(2, 1, "Orange", "key00002", true)).await.unwrap();
        fx.repo.create(&post(2, 1, "Draft Orange", "key00003", false)).await.unwrap();

        let all = PostFilter::published(None);
        let ids: Vec<i64> = fx.repo.list(&all, 0, 10).await.unwrap().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![orange.id, apple.id]);
        assert_eq!(fx.repo.count(&all).await.unwrap(), 2);

        let oranges = PostFilter::published(Some(2));
        let ids: Vec<i64> = fx.repo.list(&oranges, 0, 10).await.unwrap().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![orange.id]);
        assert_eq!(fx.repo.count(&oranges).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_title_search_is_case_insensitive() {
        let fx = setup().await;
        fx.repo.create(&post(1, 1, "Apple of My Eye", "key00001", true)).await.unwrap();
        fx.repo.create(&post(2, 1, "Orange You Wonderful", "key00002", true)).await.unwrap();

        let filter = PostFilter {
            title_contains: Some("  APPLE ".to_string()),
            ..PostFilter::published(None)
        };
        let titles: Vec<String> = fx.repo.list(&filter, 0, 10).await.unwrap().into_iter().map(|p| p.title).collect();
        assert_eq!(titles, vec!["Apple of My Eye"]);
    }

    #[tokio::test]
    async fn test_title_search_matches_wildcards_literally() {
        let fx = setup().await;
        fx.repo.create(&post(1, 1, "Apple of My Eye", "key00001", true)).await.unwrap();
        fx.repo.create(&post(2, 1, "100% Orange_Juice!", "key00002", true)).await.unwrap();

        for (query, expected) in [("_", 1), ("%", 1), ("!", 1), ("0%", 1), ("e_j", 1), ("a%e", 0)] {
            let filter = PostFilter {
                title_contains: Some(query.to_string()),
                ..PostFilter::published(None)
            };
            assert_eq!(fx.repo.count(&filter).await.unwrap(), expected, "query {:?}", query);
        }
    }

    #[tokio::test]
    async fn test_corrupt_row_is_an_error() {
        let fx = setup().await;
        let created = fx.repo.create(&post(1, 1, "Apple", "key00001", true)).await.unwrap();
        let sqlite = require_sqlite(&fx.pool).unwrap();

        sqlx::query("UPDATE posts SET state = 9 WHERE id = ?")
            .bind(created.id)
            .execute(sqlite)
            .await
            .unwrap();
        let err = fx.repo.get_by_id(created.id).await.unwrap_err();
        assert!(err.to_string().contains("Invalid post state: 9"));

        sqlx::query("UPDATE posts SET state = 2, markup = 'textile' WHERE id = ?")
            .bind(created.id)
            .execute(sqlite)
            .await
            .unwrap();
        assert!(fx.repo.get_by_id(created.id).await.is_err());
        assert!(fx.repo.list(&PostFilter::published(None), 0, 10).await.is_err());
    }

    #[tokio::test]
    async fn test_manage_filter_by_author_and_pagination() {
        let fx = setup().await;
        for i in 0..3 {
            fx.repo.create(&post(1, 1, &format!("Mine {}", i), &format!("mine000{}", i), false)).await.unwrap();
        }
        fx.repo.create(&post(1, 2, "Theirs", "theirs01", true)).await.unwrap();

        let mine = PostFilter::managed_by(Some(1));
        assert_eq!(fx.repo.count(&mine).await.unwrap(), 3);
        assert_eq!(fx.repo.list(&mine, 0, 2).await.unwrap().len(), 2);
        assert_eq!(fx.repo.list(&mine, 2, 2).await.unwrap().len(), 1);

        let everyone = PostFilter::managed_by(None);
        assert_eq!(fx.repo.count(&everyone).await.unwrap(), 4);
    }

    #[tokio::test]
    async fn test_list_published_by_slug() {
        let fx = setup().await;
        let mut older = post(1, 1, "Same Title", "key00001", true);
        older.published = Some(Utc::now() - Duration::days(3));
        fx.repo.create(&older).await.unwrap();
        fx.repo.create(&post(2, 1, "Same Title", "key00002", true)).await.unwrap();
        fx.repo.create(&post(2, 1, "Same Title", "key00003", false)).await.unwrap();

        let found = fx.repo.list_published_by_slug("same-title").await.unwrap();
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].secret_key, "key00002");
    }

    #[tokio::test]
    async fn test_update_records_revision() {
        let fx = setup().await;
        let mut created = fx.repo.create(&post(1, 1, "Before", "key00001", false)).await.unwrap();
        let revision = Revision::snapshot(&created);

        created.title = "After".to_string();
        created.section_id = 2;
        let updated = fx.repo.update_with_revision(&created, &revision).await.unwrap();
        assert_eq!(updated.title, "After");
        assert_eq!(updated.section_id, 2);

        let revisions = SqlxRevisionRepository::new(fx.pool.clone());
        let history = revisions.list_by_post(created.id).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].title, "Before");
        assert_eq!(revisions.count_by_post(created.id).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_delete_and_view_count() {
        let fx = setup().await;
        let created = fx.repo.create(&post(1, 1, "Counted", "key00001", true)).await.unwrap();

        fx.repo.increment_view_count(created.id).await.unwrap();
        fx.repo.increment_view_count(created.id).await.unwrap();
        assert_eq!(fx.repo.get_by_id(created.id).await.unwrap().unwrap().view_count, 2);

        assert!(fx.repo.delete(created.id).await.unwrap());
        assert!(!fx.repo.delete(created.id).await.unwrap());
        assert!(fx.repo.get_by_id(created.id).await.unwrap().is_none());
    }

    #[test]
    fn test_where_clause_placeholders() {
        let filter = PostFilter {
            published_only: true,
            section_id: Some(1),
            author_id: Some(2),
            title_contains: Some("x".into()),
            order: PostOrder::Published,
        };
        assert_eq!(
            filter.where_clause(),
            " WHERE state = 2 AND section_id = ? AND author_id = ? AND LOWER(title) LIKE ? ESCAPE '!'"
        );
        assert_eq!(PostFilter::default().where_clause(), "");
        assert_eq!(
            PostFilter { title_contains: Some("   ".into()), ..Default::default() }.where_clause(),
            ""
        );
    }
}
