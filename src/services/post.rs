//! Post service
//!
//! Implements business logic for posts:
//! - Saving (validation, slug derivation, markup rendering, publication
//!   stamping, secret key generation, revision history)
//! - Public listings and lookups of published posts
//! - The author/staff management listing
//! - View counting

use crate::db::repositories::{PostFilter, PostRepository, RevisionRepository};
use crate::models::{
    ListParams, Markup, PagedResult, Post, Revision, ValidationError, SECRET_KEY_LENGTH,
};
use crate::services::markup::MarkupRenderer;
use crate::services::slug::slug_for_title;
use anyhow::Context;
use chrono::{NaiveDate, Utc};
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum PostServiceError {
    #[error("Post not found: {0}")]
    NotFound(i64),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

pub struct PostService {
    repo: Arc<dyn PostRepository>,
    revision_repo: Arc<dyn RevisionRepository>,
    renderer: MarkupRenderer,
}

impl PostService {
    pub fn new(
        repo: Arc<dyn PostRepository>,
        revision_repo: Arc<dyn RevisionRepository>,
        renderer: MarkupRenderer,
    ) -> Self {
        Self {
            repo,
            revision_repo,
            renderer,
        }
    }

    /// Validate and persist `post`, inserting it when unsaved and updating
    /// it (with a revision snapshot of the stored version) otherwise.
    pub async fn save(&self, mut post: Post) -> Result<Post, PostServiceError> {
        if post.slug.is_empty() {
            post.slug = slug_for_title(&post.title);
        }
        post.full_clean()?;

        post.teaser_html = self.renderer.render(post.markup, &post.teaser);
        post.content_html = self.renderer.render(post.markup, &post.content);

        let now = Utc::now();
        if post.is_published() && post.published.is_none() {
            post.published = Some(now);
        }

        if !post.is_saved() {
            if post.secret_key.is_empty() {
                post.secret_key = generate_secret_key();
            }
            post.created = now;
            post.updated = now;
            let created = self.repo.create(&post).await.context("Failed to create post")?;
            tracing::info!(post_id = created.id, slug = %created.slug, "Created post");
            return Ok(created);
        }

        let stored = self
            .repo
            .get_by_id(post.id)
            .await
            .context("Failed to load post")?
            .ok_or(PostServiceError::NotFound(post.id))?;

        // Columns owned by the store, not the editor
        post.created = stored.created;
        post.view_count = stored.view_count;
        if post.secret_key.is_empty() {
            post.secret_key = stored.secret_key.clone();
        }
        post.updated = now;

        let updated = self
            .repo
            .update_with_revision(&post, &Revision::snapshot(&stored))
            .await
            .context("Failed to update post")?;
        tracing::info!(post_id = updated.id, slug = %updated.slug, "Updated post");
        Ok(updated)
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Option<Post>, PostServiceError> {
        Ok(self.repo.get_by_id(id).await.context("Failed to get post")?)
    }

    /// Any post, whatever its state, by its preview key.
    pub async fn get_by_secret_key(&self, key: &str) -> Result<Option<Post>, PostServiceError> {
        Ok(self
            .repo
            .get_by_secret_key(key)
            .await
            .context("Failed to get post by secret key")?)
    }

    /// The published post with `slug` whose publication date (UTC) is the given day.
    pub async fn get_published_for_date(
        &self,
        year: i32,
        month: u32,
        day: u32,
        slug: &str,
    ) -> Result<Option<Post>, PostServiceError> {
        let Some(date) = NaiveDate::from_ymd_opt(year, month, day) else {
            return Ok(None);
        };
        let candidates = self
            .repo
            .list_published_by_slug(slug)
            .await
            .context("Failed to look up post")?;
        Ok(candidates
            .into_iter()
            .find(|post| post.published.map(|p| p.date_naive()) == Some(date)))
    }

    /// Count one view of `post`, updating the in-memory copy as well.
    pub async fn record_view(&self, post: &mut Post) -> Result<(), PostServiceError> {
        self.repo
            .increment_view_count(post.id)
            .await
            .context("Failed to record view")?;
        post.view_count += 1;
        Ok(())
    }

    /// Published posts, newest first, optionally limited to one section and
    /// to titles containing `query`.
    pub async fn list_published(
        &self,
        section_id: Option<i64>,
        query: Option<&str>,
        params: &ListParams,
    ) -> Result<PagedResult<Post>, PostServiceError> {
        let filter = PostFilter {
            title_contains: query.map(str::to_string),
            ..PostFilter::published(section_id)
        };
        self.list(&filter, params).await
    }

    /// Management listing. `author_scope` of `None` means every post.
    pub async fn list_managed(
        &self,
        author_scope: Option<i64>,
        params: &ListParams,
    ) -> Result<PagedResult<Post>, PostServiceError> {
        self.list(&PostFilter::managed_by(author_scope), params).await
    }

    async fn list(
        &self,
        filter: &PostFilter,
        params: &ListParams,
    ) -> Result<PagedResult<Post>, PostServiceError> {
        let posts = self
            .repo
            .list(filter, params.offset(), params.limit())
            .await
            .context("Failed to list posts")?;
        let total = self.repo.count(filter).await.context("Failed to count posts")?;
        Ok(PagedResult::new(posts, total, params))
    }

    /// Earlier versions of a post, newest first.
    pub async fn revisions(&self, post_id: i64) -> Result<Vec<Revision>, PostServiceError> {
        Ok(self
            .revision_repo
            .list_by_post(post_id)
            .await
            .context("Failed to list revisions")?)
    }

    pub async fn revision_count(&self, post_id: i64) -> Result<i64, PostServiceError> {
        Ok(self
            .revision_repo
            .count_by_post(post_id)
            .await
            .context("Failed to count revisions")?)
    }

    pub async fn delete(&self, id: i64) -> Result<(), PostServiceError> {
        if !self.repo.delete(id).await.context("Failed to delete post")? {
            return Err(PostServiceError::NotFound(id));
        }
        tracing::info!(post_id = id, "Deleted post");
        Ok(())
    }

    pub fn preview(&self, markup: Markup, text: &str) -> String {
        self.renderer.render(markup, text)
    }
}

fn generate_secret_key() -> String {
    Uuid::new_v4().simple().to_string()[..SECRET_KEY_LENGTH].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::{SqlxPostRepository, SqlxRevisionRepository};
    use crate::db::{create_test_pool, migrations, require_sqlite};
    use crate::models::{PostState, SLUG_MAX_LENGTH};
    use chrono::{Datelike, Duration};

    async fn setup() -> PostService {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool).await.unwrap();
        let sqlite = require_sqlite(&pool).unwrap();
        for sql in [
            "INSERT INTO users (id, username, password_hash) VALUES (1, 'patrick', 'x')",
            "INSERT INTO blogs (id) VALUES (1)",
            "INSERT INTO sections (id, name, slug) VALUES (1, 'Apples', 'apples')",
            "INSERT INTO sections (id, name, slug) VALUES (2, 'Oranges', 'oranges')",
        ] {
            sqlx::query(sql).execute(sqlite).await.unwrap();
        }
        PostService::new(
            SqlxPostRepository::boxed(pool.clone()),
            SqlxRevisionRepository::boxed(pool),
            MarkupRenderer::new(),
        )
    }

    fn draft(section_id: i64, title: &str) -> Post {
        let mut post = Post::new(1, section_id, 1, title);
        post.teaser = "*Teaser*".to_string();
        post.content = "Only his **dog** knows".to_string();
        post
    }

    fn published(section_id: i64, title: &str) -> Post {
        let mut post = draft(section_id, title);
        post.state = PostState::Published;
        post
    }

    #[tokio::test]
    async fn test_save_new_post_derives_fields() {
        let service = setup().await;
        let post = service
            .save(draft(1, "You'll never believe what happened next!"))
            .await
            .unwrap();

        assert!(post.is_saved());
        assert_eq!(post.slug, "youll-never-believe-what-happened-next");
        assert_eq!(post.secret_key.len(), SECRET_KEY_LENGTH);
        assert!(post.teaser_html.contains("<em>Teaser</em>"));
        assert!(post.content_html.contains("<strong>dog</strong>"));
        assert!(post.published.is_none());
    }

    #[tokio::test]
    async fn test_save_overlong_slug_fails() {
        let service = setup().await;
        let mut post = draft(1, "Fine title");
        post.slug = "s".repeat(SLUG_MAX_LENGTH + 1);

        match service.save(post).await {
            Err(PostServiceError::Validation(err)) => assert_eq!(
                err.field("slug"),
                ["Ensure this value has at most 90 characters (it has 91)."]
            ),
            other => panic!("expected validation error, got {:?}", other.map(|p| p.id)),
        }
    }

    #[tokio::test]
    async fn test_save_without_references_is_validation_error() {
        let service = setup().await;

        match service.save(Post::new(0, 0, 0, "Orphan")).await {
            Err(PostServiceError::Validation(err)) => {
                for field in ["blog", "section", "author"] {
                    assert_eq!(err.field(field), [crate::models::validation::NULL_MESSAGE]);
                }
            }
            other => panic!("expected validation error, got {:?}", other.map(|p| p.id)),
        }
    }

    #[tokio::test]
    async fn test_publish_stamps_once_and_records_revisions() {
        let service = setup().await;
        let mut post = service.save(draft(1, "Apple of My Eye")).await.unwrap();
        let key = post.secret_key.clone();

        post.state = PostState::Published;
        let post = service.save(post).await.unwrap();
        let stamped = post.published.expect("published timestamp");

        let mut edited = post.clone();
        edited.title = "Apple of My Other Eye".to_string();
        edited.slug.clear();
        let edited = service.save(edited).await.unwrap();

        assert_eq!(edited.published, Some(stamped));
        assert_eq!(edited.slug, "apple-of-my-other-eye");
        assert_eq!(edited.secret_key, key);
        assert_eq!(service.revision_count(edited.id).await.unwrap(), 2);
        let history = service.revisions(edited.id).await.unwrap();
        assert_eq!(history[0].title, "Apple of My Eye");
    }

    #[tokio::test]
    async fn test_save_missing_post_is_not_found() {
        let service = setup().await;
        let mut post = draft(1, "Ghost");
        post.id = 99;
        assert!(matches!(service.save(post).await, Err(PostServiceError::NotFound(99))));
    }

    #[tokio::test]
    async fn test_list_published_by_section() {
        let service = setup().await;
        service.save(published(1, "Apple")).await.unwrap();
        service.save(published(2, "Orange")).await.unwrap();
        service.save(draft(2, "Hidden Orange")).await.unwrap();

        let params = ListParams::new(1, 10);
        let all = service.list_published(None, None, &params).await.unwrap();
        assert_eq!(all.total, 2);

        let oranges = service.list_published(Some(2), None, &params).await.unwrap();
        let titles: Vec<&str> = oranges.items.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["Orange"]);

        let searched = service.list_published(None, Some("app"), &params).await.unwrap();
        assert_eq!(searched.total, 1);
    }

    #[tokio::test]
    async fn test_get_published_for_date_and_views() {
        let service = setup().await;
        let post = service.save(published(1, "Dated")).await.unwrap();
        let day = post.published.unwrap();

        let mut found = service
            .get_published_for_date(day.year(), day.month(), day.day(), "dated")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.id, post.id);

        service.record_view(&mut found).await.unwrap();
        assert_eq!(found.view_count, 1);
        assert_eq!(service.get_by_id(post.id).await.unwrap().unwrap().view_count, 1);

        let other = day - Duration::days(1);
        assert!(service
            .get_published_for_date(other.year(), other.month(), other.day(), "dated")
            .await
            .unwrap()
            .is_none());
        assert!(service
            .get_published_for_date(2020, 2, 30, "dated")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_secret_key_lookup_and_delete() {
        let service = setup().await;
        let post = service.save(draft(1, "Secret")).await.unwrap();

        let found = service.get_by_secret_key(&post.secret_key).await.unwrap().unwrap();
        assert_eq!(found.id, post.id);

        service.delete(post.id).await.unwrap();
        assert!(matches!(service.delete(post.id).await, Err(PostServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_list_managed_scope() {
        let service = setup().await;
        service.save(draft(1, "Mine")).await.unwrap();

        let params = ListParams::new(1, 50);
        assert_eq!(service.list_managed(Some(1), &params).await.unwrap().total, 1);
        assert_eq!(service.list_managed(Some(2), &params).await.unwrap().total, 0);
        assert_eq!(service.list_managed(None, &params).await.unwrap().total, 1);
    }
}
