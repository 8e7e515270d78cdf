//! Site blog bootstrap

use crate::db::repositories::BlogRepository;
use crate::models::Blog;
use anyhow::{Context, Result};
use std::sync::Arc;

pub struct BlogService {
    repo: Arc<dyn BlogRepository>,
}

impl BlogService {
    pub fn new(repo: Arc<dyn BlogRepository>) -> Self {
        Self { repo }
    }

    /// The blog every post on this site belongs to, created on first start.
    pub async fn ensure_site_blog(&self) -> Result<Blog> {
        if let Some(blog) = self.repo.first().await.context("Failed to load site blog")? {
            return Ok(blog);
        }
        let blog = self.repo.create().await.context("Failed to create site blog")?;
        tracing::info!(blog_id = blog.id, "Created site blog");
        Ok(blog)
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Option<Blog>> {
        self.repo.get_by_id(id).await.context("Failed to get blog")
    }
}
