//! Revision model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Post;

/// Snapshot of a post taken each time an existing post is saved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Revision {
    pub id: i64,
    pub post_id: i64,
    pub title: String,
    pub teaser: String,
    pub content: String,
    pub author_id: i64,
    pub updated: DateTime<Utc>,
    pub published: Option<DateTime<Utc>>,
    pub view_count: i64,
}

impl Revision {
    /// Capture the current state of a saved post.
    pub fn snapshot(post: &Post) -> Self {
        Self {
            id: 0,
            post_id: post.id,
            title: post.title.clone(),
            teaser: post.teaser.clone(),
            content: post.content.clone(),
            author_id: post.author_id,
            updated: post.updated,
            published: post.published,
            view_count: 0,
        }
    }
}
