//! Shared API response types
//!
//! Views return the data a template would be rendered with. These types
//! keep the shape of that data consistent across views.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::urls::{post_secret_url, post_url};
use crate::models::{PagedResult, Post, PostState};

/// A post as shown to readers and authors
#[derive(Debug, Serialize)]
pub struct PostResponse {
    pub id: i64,
    pub section_id: i64,
    pub author_id: i64,
    pub title: String,
    pub slug: String,
    pub teaser_html: String,
    pub content_html: String,
    pub description: String,
    pub state: PostState,
    pub state_label: &'static str,
    pub view_count: i64,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
    pub published: Option<DateTime<Utc>>,
    /// Public URL, set once the post has been published
    pub url: Option<String>,
    /// Only exposed to those who may manage the post
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret_url: Option<String>,
}

impl PostResponse {
    pub fn public(post: &Post) -> Self {
        Self {
            id: post.id,
            section_id: post.section_id,
            author_id: post.author_id,
            title: post.title.clone(),
            slug: post.slug.clone(),
            teaser_html: post.teaser_html.clone(),
            content_html: post.content_html.clone(),
            description: post.description.clone(),
            state: post.state,
            state_label: post.state.label(),
            view_count: post.view_count,
            created: post.created,
            updated: post.updated,
            published: post.published,
            url: post_url(post),
            secret_url: None,
        }
    }

    pub fn managed(post: &Post) -> Self {
        Self {
            secret_url: post_secret_url(post),
            ..Self::public(post)
        }
    }
}

#[derive(Debug, Serialize)]
pub struct Paginator {
    pub page: u32,
    pub per_page: u32,
    pub total: i64,
    pub total_pages: u32,
    pub has_next: bool,
    pub has_prev: bool,
}

impl<T> From<&PagedResult<T>> for Paginator {
    fn from(result: &PagedResult<T>) -> Self {
        Self {
            page: result.page,
            per_page: result.per_page,
            total: result.total,
            total_pages: result.total_pages(),
            has_next: result.has_next(),
            has_prev: result.has_prev(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_hides_secret() {
        let mut post = Post::new(1, 1, 1, "Apple");
        post.secret_key = "abcd1234".into();

        let public = serde_json::to_value(PostResponse::public(&post)).unwrap();
        assert!(public.get("secret_url").is_none());
        assert!(!public.to_string().contains("abcd1234"));

        let managed = serde_json::to_value(PostResponse::managed(&post)).unwrap();
        assert_eq!(managed["secret_url"], "/post/secret/abcd1234");
        assert_eq!(managed["state_label"], "Draft");
    }
}
