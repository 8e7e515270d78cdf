//! Post model
//!
//! This module provides:
//! - `Post` entity, the unit authors write and readers browse
//! - `PostState`, an ordered choice list whose last entry is the published state
//! - `Markup`, the formats teaser and content can be written in
//! - Pagination types for list queries

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::validation::{
    check_max_length, ValidationError, BLANK_MESSAGE, INVALID_SLUG_MESSAGE, NULL_MESSAGE,
};

pub const TITLE_MAX_LENGTH: usize = 90;
pub const SLUG_MAX_LENGTH: usize = 90;
pub const SECRET_KEY_LENGTH: usize = 8;

/// Publication state of a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "i32", try_from = "i32")]
pub enum PostState {
    Draft = 1,
    Published = 2,
}

impl PostState {
    /// Ordered `(value, label)` choices offered to authors.
    pub const CHOICES: &'static [(PostState, &'static str)] = &[
        (PostState::Draft, "Draft"),
        (PostState::Published, "Published"),
    ];

    /// The last entry of [`PostState::CHOICES`].
    pub fn published() -> PostState {
        Self::CHOICES[Self::CHOICES.len() - 1].0
    }

    pub fn value(self) -> i32 {
        self as i32
    }

    pub fn label(self) -> &'static str {
        match self {
            PostState::Draft => "Draft",
            PostState::Published => "Published",
        }
    }

    pub fn from_value(value: i32) -> Option<PostState> {
        Self::CHOICES
            .iter()
            .map(|(state, _)| *state)
            .find(|state| state.value() == value)
    }
}

impl Default for PostState {
    fn default() -> Self {
        PostState::Draft
    }
}

impl From<PostState> for i32 {
    fn from(state: PostState) -> i32 {
        state.value()
    }
}

impl TryFrom<i32> for PostState {
    type Error = String;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        PostState::from_value(value).ok_or_else(|| format!("Invalid post state: {}", value))
    }
}

/// Markup language of teaser and content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Markup {
    #[default]
    Markdown,
}

impl Markup {
    pub const CHOICES: &'static [(Markup, &'static str)] = &[(Markup::Markdown, "Markdown")];

    pub fn as_str(self) -> &'static str {
        match self {
            Markup::Markdown => "markdown",
        }
    }
}

impl fmt::Display for Markup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Markup {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "markdown" => Ok(Markup::Markdown),
            _ => Err(format!("Invalid markup: {}", s)),
        }
    }
}

/// Post entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    /// Zero until the post is first saved
    pub id: i64,
    pub blog_id: i64,
    pub section_id: i64,
    pub title: String,
    /// Derived from the title on save when left empty
    pub slug: String,
    pub author_id: i64,
    pub markup: Markup,
    pub teaser: String,
    pub teaser_html: String,
    pub content: String,
    pub content_html: String,
    pub description: String,
    pub state: PostState,
    /// Eight-character key for previewing unpublished posts
    #[serde(skip_serializing_if = "String::is_empty")]
    pub secret_key: String,
    pub view_count: i64,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
    /// Set the first time the post is saved in the published state
    pub published: Option<DateTime<Utc>>,
}

impl Post {
    /// An unsaved draft with empty body fields.
    pub fn new(blog_id: i64, section_id: i64, author_id: i64, title: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            blog_id,
            section_id,
            title: title.into(),
            slug: String::new(),
            author_id,
            markup: Markup::default(),
            teaser: String::new(),
            teaser_html: String::new(),
            content: String::new(),
            content_html: String::new(),
            description: String::new(),
            state: PostState::default(),
            secret_key: String::new(),
            view_count: 0,
            created: now,
            updated: now,
            published: None,
        }
    }

    pub fn is_saved(&self) -> bool {
        self.id > 0
    }

    pub fn is_published(&self) -> bool {
        self.state == PostState::published()
    }

    /// Model-level validation run before every save.
    ///
    /// Checks the blog, section and author references, the title, and the
    /// slug's length and character set.
    /// Teaser and content may be blank here; the form layer requires them.
    pub fn full_clean(&self) -> Result<(), ValidationError> {
        let mut errors = ValidationError::new();

        for (field, id) in [
            ("blog", self.blog_id),
            ("section", self.section_id),
            ("author", self.author_id),
        ] {
            if id <= 0 {
                errors.add(field, NULL_MESSAGE);
            }
        }

        if self.title.trim().is_empty() {
            errors.add("title", BLANK_MESSAGE);
        }
        check_max_length(&mut errors, "title", &self.title, TITLE_MAX_LENGTH);

        check_max_length(&mut errors, "slug", &self.slug, SLUG_MAX_LENGTH);
        if !self.slug.is_empty() && !is_valid_slug(&self.slug) {
            errors.add("slug", INVALID_SLUG_MESSAGE);
        }

        errors.into_result()
    }
}

fn is_valid_slug(slug: &str) -> bool {
    slug.chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Pagination parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListParams {
    /// 1-indexed
    pub page: u32,
    pub per_page: u32,
}

impl Default for ListParams {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: 10,
        }
    }
}

impl ListParams {
    pub fn new(page: u32, per_page: u32) -> Self {
        Self {
            page: page.max(1),
            per_page: per_page.clamp(1, 100),
        }
    }

    pub fn offset(&self) -> i64 {
        (self.page.saturating_sub(1) as i64) * self.per_page as i64
    }

    pub fn limit(&self) -> i64 {
        self.per_page as i64
    }
}

/// Paginated result container
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PagedResult<T> {
    pub items: Vec<T>,
    /// Total number of items across all pages
    pub total: i64,
    pub page: u32,
    pub per_page: u32,
}

impl<T> PagedResult<T> {
    pub fn new(items: Vec<T>, total: i64, params: &ListParams) -> Self {
        Self {
            items,
            total,
            page: params.page,
            per_page: params.per_page,
        }
    }

    pub fn total_pages(&self) -> u32 {
        if self.per_page == 0 {
            return 0;
        }
        let total = self.total.max(0) as u64;
        total.div_ceil(self.per_page as u64) as u32
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages()
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PagedResult<U> {
        PagedResult {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            per_page: self.per_page,
        }
    }
}
