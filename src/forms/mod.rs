//! Submitted-data validation for the management views
//!
//! `PostForm` holds raw form fields exactly as posted (urlencoded strings).
//! `clean` turns them into typed values or field-level errors; the slug is
//! not a form field, it is derived from the title when the post is saved.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::models::validation::{check_max_length, INVALID_CHOICE_MESSAGE, REQUIRED_MESSAGE};
use crate::models::{Blog, Post, PostState, Section, User, ValidationError, TITLE_MAX_LENGTH};
use crate::services::{PostService, PostServiceError};

/// Raw post form data
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PostForm {
    pub section: String,
    pub title: String,
    pub teaser: String,
    pub content: String,
    pub description: String,
    pub state: String,
}

/// Form data after successful validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanedPost {
    pub section_id: i64,
    pub title: String,
    pub teaser: String,
    pub content: String,
    pub description: String,
    pub state: PostState,
}

impl PostForm {
    /// Form pre-filled from an existing post, for the update view.
    pub fn from_post(post: &Post) -> Self {
        Self {
            section: post.section_id.to_string(),
            title: post.title.clone(),
            teaser: post.teaser.clone(),
            content: post.content.clone(),
            description: post.description.clone(),
            state: post.state.value().to_string(),
        }
    }

    /// Validate against the sections currently offered to authors.
    pub fn clean(&self, sections: &[Section]) -> Result<CleanedPost, ValidationError> {
        let mut errors = ValidationError::new();

        let section_id = match self.section.trim() {
            "" => {
                errors.add("section", REQUIRED_MESSAGE);
                None
            }
            raw => {
                let id = raw
                    .parse::<i64>()
                    .ok()
                    .filter(|id| sections.iter().any(|s| s.id == *id && s.enabled));
                if id.is_none() {
                    errors.add("section", INVALID_CHOICE_MESSAGE);
                }
                id
            }
        };

        let title = required(&mut errors, "title", &self.title);
        check_max_length(&mut errors, "title", &title, TITLE_MAX_LENGTH);
        let teaser = required(&mut errors, "teaser", &self.teaser);
        let content = required(&mut errors, "content", &self.content);

        let state = match self.state.trim() {
            "" => {
                errors.add("state", REQUIRED_MESSAGE);
                None
            }
            raw => {
                let state = raw.parse::<i32>().ok().and_then(PostState::from_value);
                if state.is_none() {
                    errors.add("state", INVALID_CHOICE_MESSAGE);
                }
                state
            }
        };

        match (section_id, state) {
            (Some(section_id), Some(state)) if errors.is_empty() => Ok(CleanedPost {
                section_id,
                title,
                teaser,
                content,
                description: self.description.trim().to_string(),
                state,
            }),
            _ => Err(errors),
        }
    }

    /// Create a post from this form. The blog and author are never taken
    /// from submitted data.
    pub async fn save(
        &self,
        sections: &[Section],
        service: &PostService,
        blog: &Blog,
        author: &User,
    ) -> Result<Post, PostServiceError> {
        let cleaned = self.clean(sections)?;
        let mut post = Post::new(blog.id, cleaned.section_id, author.id, "");
        cleaned.apply_to(&mut post);
        service.save(post).await
    }

    /// Apply this form to an existing post and save it.
    pub async fn save_into(
        &self,
        sections: &[Section],
        service: &PostService,
        mut post: Post,
    ) -> Result<Post, PostServiceError> {
        let cleaned = self.clean(sections)?;
        cleaned.apply_to(&mut post);
        service.save(post).await
    }

    /// Template-style description of the form: values, choices and errors.
    pub fn context(&self, sections: &[Section], errors: Option<&ValidationError>) -> Value {
        let section_choices: Vec<Value> = sections
            .iter()
            .filter(|s| s.enabled)
            .map(|s| json!({ "value": s.id, "label": s.name }))
            .collect();
        let state_choices: Vec<Value> = PostState::CHOICES
            .iter()
            .map(|(state, label)| json!({ "value": state.value(), "label": label }))
            .collect();

        json!({
            "data": self,
            "errors": errors.cloned().unwrap_or_default(),
            "fields": ["section", "title", "teaser", "content", "description", "state"],
            "choices": {
                "section": section_choices,
                "state": state_choices,
            },
        })
    }
}

impl CleanedPost {
    /// Copy the cleaned values onto `post`, clearing the slug so it is
    /// re-derived from the title.
    pub fn apply_to(self, post: &mut Post) {
        post.section_id = self.section_id;
        post.title = self.title;
        post.teaser = self.teaser;
        post.content = self.content;
        post.description = self.description;
        post.state = self.state;
        post.slug.clear();
    }
}

fn required(errors: &mut ValidationError, field: &str, value: &str) -> String {
    let value = value.trim();
    if value.is_empty() {
        errors.add(field, REQUIRED_MESSAGE);
    }
    value.to_string()
}
