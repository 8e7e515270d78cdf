//! Section model
//!
//! Sections are the administrator-defined topics that partition a blog.
//! Only enabled sections are offered to authors.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::validation::{check_max_length, ValidationError, REQUIRED_MESSAGE};

pub const SECTION_NAME_MAX_LENGTH: usize = 150;
pub const SECTION_SLUG_MAX_LENGTH: usize = 150;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub enabled: bool,
    pub created_at: DateTime<Utc>,
}

/// Input for creating a section
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSectionInput {
    pub name: String,
    pub slug: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

impl CreateSectionInput {
    pub fn new(name: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            slug: slug.into(),
            enabled: true,
        }
    }

    pub fn full_clean(&self) -> Result<(), ValidationError> {
        let mut errors = ValidationError::new();
        if self.name.trim().is_empty() {
            errors.add("name", REQUIRED_MESSAGE);
        }
        if self.slug.trim().is_empty() {
            errors.add("slug", REQUIRED_MESSAGE);
        }
        check_max_length(&mut errors, "name", &self.name, SECTION_NAME_MAX_LENGTH);
        check_max_length(&mut errors, "slug", &self.slug, SECTION_SLUG_MAX_LENGTH);
        errors.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_input_validation() {
        assert!(CreateSectionInput::new("Apples", "apples").full_clean().is_ok());

        let err = CreateSectionInput::new("", "x".repeat(151))
            .full_clean()
            .unwrap_err();
        assert_eq!(err.field("name"), [REQUIRED_MESSAGE]);
        assert_eq!(
            err.field("slug"),
            ["Ensure this value has at most 150 characters (it has 151)."]
        );
    }
}
