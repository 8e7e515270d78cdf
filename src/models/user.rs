//! User model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An account that can log in and write posts.
///
/// Staff members may manage every post; everyone else manages only their own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    /// Argon2 PHC string
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub is_staff: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Note: the password must already be hashed, see `services::password::hash_password`.
    pub fn new(username: impl Into<String>, password_hash: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            username: username.into(),
            password_hash: password_hash.into(),
            is_staff: false,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }
}
