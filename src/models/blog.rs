//! Blog model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The container every post belongs to. A deployment runs a single site blog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Blog {
    pub id: i64,
    pub created_at: DateTime<Utc>,
}
