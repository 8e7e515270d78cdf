//! Common API utilities and shared types

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use crate::models::ListParams;

/// `302 Found` to `url`.
pub fn found(url: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, url.to_string())]).into_response()
}

/// Default page number (1-indexed)
pub fn default_page() -> u32 {
    1
}

/// `?page=` and `?q=` on the listing views
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default)]
    pub q: Option<String>,
}

impl ListQuery {
    pub fn params(&self, per_page: u32) -> ListParams {
        ListParams::new(self.page, per_page)
    }

    /// The search term, if one was given.
    pub fn search(&self) -> Option<&str> {
        self.q.as_deref().map(str::trim).filter(|q| !q.is_empty())
    }
}
