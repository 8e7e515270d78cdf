//! API middleware
//!
//! Contains:
//! - Shared application state
//! - The JSON error type returned at the handler boundary
//! - Session loading (cookie or bearer token)
//! - `CurrentUser` / `LoginRequired` extractors

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::common::found;
use crate::config::BlogConfig;
use crate::db::repositories::{
    SqlxBlogRepository, SqlxPostRepository, SqlxRevisionRepository, SqlxSectionRepository,
    SqlxSessionRepository, SqlxUserRepository,
};
use crate::db::DynDatabasePool;
use crate::models::{Blog, User};
use crate::services::{
    BlogService, MarkupRenderer, PostService, PostServiceError, SectionService,
    SectionServiceError, UserService, UserServiceError,
};

pub const SESSION_COOKIE: &str = "session";

/// Application state containing shared services
#[derive(Clone)]
pub struct AppState {
    pub pool: DynDatabasePool,
    pub config: Arc<BlogConfig>,
    /// Loaded once at start-up; every post belongs to it
    pub site_blog: Arc<Blog>,
    pub user_service: Arc<UserService>,
    pub section_service: Arc<SectionService>,
    pub post_service: Arc<PostService>,
}

impl AppState {
    /// Wire repositories and services over a migrated pool, load (or create)
    /// the site blog and seed the configured sections.
    pub async fn build(pool: DynDatabasePool, config: BlogConfig) -> anyhow::Result<Self> {
        let user_service = Arc::new(UserService::with_session_days(
            SqlxUserRepository::boxed(pool.clone()),
            SqlxSessionRepository::boxed(pool.clone()),
            config.session_days,
        ));
        let section_service = Arc::new(SectionService::new(SqlxSectionRepository::boxed(
            pool.clone(),
        )));
        let post_service = Arc::new(PostService::new(
            SqlxPostRepository::boxed(pool.clone()),
            SqlxRevisionRepository::boxed(pool.clone()),
            MarkupRenderer::new(),
        ));

        let site_blog = BlogService::new(SqlxBlogRepository::boxed(pool.clone()))
            .ensure_site_blog()
            .await?;

        let seeded = section_service.seed(&config.sections).await?;
        if seeded > 0 {
            tracing::info!("Seeded {} section(s)", seeded);
        }

        Ok(Self {
            pool,
            config: Arc::new(config),
            site_blog: Arc::new(site_blog),
            user_service,
            section_service,
            post_service,
        })
    }
}

/// Authenticated user attached to the request by [`load_user`]
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub User);

/// Error response for API errors
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiErrorDetail {
    pub code: String,
    pub message: String,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: ApiErrorDetail {
                code: code.into(),
                message: message.into(),
            },
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new("NOT_FOUND", message)
    }

    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::new("INTERNAL_ERROR", message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.error.code.as_str() {
            "NOT_FOUND" => StatusCode::NOT_FOUND,
            "VALIDATION_ERROR" => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, Json(self)).into_response()
    }
}

impl From<PostServiceError> for ApiError {
    fn from(err: PostServiceError) -> Self {
        match err {
            PostServiceError::NotFound(_) => ApiError::not_found("Post not found"),
            PostServiceError::Validation(e) => ApiError::validation_error(e.to_string()),
            PostServiceError::InternalError(e) => {
                tracing::error!("Post service error: {:#}", e);
                ApiError::internal_error("Internal server error")
            }
        }
    }
}

impl From<SectionServiceError> for ApiError {
    fn from(err: SectionServiceError) -> Self {
        match err {
            SectionServiceError::Validation(e) => ApiError::validation_error(e.to_string()),
            SectionServiceError::DuplicateSlug(slug) => {
                ApiError::validation_error(format!("Section slug already exists: {}", slug))
            }
            SectionServiceError::InternalError(e) => {
                tracing::error!("Section service error: {:#}", e);
                ApiError::internal_error("Internal server error")
            }
        }
    }
}

impl From<UserServiceError> for ApiError {
    fn from(err: UserServiceError) -> Self {
        tracing::error!("User service error: {}", err);
        ApiError::internal_error("Internal server error")
    }
}

/// Extract session token from request
pub fn extract_session_token(headers: &axum::http::HeaderMap) -> Option<String> {
    if let Some(auth_header) = headers.get(header::AUTHORIZATION) {
        if let Ok(auth_str) = auth_header.to_str() {
            if let Some(token) = auth_str.strip_prefix("Bearer ") {
                return Some(token.to_string());
            }
        }
    }

    if let Some(cookie_header) = headers.get(header::COOKIE) {
        if let Ok(cookie_str) = cookie_header.to_str() {
            for cookie in cookie_str.split(';') {
                let cookie = cookie.trim();
                if let Some(token) = cookie.strip_prefix("session=") {
                    return Some(token.to_string());
                }
            }
        }
    }

    None
}

/// Attach the session's user, if any, to the request.
///
/// Never rejects: views decide for themselves what anonymous access means.
pub async fn load_user(State(state): State<AppState>, mut request: Request, next: Next) -> Response {
    if let Some(token) = extract_session_token(request.headers()) {
        match state.user_service.validate_session(&token).await {
            Ok(Some(user)) => {
                request.extensions_mut().insert(AuthenticatedUser(user));
            }
            Ok(None) => {}
            Err(e) => tracing::warn!("Session validation failed: {}", e),
        }
    }
    next.run(request).await
}

/// The logged-in user, or `None` for anonymous requests.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Option<User>);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(CurrentUser(
            parts
                .extensions
                .get::<AuthenticatedUser>()
                .map(|user| user.0.clone()),
        ))
    }
}

/// The logged-in user; anonymous requests are redirected to the login URL
/// with `?next=` set to the requested path.
#[derive(Debug, Clone)]
pub struct LoginRequired(pub User);

impl FromRequestParts<AppState> for LoginRequired {
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        match parts.extensions.get::<AuthenticatedUser>() {
            Some(user) => Ok(LoginRequired(user.0.clone())),
            None => {
                let next = parts
                    .uri
                    .path_and_query()
                    .map(|pq| pq.as_str())
                    .unwrap_or("/");
                Err(found(&login_redirect_url(&state.config.login_url, next)))
            }
        }
    }
}

pub fn login_redirect_url(login_url: &str, next: &str) -> String {
    let next = urlencoding::encode(next).replace("%2F", "/");
    let separator = if login_url.contains('?') { '&' } else { '?' };
    format!("{}{}next={}", login_url, separator, next)
}
