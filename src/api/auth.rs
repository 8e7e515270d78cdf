//! Authentication views
//!
//! - GET  /account/login  - login form description
//! - POST /account/login  - verify credentials, set the session cookie
//! - POST /account/logout - end the session

use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, HeaderValue},
    response::{IntoResponse, Response},
    Form, Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use super::common::found;
use super::context::ResolverMatch;
use super::middleware::{extract_session_token, ApiError, AppState, SESSION_COOKIE};
use super::urls::Route;
use crate::models::ValidationError;
use crate::services::UserServiceError;

const INVALID_LOGIN_MESSAGE: &str =
    "Please enter a correct username and password. Note that both fields may be case-sensitive.";

#[derive(Debug, Deserialize)]
pub struct NextQuery {
    #[serde(default)]
    pub next: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    pub next: Option<String>,
}

/// Only same-site absolute paths are followed after login.
fn safe_next(next: Option<&str>) -> &str {
    match next {
        Some(path) if is_local_path(path) => path,
        _ => Route::ManagePostList.path(),
    }
}

/// A path on this site that browsers cannot reinterpret as another host.
fn is_local_path(path: &str) -> bool {
    path.starts_with('/')
        && !path.starts_with("//")
        && !path.contains('\\')
        && !path.chars().any(char::is_control)
}

fn session_cookie(token: &str, max_age_secs: i64) -> Result<HeaderValue, ApiError> {
    HeaderValue::from_str(&format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        SESSION_COOKIE, token, max_age_secs
    ))
    .map_err(|e| ApiError::internal_error(format!("Invalid cookie value: {}", e)))
}

pub async fn login_form(
    resolver: ResolverMatch,
    Query(query): Query<NextQuery>,
) -> Json<Value> {
    Json(json!({
        "scoper_lookup": resolver.scoped().scoper_lookup,
        "fields": ["username", "password"],
        "next": safe_next(query.next.as_deref()),
    }))
}

pub async fn login(
    State(state): State<AppState>,
    resolver: ResolverMatch,
    Form(form): Form<LoginForm>,
) -> Result<Response, ApiError> {
    let next = safe_next(form.next.as_deref()).to_string();

    match state.user_service.login(&form.username, &form.password).await {
        Ok(session) => {
            let max_age = (session.expires_at - session.created_at).num_seconds();
            let mut response = found(&next);
            response
                .headers_mut()
                .insert(header::SET_COOKIE, session_cookie(&session.id, max_age)?);
            Ok(response)
        }
        Err(UserServiceError::AuthenticationError(_)) => {
            let errors = ValidationError::single("__all__", INVALID_LOGIN_MESSAGE);
            Ok(Json(json!({
                "scoper_lookup": resolver.scoped().scoper_lookup,
                "fields": ["username", "password"],
                "data": { "username": form.username },
                "errors": errors,
                "next": next,
            }))
            .into_response())
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Result<Response, ApiError> {
    if let Some(token) = extract_session_token(&headers) {
        state.user_service.logout(&token).await?;
    }

    let mut response = found(Route::Blog.path());
    response
        .headers_mut()
        .insert(header::SET_COOKIE, session_cookie("", 0)?);
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_next() {
        assert_eq!(safe_next(Some("/manage/posts/create")), "/manage/posts/create");
        assert_eq!(safe_next(Some("//evil.example")), "/manage/posts");
        assert_eq!(safe_next(Some("https://evil.example")), "/manage/posts");
        assert_eq!(safe_next(None), "/manage/posts");
    }

    #[test]
    fn test_safe_next_rejects_backslash_and_control_chars() {
        assert_eq!(safe_next(Some("/\\evil.example")), "/manage/posts");
        assert_eq!(safe_next(Some("/manage\\..\\evil")), "/manage/posts");
        assert_eq!(safe_next(Some("/\t/evil.example")), "/manage/posts");
        assert_eq!(safe_next(Some("/section/a\nb")), "/manage/posts");
        assert_eq!(safe_next(Some("/section/apples?page=2")), "/section/apples?page=2");
    }

    #[test]
    fn test_session_cookie_attributes() {
        let cookie = session_cookie("abc", 60).unwrap();
        assert_eq!(
            cookie.to_str().unwrap(),
            "session=abc; Path=/; HttpOnly; SameSite=Lax; Max-Age=60"
        );
    }
}
