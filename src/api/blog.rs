//! Public blog views
//!
//! - `GET /`: published posts across all sections
//! - `GET /section/{section}`: published posts of one section
//! - `GET /post/{year}/{month}/{day}/{slug}`: a published post
//! - `GET /post/secret/{post_secret_key}`: preview of a post in any state

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde_json::{json, Value};

use super::common::ListQuery;
use super::context::ResolverMatch;
use super::middleware::{ApiError, AppState};
use super::responses::{Paginator, PostResponse};
use crate::models::{PagedResult, Post, Section};
use crate::services::is_publicly_visible;

async fn post_list_context(
    state: &AppState,
    resolver: ResolverMatch,
    current_section: Option<Section>,
    query: &ListQuery,
) -> Result<Json<Value>, ApiError> {
    let section_list = state.section_service.list_enabled().await?;
    let result: PagedResult<Post> = state
        .post_service
        .list_published(
            current_section.as_ref().map(|s| s.id),
            query.search(),
            &query.params(state.config.posts_per_page),
        )
        .await?;

    Ok(Json(json!({
        "scoper_lookup": resolver.scoped().scoper_lookup,
        "section_list": section_list,
        "current_section": current_section,
        "search_query": query.search(),
        "paginator": Paginator::from(&result),
        "post_list": result.items.iter().map(PostResponse::public).collect::<Vec<_>>(),
    })))
}

/// All published posts
pub async fn blog(
    State(state): State<AppState>,
    resolver: ResolverMatch,
    Query(query): Query<ListQuery>,
) -> Result<Json<Value>, ApiError> {
    post_list_context(&state, resolver, None, &query).await
}

/// Published posts of one section; unknown or disabled slug is a 404
pub async fn blog_section(
    State(state): State<AppState>,
    resolver: ResolverMatch,
    Path(section): Path<String>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Value>, ApiError> {
    let section = state
        .section_service
        .get_by_slug(&section)
        .await?
        .filter(|s| s.enabled)
        .ok_or_else(|| ApiError::not_found("Section not found"))?;

    post_list_context(&state, resolver, Some(section), &query).await
}

async fn post_detail_context(
    state: &AppState,
    resolver: ResolverMatch,
    post: &Post,
    response: PostResponse,
) -> Result<Json<Value>, ApiError> {
    let section_list = state.section_service.list_enabled().await?;
    let current_section = state.section_service.get_by_id(post.section_id).await?;

    Ok(Json(json!({
        "scoper_lookup": resolver.scoped().scoper_lookup,
        "section_list": section_list,
        "current_section": current_section,
        "post": response,
    })))
}

/// A published post by publication date and slug. Counts a view.
pub async fn blog_post(
    State(state): State<AppState>,
    resolver: ResolverMatch,
    Path((year, month, day, slug)): Path<(String, String, String, String)>,
) -> Result<Json<Value>, ApiError> {
    let not_found = || ApiError::not_found("Post not found");
    let (year, month, day) = match (year.parse::<i32>(), month.parse::<u32>(), day.parse::<u32>()) {
        (Ok(y), Ok(m), Ok(d)) => (y, m, d),
        _ => return Err(not_found()),
    };

    let mut post = state
        .post_service
        .get_published_for_date(year, month, day, &slug)
        .await?
        .filter(is_publicly_visible)
        .ok_or_else(not_found)?;
    state.post_service.record_view(&mut post).await?;

    post_detail_context(&state, resolver, &post, PostResponse::public(&post)).await
}

/// Any post by its secret key. Does not count a view.
pub async fn blog_post_secret(
    State(state): State<AppState>,
    resolver: ResolverMatch,
    Path(post_secret_key): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let post = state
        .post_service
        .get_by_secret_key(&post_secret_key)
        .await?
        .ok_or_else(|| ApiError::not_found("Post not found"))?;

    post_detail_context(&state, resolver, &post, PostResponse::public(&post)).await
}
