//! Post management views
//!
//! List and create require login (anonymous requests are redirected to the
//! login page). Update and delete answer 404 unless the current user may
//! manage the post, so their existence is never revealed.

use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
    Form, Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use super::common::{found, ListQuery};
use super::context::ResolverMatch;
use super::middleware::{ApiError, AppState, CurrentUser, LoginRequired};
use super::responses::{Paginator, PostResponse};
use super::urls::Route;
use crate::forms::PostForm;
use crate::models::{Markup, Post, User, ValidationError};
use crate::services::{can_manage, manage_scope, PostServiceError};

/// Posts the current user may manage, most recently updated first
pub async fn manage_post_list(
    State(state): State<AppState>,
    resolver: ResolverMatch,
    LoginRequired(user): LoginRequired,
    Query(query): Query<ListQuery>,
) -> Result<Json<Value>, ApiError> {
    let result = state
        .post_service
        .list_managed(
            manage_scope(&user),
            &query.params(state.config.manage_posts_per_page),
        )
        .await?;

    Ok(Json(json!({
        "scoper_lookup": resolver.scoped().scoper_lookup,
        "paginator": Paginator::from(&result),
        "post_list": result.items.iter().map(PostResponse::managed).collect::<Vec<_>>(),
    })))
}

async fn form_context(
    state: &AppState,
    resolver: ResolverMatch,
    form: &PostForm,
    errors: Option<&ValidationError>,
    post: Option<&Post>,
) -> Result<Json<Value>, ApiError> {
    let sections = state.section_service.list_enabled().await?;
    Ok(Json(json!({
        "scoper_lookup": resolver.scoped().scoper_lookup,
        "form": form.context(&sections, errors),
        "post": post.map(PostResponse::managed),
        "imageset_new_upload": state.config.image_upload_url,
    })))
}

pub async fn manage_post_create_form(
    State(state): State<AppState>,
    resolver: ResolverMatch,
    LoginRequired(_user): LoginRequired,
) -> Result<Json<Value>, ApiError> {
    form_context(&state, resolver, &PostForm::default(), None, None).await
}

pub async fn manage_post_create(
    State(state): State<AppState>,
    resolver: ResolverMatch,
    LoginRequired(user): LoginRequired,
    Form(form): Form<PostForm>,
) -> Result<Response, ApiError> {
    let sections = state.section_service.list_enabled().await?;
    match form
        .save(&sections, &state.post_service, &state.site_blog, &user)
        .await
    {
        Ok(_) => Ok(found(Route::ManagePostList.path())),
        Err(PostServiceError::Validation(errors)) => {
            Ok(form_context(&state, resolver, &form, Some(&errors), None)
                .await?
                .into_response())
        }
        Err(e) => Err(e.into()),
    }
}

/// Load the post at `post_pk` if `user` may manage it; 404 otherwise.
async fn managed_post(
    state: &AppState,
    user: Option<&User>,
    post_pk: &str,
) -> Result<Post, ApiError> {
    let not_found = || ApiError::not_found("Post not found");

    let user = user.ok_or_else(not_found)?;
    let id: i64 = post_pk.parse().map_err(|_| not_found())?;
    let post = state
        .post_service
        .get_by_id(id)
        .await?
        .ok_or_else(not_found)?;

    if !can_manage(user, &post) {
        return Err(not_found());
    }
    Ok(post)
}

pub async fn manage_post_update_form(
    State(state): State<AppState>,
    resolver: ResolverMatch,
    CurrentUser(user): CurrentUser,
    Path(post_pk): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let post = managed_post(&state, user.as_ref(), &post_pk).await?;
    let revisions = state.post_service.revisions(post.id).await?;

    let Json(mut context) =
        form_context(&state, resolver, &PostForm::from_post(&post), None, Some(&post)).await?;
    context["revisions"] = json!(revisions
        .iter()
        .map(|r| json!({ "title": r.title, "author_id": r.author_id, "updated": r.updated }))
        .collect::<Vec<_>>());
    Ok(Json(context))
}

pub async fn manage_post_update(
    State(state): State<AppState>,
    resolver: ResolverMatch,
    CurrentUser(user): CurrentUser,
    Path(post_pk): Path<String>,
    Form(form): Form<PostForm>,
) -> Result<Response, ApiError> {
    let post = managed_post(&state, user.as_ref(), &post_pk).await?;
    let sections = state.section_service.list_enabled().await?;

    match form
        .save_into(&sections, &state.post_service, post.clone())
        .await
    {
        Ok(_) => Ok(found(Route::ManagePostList.path())),
        Err(PostServiceError::Validation(errors)) => {
            Ok(form_context(&state, resolver, &form, Some(&errors), Some(&post))
                .await?
                .into_response())
        }
        Err(e) => Err(e.into()),
    }
}

/// Delete confirmation
pub async fn manage_post_delete_confirm(
    State(state): State<AppState>,
    resolver: ResolverMatch,
    CurrentUser(user): CurrentUser,
    Path(post_pk): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let post = managed_post(&state, user.as_ref(), &post_pk).await?;
    Ok(Json(json!({
        "scoper_lookup": resolver.scoped().scoper_lookup,
        "post": PostResponse::managed(&post),
    })))
}

pub async fn manage_post_delete(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(post_pk): Path<String>,
) -> Result<Response, ApiError> {
    let post = managed_post(&state, user.as_ref(), &post_pk).await?;
    state.post_service.delete(post.id).await?;
    Ok(found(Route::ManagePostList.path()))
}

#[derive(Debug, Deserialize)]
pub struct PreviewForm {
    #[serde(default)]
    pub markup: Option<String>,
    #[serde(default)]
    pub content: String,
}

/// Render submitted markup to HTML
pub async fn ajax_preview(
    State(state): State<AppState>,
    LoginRequired(_user): LoginRequired,
    Form(form): Form<PreviewForm>,
) -> Result<Json<Value>, ApiError> {
    let markup = match form.markup.as_deref().map(str::trim) {
        None | Some("") => Markup::default(),
        Some(raw) => raw
            .parse::<Markup>()
            .map_err(ApiError::validation_error)?,
    };

    Ok(Json(json!({
        "html": state.post_service.preview(markup, &form.content),
    })))
}
