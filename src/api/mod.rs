//! API layer - HTTP handlers and routing
//!
//! Views return the context data a template would receive, as JSON.
//! Redirects, missing objects and form errors are expressed with status
//! codes (302, 404, 200 with errors).

pub mod auth;
pub mod blog;
pub mod common;
pub mod context;
pub mod manage;
pub mod middleware;
pub mod responses;
pub mod urls;


use axum::{middleware as axum_middleware, routing::get, Router};
use tower_http::trace::TraceLayer;

pub use context::{scoped, ResolverMatch, RouteMatch};
pub use middleware::{ApiError, AppState};
pub use urls::Route;

/// Build the complete router with middleware
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(Route::Blog.pattern(), get(blog::blog))
        .route(Route::BlogSection.pattern(), get(blog::blog_section))
        .route(Route::BlogPost.pattern(), get(blog::blog_post))
        .route(Route::BlogPostSecret.pattern(), get(blog::blog_post_secret))
        .route(Route::ManagePostList.pattern(), get(manage::manage_post_list))
        .route(
            Route::ManagePostCreate.pattern(),
            get(manage::manage_post_create_form).post(manage::manage_post_create),
        )
        .route(
            Route::ManagePostUpdate.pattern(),
            get(manage::manage_post_update_form).post(manage::manage_post_update),
        )
        .route(
            Route::ManagePostDelete.pattern(),
            get(manage::manage_post_delete_confirm).post(manage::manage_post_delete),
        )
        .route(
            Route::AjaxPreview.pattern(),
            axum::routing::post(manage::ajax_preview),
        )
        .route(Route::Login.pattern(), get(auth::login_form).post(auth::login))
        .route(Route::Logout.pattern(), axum::routing::post(auth::logout))
        .fallback(not_found)
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::load_user,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn not_found() -> ApiError {
    ApiError::not_found("Not found")
}
