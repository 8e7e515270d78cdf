//! Named routes
//!
//! Every endpoint has a stable name and a path pattern in axum syntax.
//! `Route::reverse` builds a concrete URL from a route and its arguments,
//! so handlers never hard-code paths.

use chrono::Datelike;

use crate::models::Post;

/// Namespace of the blog's own routes
pub const NAMESPACE: &str = "blog";

/// Namespace of the login/logout routes
pub const ACCOUNT_NAMESPACE: &str = "account";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Blog,
    BlogSection,
    BlogPost,
    BlogPostSecret,
    ManagePostList,
    ManagePostCreate,
    ManagePostUpdate,
    ManagePostDelete,
    AjaxPreview,
    Login,
    Logout,
}

impl Route {
    pub const ALL: [Route; 11] = [
        Route::Blog,
        Route::BlogSection,
        Route::BlogPost,
        Route::BlogPostSecret,
        Route::ManagePostList,
        Route::ManagePostCreate,
        Route::ManagePostUpdate,
        Route::ManagePostDelete,
        Route::AjaxPreview,
        Route::Login,
        Route::Logout,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Route::Blog => "blog",
            Route::BlogSection => "blog_section",
            Route::BlogPost => "blog_post",
            Route::BlogPostSecret => "blog_post_secret",
            Route::ManagePostList => "manage_post_list",
            Route::ManagePostCreate => "manage_post_create",
            Route::ManagePostUpdate => "manage_post_update",
            Route::ManagePostDelete => "manage_post_delete",
            Route::AjaxPreview => "ajax_preview",
            Route::Login => "login",
            Route::Logout => "logout",
        }
    }

    pub fn namespace(self) -> &'static str {
        match self {
            Route::Login | Route::Logout => ACCOUNT_NAMESPACE,
            _ => NAMESPACE,
        }
    }

    pub fn pattern(self) -> &'static str {
        match self {
            Route::Blog => "/",
            Route::BlogSection => "/section/{section}",
            Route::BlogPost => "/post/{year}/{month}/{day}/{slug}",
            Route::BlogPostSecret => "/post/secret/{post_secret_key}",
            Route::ManagePostList => "/manage/posts",
            Route::ManagePostCreate => "/manage/posts/create",
            Route::ManagePostUpdate => "/manage/posts/{post_pk}/update",
            Route::ManagePostDelete => "/manage/posts/{post_pk}/delete",
            Route::AjaxPreview => "/manage/ajax/markup-preview",
            Route::Login => "/account/login",
            Route::Logout => "/account/logout",
        }
    }

    /// The route registered under `pattern`, as reported by axum's `MatchedPath`.
    pub fn from_pattern(pattern: &str) -> Option<Route> {
        Self::ALL.into_iter().find(|route| route.pattern() == pattern)
    }

    /// Fill the pattern's `{param}` placeholders with `args`, in order.
    ///
    /// Returns `None` when the number of arguments does not match.
    pub fn reverse(self, args: &[&str]) -> Option<String> {
        let mut url = String::new();
        let mut args = args.iter();

        for segment in self.pattern().split('/').skip(1) {
            url.push('/');
            if segment.starts_with('{') && segment.ends_with('}') {
                url.push_str(&urlencoding::encode(args.next()?));
            } else {
                url.push_str(segment);
            }
        }

        if args.next().is_some() {
            return None;
        }
        Some(url)
    }

    /// Path of a parameterless route.
    pub fn path(self) -> &'static str {
        self.pattern()
    }
}

/// Public URL of a published post, `None` for posts never published.
pub fn post_url(post: &Post) -> Option<String> {
    let published = post.published?;
    let year = published.year().to_string();
    let month = format!("{:02}", published.month());
    let day = format!("{:02}", published.day());
    Route::BlogPost.reverse(&[year.as_str(), month.as_str(), day.as_str(), post.slug.as_str()])
}

/// Preview URL of any post.
pub fn post_secret_url(post: &Post) -> Option<String> {
    if post.secret_key.is_empty() {
        return None;
    }
    Route::BlogPostSecret.reverse(&[post.secret_key.as_str()])
}
