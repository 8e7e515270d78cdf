//! Scoped context
//!
//! Every view response carries a `scoper_lookup` label naming the route
//! that served it (`"blog:blog_section"`), or `""` when no route matched.

use axum::extract::{FromRequestParts, MatchedPath};
use axum::http::request::Parts;
use serde::Serialize;
use std::convert::Infallible;

use super::urls::Route;

/// The route a request resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteMatch {
    pub route: Route,
}

impl RouteMatch {
    pub fn new(route: Route) -> Self {
        Self { route }
    }

    pub fn namespace(&self) -> &'static str {
        self.route.namespace()
    }

    pub fn url_name(&self) -> &'static str {
        self.route.name()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScopedContext {
    pub scoper_lookup: String,
}

pub fn scoped(resolver_match: Option<&RouteMatch>) -> ScopedContext {
    let scoper_lookup = resolver_match
        .map(|m| format!("{}:{}", m.namespace(), m.url_name()))
        .unwrap_or_default();
    ScopedContext { scoper_lookup }
}

/// Extractor resolving the matched axum path back to its [`Route`].
#[derive(Debug, Clone, Copy)]
pub struct ResolverMatch(pub Option<RouteMatch>);

impl ResolverMatch {
    pub fn scoped(&self) -> ScopedContext {
        scoped(self.0.as_ref())
    }
}

impl<S> FromRequestParts<S> for ResolverMatch
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let route = parts
            .extensions
            .get::<MatchedPath>()
            .and_then(|path| Route::from_pattern(path.as_str()));
        Ok(ResolverMatch(route.map(RouteMatch::new)))
    }
}
