//! Route lookup and dispatch.
//!
//! # Responsibilities
//! - Store the prioritized route list
//! - Look up the first route matching a request
//! - Derive the route target (upstream endpoint, relative file path)
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - O(n) scan over a handful of routes, first match wins
//! - The catch-all static route guarantees every request matches

use axum::http::Method;

use crate::routing::matcher::{
    AnyMatcher, ExactPathMatcher, Matcher, MethodMatcher, PathPrefixMatcher,
    UnsupportedMethodMatcher,
};
use crate::upstream::has_dot_segment;

/// Paths that serve the root document.
pub const INDEX_PATHS: [&str; 2] = ["/", "/index.html"];

/// The behavior a route dispatches to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteKind {
    Preflight,
    MethodNotAllowed,
    IndexDocument,
    Upstream,
    StaticFile,
}

/// A compiled route: a matcher plus the behavior it selects.
#[derive(Debug)]
pub struct Route {
    /// Route identifier for logging.
    pub name: &'static str,
    pub kind: RouteKind,
    matcher: Box<dyn Matcher>,
}

impl Route {
    pub fn new(name: &'static str, kind: RouteKind, matcher: impl Matcher + 'static) -> Self {
        Self {
            name,
            kind,
            matcher: Box::new(matcher),
        }
    }
}

/// What a matched request should be handed to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteTarget<'a> {
    Preflight,
    MethodNotAllowed,
    IndexDocument,
    /// Path remainder after the proxy prefix.
    Upstream { endpoint: &'a str },
    /// Path with its leading slashes removed.
    StaticFile { relative: &'a str },
    /// Proxied path whose dot segments would leave the upstream base.
    OutsideUpstream { endpoint: &'a str },
}

/// Result of a route lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch<'a> {
    pub name: &'static str,
    pub target: RouteTarget<'a>,
}

/// Prioritized route table.
#[derive(Debug)]
pub struct Router {
    routes: Vec<Route>,
    proxy_prefix: String,
}

impl Router {
    /// Build the standard route table for the given proxy prefix.
    ///
    /// Order: preflight, unsupported methods, root document, upstream
    /// prefix, then any other path as a static file.
    pub fn new(proxy_prefix: impl Into<String>) -> Self {
        let proxy_prefix = proxy_prefix.into();
        let routes = vec![
            Route::new("preflight", RouteKind::Preflight, MethodMatcher::new(Method::OPTIONS)),
            Route::new(
                "unsupported-method",
                RouteKind::MethodNotAllowed,
                UnsupportedMethodMatcher::new([Method::GET, Method::HEAD, Method::OPTIONS]),
            ),
            Route::new("index", RouteKind::IndexDocument, ExactPathMatcher::new(INDEX_PATHS)),
            Route::new(
                "upstream",
                RouteKind::Upstream,
                PathPrefixMatcher::new(proxy_prefix.clone()),
            ),
            Route::new("static", RouteKind::StaticFile, AnyMatcher),
        ];

        Self { routes, proxy_prefix }
    }

    /// Find the first route matching the request.
    pub fn match_request<'a>(&self, method: &Method, path: &'a str) -> Option<RouteMatch<'a>> {
        let route = self.routes.iter().find(|r| r.matcher.matches(method, path))?;

        let target = match route.kind {
            RouteKind::Preflight => RouteTarget::Preflight,
            RouteKind::MethodNotAllowed => RouteTarget::MethodNotAllowed,
            RouteKind::IndexDocument => RouteTarget::IndexDocument,
            RouteKind::Upstream => {
                let endpoint = path.strip_prefix(self.proxy_prefix.as_str()).unwrap_or("");
                if has_dot_segment(endpoint) {
                    RouteTarget::OutsideUpstream { endpoint }
                } else {
                    RouteTarget::Upstream { endpoint }
                }
            }
            RouteKind::StaticFile => RouteTarget::StaticFile {
                relative: path.trim_start_matches('/'),
            },
        };

        Some(RouteMatch {
            name: route.name,
            target,
        })
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }
}
