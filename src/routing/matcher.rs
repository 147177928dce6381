//! Route matching logic.
//!
//! # Responsibilities
//! - Match request method (preflight detection)
//! - Match exact paths (root document aliases)
//! - Match path prefix (case-sensitive)
//!
//! # Design Decisions
//! - Matchers look at method and path only; the query never takes part
//! - Path matching is case-sensitive
//! - No regex to guarantee O(n) matching

use axum::http::Method;

/// Trait for matching requests against conditions.
pub trait Matcher: Send + Sync + std::fmt::Debug {
    /// Returns true if the request matches this condition.
    fn matches(&self, method: &Method, path: &str) -> bool;
}

/// Matches a single request method, whatever the path.
#[derive(Debug, Clone)]
pub struct MethodMatcher {
    method: Method,
}

impl MethodMatcher {
    pub fn new(method: Method) -> Self {
        Self { method }
    }
}

impl Matcher for MethodMatcher {
    fn matches(&self, method: &Method, _path: &str) -> bool {
        *method == self.method
    }
}

/// Matches one of a fixed set of paths exactly.
#[derive(Debug, Clone)]
pub struct ExactPathMatcher {
    paths: Vec<String>,
}

impl ExactPathMatcher {
    pub fn new<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            paths: paths.into_iter().map(Into::into).collect(),
        }
    }
}

impl Matcher for ExactPathMatcher {
    fn matches(&self, _method: &Method, path: &str) -> bool {
        self.paths.iter().any(|p| p == path)
    }
}

/// Matches the request path prefix.
#[derive(Debug, Clone)]
pub struct PathPrefixMatcher {
    prefix: String,
}

impl PathPrefixMatcher {
    /// Create a new path prefix matcher.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl Matcher for PathPrefixMatcher {
    fn matches(&self, _method: &Method, path: &str) -> bool {
        path.starts_with(&self.prefix)
    }
}

/// Matches any method outside an allowed set.
#[derive(Debug, Clone)]
pub struct UnsupportedMethodMatcher {
    allowed: Vec<Method>,
}

impl UnsupportedMethodMatcher {
    pub fn new(allowed: impl IntoIterator<Item = Method>) -> Self {
        Self {
            allowed: allowed.into_iter().collect(),
        }
    }
}

impl Matcher for UnsupportedMethodMatcher {
    fn matches(&self, method: &Method, _path: &str) -> bool {
        !self.allowed.contains(method)
    }
}

/// Matches every request. Used for the catch-all static route.
#[derive(Debug, Clone, Default)]
pub struct AnyMatcher;

impl Matcher for AnyMatcher {
    fn matches(&self, _method: &Method, _path: &str) -> bool {
        true
    }
}
