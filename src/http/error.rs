//! Request-boundary errors.
//!
//! Every failure a handler can hit ends here and becomes a JSON response.
//! None of them is fatal to the server.

use axum::{
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::http::response;
use crate::upstream::UpstreamError;

/// Methods the server answers, as sent in `Allow` on a 405.
pub const ALLOWED_METHODS: &str = "GET, HEAD, OPTIONS";

/// Errors surfaced to the client.
#[derive(Debug, Error)]
pub enum AppError {
    /// The root document is missing from the static root.
    #[error("index.html not found")]
    IndexNotFound,

    /// The requested path maps to no regular file.
    #[error("Not found")]
    NotFound { path: String },

    #[error("Method not allowed")]
    MethodNotAllowed(Method),

    /// The upstream could not be reached at all.
    #[error(transparent)]
    Upstream(#[from] UpstreamError),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::IndexNotFound | AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            AppError::Upstream(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = match &self {
            AppError::IndexNotFound => json!({ "error": self.to_string() }),
            AppError::NotFound { path } => json!({ "error": self.to_string(), "path": path }),
            AppError::MethodNotAllowed(method) => {
                json!({ "error": self.to_string(), "method": method.as_str() })
            }
            AppError::Upstream(err) => {
                json!({ "error": err.to_string(), "upstream": err.url().unwrap_or_default() })
            }
        };
        let mut response = response::json(self.status(), &body);
        if let AppError::MethodNotAllowed(_) = self {
            response
                .headers_mut()
                .insert(header::ALLOW, HeaderValue::from_static(ALLOWED_METHODS));
        }
        response
    }
}
