//! Response construction.
//!
//! # Responsibilities
//! - Build file, upstream relay, preflight and JSON error responses
//! - Set `Content-Length` from the exact body bytes
//!
//! # Design Decisions
//! - Bodies are fully buffered; nothing is streamed
//! - CORS headers are not added here; the cors layer covers every response

use axum::{
    body::{Body, Bytes},
    http::{header, HeaderValue, StatusCode},
    response::Response,
};
use serde_json::Value;

use crate::files::StaticFile;
use crate::upstream::UpstreamResponse;

/// Content type of every JSON body this server produces.
pub const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// Build a response with an explicit `Content-Length`.
fn with_body(status: StatusCode, content_type: HeaderValue, body: Bytes) -> Response {
    let mut response = Response::new(Body::empty());
    *response.status_mut() = status;
    let headers = response.headers_mut();
    headers.insert(header::CONTENT_TYPE, content_type);
    headers.insert(header::CONTENT_LENGTH, HeaderValue::from(body.len()));
    *response.body_mut() = Body::from(body);
    response
}

/// 204 answer to a preflight request.
pub fn preflight() -> Response {
    let mut response = Response::new(Body::empty());
    *response.status_mut() = StatusCode::NO_CONTENT;
    response
}

/// 200 with the file's bytes.
pub fn file(file: StaticFile) -> Response {
    let content_type = HeaderValue::from_str(&file.content_type)
        .unwrap_or_else(|_| HeaderValue::from_static("application/octet-stream"));
    with_body(StatusCode::OK, content_type, Bytes::from(file.body))
}

/// Relay an upstream response: status, content type and body unchanged.
pub fn relay(upstream: UpstreamResponse) -> Response {
    let status = StatusCode::from_u16(upstream.status.as_u16()).unwrap_or(StatusCode::BAD_GATEWAY);
    let content_type = upstream
        .content_type
        .unwrap_or_else(|| HeaderValue::from_static(JSON_CONTENT_TYPE));

    let mut response = with_body(status, content_type, upstream.body);
    response
        .headers_mut()
        .insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    response
}

/// JSON error body with the given status.
pub fn json(status: StatusCode, value: &Value) -> Response {
    // Serializing a `Value` cannot fail.
    let body = serde_json::to_vec(value).unwrap_or_default();
    with_body(status, HeaderValue::from_static(JSON_CONTENT_TYPE), Bytes::from(body))
}
