//! Request identification.
//!
//! # Responsibilities
//! - Give every request a unique id (UUID v4) unless the client sent one
//! - Echo the id on the response
//! - Expose the id to handlers for log correlation
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - An incoming `x-request-id` is trusted and kept

use axum::http::{HeaderName, HeaderValue, Request};
use tower_http::request_id::{
    MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use uuid::Uuid;

/// Header carrying the request id.
pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Generates UUID v4 request ids.
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeRequestUuid;

impl MakeRequestId for MakeRequestUuid {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// Layer assigning ids to incoming requests.
pub fn set_request_id_layer() -> SetRequestIdLayer<MakeRequestUuid> {
    SetRequestIdLayer::new(X_REQUEST_ID, MakeRequestUuid)
}

/// Layer copying the id onto the response.
pub fn propagate_request_id_layer() -> PropagateRequestIdLayer {
    PropagateRequestIdLayer::new(X_REQUEST_ID)
}

/// Access to the id assigned by [`set_request_id_layer`].
pub trait RequestIdExt {
    /// The request id, or `"unknown"` outside the id layer.
    fn request_id(&self) -> String;
}

impl<B> RequestIdExt for Request<B> {
    fn request_id(&self) -> String {
        self.extensions()
            .get::<RequestId>()
            .and_then(|id| id.header_value().to_str().ok())
            .or_else(|| self.headers().get(&X_REQUEST_ID).and_then(|v| v.to_str().ok()))
            .unwrap_or("unknown")
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    #[test]
    fn test_generates_uuid() {
        let request = Request::new(Body::empty());
        let id = MakeRequestUuid.make_request_id(&request).unwrap();
        let text = id.header_value().to_str().unwrap();
        assert!(Uuid::parse_str(text).is_ok());
    }

    #[test]
    fn test_request_id_lookup() {
        let mut request = Request::new(Body::empty());
        assert_eq!(request.request_id(), "unknown");

        request
            .headers_mut()
            .insert(X_REQUEST_ID, HeaderValue::from_static("from-header"));
        assert_eq!(request.request_id(), "from-header");

        request
            .extensions_mut()
            .insert(RequestId::new(HeaderValue::from_static("from-layer")));
        assert_eq!(request.request_id(), "from-layer");
    }
}
