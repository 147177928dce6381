//! HTTP server setup and request dispatch.
//!
//! # Responsibilities
//! - Create the Axum Router with the single dispatch handler
//! - Wire up middleware (tracing, request ID, CORS headers)
//! - Bind server to listener with graceful shutdown
//! - Dispatch requests through the routing table
//! - Serve local files or forward to the upstream

use std::future::Future;
use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    response::Response,
    routing::any,
    Router,
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::config::ProxyConfig;
use crate::files::{StaticFileError, StaticFileServer};
use crate::http::cors::with_cors;
use crate::http::error::AppError;
use crate::http::request::{propagate_request_id_layer, set_request_id_layer, RequestIdExt};
use crate::http::response;
use crate::routing::{RouteTarget, Router as RouteTable};
use crate::upstream::{UpstreamClient, UpstreamError};

/// Application state injected into handlers.
///
/// Everything in here is immutable; requests share it without locking.
#[derive(Debug, Clone)]
pub struct AppState {
    pub routes: Arc<RouteTable>,
    pub files: Arc<StaticFileServer>,
    pub upstream: UpstreamClient,
}

impl AppState {
    pub fn from_config(config: &ProxyConfig) -> Result<Self, UpstreamError> {
        Ok(Self {
            routes: Arc::new(RouteTable::new(config.upstream.path_prefix.clone())),
            files: Arc::new(StaticFileServer::new(&config.static_files)),
            upstream: UpstreamClient::new(&config.upstream)?,
        })
    }
}

/// HTTP server for the proxy.
pub struct HttpServer {
    router: Router,
    config: ProxyConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ProxyConfig) -> Result<Self, UpstreamError> {
        let state = AppState::from_config(&config)?;
        let router = Self::build_router(state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    pub fn build_router(state: AppState) -> Router {
        let router = Router::new()
            .route("/", any(dispatch_handler))
            .route("/{*path}", any(dispatch_handler))
            .with_state(state);

        with_cors(router)
            .layer(propagate_request_id_layer())
            .layer(TraceLayer::new_for_http())
            .layer(set_request_id_layer())
    }

    /// The fully layered router, for driving in-process.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ProxyConfig {
        &self.config
    }

    /// Run the server until `shutdown` resolves, then drain in-flight requests.
    pub async fn run<F>(self, listener: TcpListener, shutdown: F) -> Result<(), std::io::Error>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            upstream = %self.config.upstream.base_url,
            prefix = %self.config.upstream.path_prefix,
            root = %self.config.static_files.root.display(),
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Main handler: looks up the route and runs its behavior.
async fn dispatch_handler(
    State(state): State<AppState>,
    request: Request<Body>,
) -> Result<Response, AppError> {
    let request_id = request.request_id();
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let query = request.uri().query().map(str::to_string);

    // The catch-all static route matches everything.
    let Some(route) = state.routes.match_request(&method, &path) else {
        return Err(AppError::NotFound { path: path.clone() });
    };

    tracing::debug!(
        request_id = %request_id,
        method = %method,
        path = %path,
        route = route.name,
        "Dispatching request"
    );

    match route.target {
        RouteTarget::Preflight => Ok(response::preflight()),
        RouteTarget::MethodNotAllowed => {
            tracing::warn!(request_id = %request_id, method = %method, "Unsupported method");
            Err(AppError::MethodNotAllowed(method))
        }
        RouteTarget::IndexDocument => match state.files.serve_index().await {
            Ok(file) => Ok(response::file(file)),
            Err(e) => {
                tracing::warn!(request_id = %request_id, error = %e, "Index document missing");
                Err(AppError::IndexNotFound)
            }
        },
        RouteTarget::Upstream { endpoint } => {
            proxy(&state, &request_id, endpoint, query.as_deref()).await
        }
        RouteTarget::OutsideUpstream { endpoint } => {
            tracing::warn!(
                request_id = %request_id,
                endpoint = %endpoint,
                "Rejected endpoint outside upstream base"
            );
            Err(AppError::NotFound { path: path.clone() })
        }
        RouteTarget::StaticFile { relative } => match state.files.serve_relative(relative).await {
            Ok(file) => Ok(response::file(file)),
            Err(e) => {
                log_static_miss(&request_id, &path, &e);
                Err(AppError::NotFound { path: path.clone() })
            }
        },
    }
}

async fn proxy(
    state: &AppState,
    request_id: &str,
    endpoint: &str,
    query: Option<&str>,
) -> Result<Response, AppError> {
    match state.upstream.fetch(endpoint, query).await {
        Ok(upstream) => {
            if !upstream.status.is_success() {
                tracing::warn!(
                    request_id = %request_id,
                    upstream = %upstream.url,
                    status = %upstream.status,
                    "Upstream returned error status"
                );
            }
            Ok(response::relay(upstream))
        }
        Err(e) => {
            tracing::error!(
                request_id = %request_id,
                upstream = e.url().unwrap_or_default(),
                timeout = e.is_timeout(),
                error = %e,
                "Upstream request failed"
            );
            Err(AppError::Upstream(e))
        }
    }
}

fn log_static_miss(request_id: &str, path: &str, err: &StaticFileError) {
    match err {
        StaticFileError::Traversal(_) => {
            tracing::warn!(request_id = %request_id, path = %path, "Rejected path outside static root");
        }
        _ => {
            tracing::debug!(request_id = %request_id, path = %path, error = %err, "Static file not found");
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{header, Method, StatusCode};
    use serde_json::{json, Value};
    use std::path::PathBuf;
    use tower::ServiceExt;

    struct Fixture {
        root: PathBuf,
        router: Router,
        upstream_base: String,
    }

    impl Fixture {
        fn new() -> Self {
            let root = std::env::temp_dir().join(format!("umvvs-server-{}", uuid::Uuid::new_v4()));
            std::fs::create_dir_all(root.join("js")).unwrap();

            // Nothing listens on this port, so proxied calls fail fast.
            let closed = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            let upstream_base = format!("http://{}/umvvs-api/ExternalCalculator", closed.local_addr().unwrap());
            drop(closed);

            let mut config = ProxyConfig::default();
            config.static_files.root = root.clone();
            config.upstream.base_url = upstream_base.clone();
            config.upstream.timeout_secs = 2;

            let router = HttpServer::new(config).unwrap().router();
            Self { root, router, upstream_base }
        }

        async fn send(&self, method: Method, uri: &str) -> (StatusCode, axum::http::HeaderMap, Vec<u8>) {
            let request = Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap();
            let response = self.router.clone().oneshot(request).await.unwrap();
            let status = response.status();
            let headers = response.headers().clone();
            let body = axum::body::to_bytes(response.into_body(), usize::MAX)
                .await
                .unwrap()
                .to_vec();
            (status, headers, body)
        }
    }

    impl Drop for Fixture {
        fn drop(&mut self) {
            let _ = std::fs::remove_dir_all(&self.root);
        }
    }

    fn assert_cors(headers: &axum::http::HeaderMap) {
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_METHODS], "GET, OPTIONS");
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_HEADERS], "Content-Type");
    }

    #[tokio::test]
    async fn test_preflight() {
        let fixture = Fixture::new();
        for uri in ["/", "/umvvs/getMakes", "/nowhere.txt"] {
            let (status, headers, body) = fixture.send(Method::OPTIONS, uri).await;
            assert_eq!(status, StatusCode::NO_CONTENT);
            assert!(body.is_empty());
            assert_cors(&headers);
        }
    }

    #[tokio::test]
    async fn test_index_served_for_both_aliases() {
        let fixture = Fixture::new();
        std::fs::write(fixture.root.join("index.html"), "<html>calc</html>").unwrap();

        for uri in ["/", "/index.html"] {
            let (status, headers, body) = fixture.send(Method::GET, uri).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(headers[header::CONTENT_TYPE], "text/html; charset=utf-8");
            assert_eq!(headers[header::CONTENT_LENGTH], "17");
            assert_eq!(body, b"<html>calc</html>");
            assert_cors(&headers);
        }
    }

    #[tokio::test]
    async fn test_missing_index() {
        let fixture = Fixture::new();
        let (status, headers, body) = fixture.send(Method::GET, "/").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(headers[header::CONTENT_TYPE], "application/json; charset=utf-8");
        assert_cors(&headers);
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body, json!({"error": "index.html not found"}));
    }

    #[tokio::test]
    async fn test_static_file() {
        let fixture = Fixture::new();
        std::fs::write(fixture.root.join("js/app.js"), "console.log(1);").unwrap();

        let (status, headers, body) = fixture.send(Method::GET, "/js/app.js").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers[header::CONTENT_TYPE], "text/javascript; charset=utf-8");
        assert_eq!(headers[header::CONTENT_LENGTH], "15");
        assert_eq!(body, b"console.log(1);");
        assert_cors(&headers);
    }

    #[tokio::test]
    async fn test_static_query_is_ignored() {
        let fixture = Fixture::new();
        std::fs::write(fixture.root.join("js/app.js"), "x").unwrap();

        let (status, _, body) = fixture.send(Method::GET, "/js/app.js?v=3").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"x");
    }

    #[tokio::test]
    async fn test_missing_and_directory_paths() {
        let fixture = Fixture::new();

        for path in ["/missing.css", "/js"] {
            let (status, headers, body) = fixture.send(Method::GET, path).await;
            assert_eq!(status, StatusCode::NOT_FOUND);
            assert_cors(&headers);
            let body: Value = serde_json::from_slice(&body).unwrap();
            assert_eq!(body, json!({"error": "Not found", "path": path}));
        }
    }

    #[tokio::test]
    async fn test_traversal_is_not_found() {
        let fixture = Fixture::new();
        let (status, _, body) = fixture.send(Method::GET, "/js/../../etc/passwd").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["error"], "Not found");
    }

    #[tokio::test]
    async fn test_upstream_dot_segments_are_not_found() {
        let fixture = Fixture::new();
        for uri in ["/umvvs/../../admin/x?q=1", "/umvvs/%2e%2e/%2E%2E/admin"] {
            let (status, headers, body) = fixture.send(Method::GET, uri).await;
            assert_eq!(status, StatusCode::NOT_FOUND);
            assert_cors(&headers);
            let body: Value = serde_json::from_slice(&body).unwrap();
            assert_eq!(body["error"], "Not found");
            assert!(body.get("upstream").is_none());
        }
    }

    #[tokio::test]
    async fn test_method_not_allowed() {
        let fixture = Fixture::new();
        let (status, headers, body) = fixture.send(Method::POST, "/umvvs/getMakes").await;

        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(headers[header::ALLOW], "GET, HEAD, OPTIONS");
        assert_cors(&headers);
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body, json!({"error": "Method not allowed", "method": "POST"}));
    }

    #[tokio::test]
    async fn test_unreachable_upstream_is_bad_gateway() {
        let fixture = Fixture::new();
        let (status, headers, body) = fixture.send(Method::GET, "/umvvs/getYom?makeId=7").await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(headers[header::CONTENT_TYPE], "application/json; charset=utf-8");
        assert_cors(&headers);
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["upstream"], format!("{}/getYom?makeId=7", fixture.upstream_base));
        assert!(body["error"].as_str().is_some_and(|m| !m.is_empty()));
    }

    #[tokio::test]
    async fn test_request_id_echoed() {
        let fixture = Fixture::new();
        let (_, headers, _) = fixture.send(Method::GET, "/missing").await;
        let id = headers["x-request-id"].to_str().unwrap();
        assert!(uuid::Uuid::parse_str(id).is_ok());

        let request = Request::builder()
            .uri("/missing")
            .header("x-request-id", "client-chosen")
            .body(Body::empty())
            .unwrap();
        let response = fixture.router.clone().oneshot(request).await.unwrap();
        assert_eq!(response.headers()["x-request-id"], "client-chosen");
    }
}
