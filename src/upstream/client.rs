//! Upstream HTTP client.
//!
//! # Responsibilities
//! - Issue one GET per proxied request with the fixed identification headers
//! - Bound each call by the configured timeout
//! - Separate "upstream answered" from "no answer at all"
//!
//! # Design Decisions
//! - No retries: a single attempt per request
//! - Any status the upstream returns is a successful fetch; only transport
//!   failures (connect, DNS, timeout, body read) are errors

use std::error::Error as StdError;
use std::time::Duration;

use axum::body::Bytes;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::StatusCode;
use thiserror::Error;

use crate::config::UpstreamConfig;
use crate::upstream::target::build_target_url;

/// Errors from the upstream client.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("invalid upstream client configuration: {0}")]
    Config(String),

    /// No HTTP response could be obtained.
    #[error("{message}")]
    Transport {
        url: String,
        message: String,
        #[source]
        source: reqwest::Error,
    },
}

impl UpstreamError {
    /// The URL the failed request targeted, if one was built.
    pub fn url(&self) -> Option<&str> {
        match self {
            UpstreamError::Config(_) => None,
            UpstreamError::Transport { url, .. } => Some(url),
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, UpstreamError::Transport { source, .. } if source.is_timeout())
    }
}

/// A response received from the upstream, whatever its status.
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    pub url: String,
    pub status: StatusCode,
    /// Upstream `Content-Type`, if it sent one.
    pub content_type: Option<HeaderValue>,
    pub body: Bytes,
}

/// Client for the fixed upstream API.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    http: reqwest::Client,
    base_url: String,
}

impl UpstreamClient {
    /// Build a client from configuration.
    pub fn new(config: &UpstreamConfig) -> Result<Self, UpstreamError> {
        let accept = HeaderValue::from_str(&config.accept)
            .map_err(|e| UpstreamError::Config(format!("accept header: {e}")))?;
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, accept);

        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| UpstreamError::Config(e.to_string()))?;

        Ok(Self {
            http,
            base_url: config.base_url.clone(),
        })
    }

    /// URL a request for `endpoint` and `query` is sent to.
    pub fn target_url(&self, endpoint: &str, query: Option<&str>) -> String {
        build_target_url(&self.base_url, endpoint, query)
    }

    /// Fetch an endpoint from the upstream.
    pub async fn fetch(&self, endpoint: &str, query: Option<&str>) -> Result<UpstreamResponse, UpstreamError> {
        let url = self.target_url(endpoint, query);

        tracing::debug!(upstream = %url, "Forwarding to upstream");

        let response = match self.http.get(&url).send().await {
            Ok(r) => r,
            Err(e) => return Err(transport_error(url, e)),
        };

        let status = response.status();
        let content_type = response.headers().get(CONTENT_TYPE).cloned();

        let body = match response.bytes().await {
            Ok(b) => b,
            Err(e) => return Err(transport_error(url, e)),
        };

        Ok(UpstreamResponse {
            url,
            status,
            content_type,
            body,
        })
    }
}

fn transport_error(url: String, source: reqwest::Error) -> UpstreamError {
    UpstreamError::Transport {
        message: describe(&source),
        url,
        source,
    }
}

/// Flatten an error and its causes into one line.
///
/// reqwest's own message only says the request failed; the cause chain
/// carries the useful part (refused, timed out, DNS).
fn describe(err: &reqwest::Error) -> String {
    let mut message = if err.is_timeout() {
        "upstream request timed out".to_string()
    } else {
        err.to_string()
    };

    let mut cause = err.source();
    while let Some(inner) = cause {
        let text = inner.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        cause = inner.source();
    }
    message
}
