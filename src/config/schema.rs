//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the proxy.
//! All types derive Serde traits for deserialization from config files.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Upstream calculator API used when no base URL is configured.
pub const DEFAULT_UPSTREAM_BASE: &str =
    "https://taxpayerportal.tra.go.tz/umvvs-api/ExternalCalculator";

/// Root configuration for the proxy.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ProxyConfig {
    /// Listener configuration (bind host and port).
    pub listener: ListenerConfig,

    /// Upstream API settings.
    pub upstream: UpstreamConfig,

    /// Local static file settings.
    pub static_files: StaticFilesConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl ProxyConfig {
    /// Socket address string the listener binds to.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.listener.host, self.listener.port)
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind host. Loopback by default; the proxy is not meant to face the network.
    pub host: String,

    /// Bind port, overridable with the `PORT` environment variable.
    pub port: u16,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
        }
    }
}

/// Upstream API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Base URL the stripped endpoint is appended to.
    pub base_url: String,

    /// Local path prefix routed to the upstream (e.g., "/umvvs/").
    pub path_prefix: String,

    /// User-Agent sent on every upstream request.
    pub user_agent: String,

    /// Accept header sent on every upstream request.
    pub accept: String,

    /// Total upstream request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_UPSTREAM_BASE.to_string(),
            path_prefix: "/umvvs/".to_string(),
            user_agent: "trakodi-umvvs-proxy/1.0".to_string(),
            accept: "application/json, text/plain, */*".to_string(),
            timeout_secs: 30,
        }
    }
}

/// Static file configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StaticFilesConfig {
    /// Directory files are served from.
    pub root: PathBuf,

    /// Document served for `/` and `/index.html`.
    pub index_file: String,
}

impl Default for StaticFilesConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            index_file: "index.html".to_string(),
        }
    }
}

/// `tracing` filter used when neither `RUST_LOG` nor the config give one.
pub const DEFAULT_LOG_FILTER: &str = "umvvs_proxy=info,tower_http=info";

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Default `tracing` filter, used when `RUST_LOG` is unset.
    pub log_filter: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}
