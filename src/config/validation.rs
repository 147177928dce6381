//! Configuration validation.
//!
//! Serde handles syntax; this module checks values. All problems are
//! collected so a broken config file is reported in one pass.

use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

use crate::config::schema::ProxyConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("listener address {0:?} is not a valid socket address")]
    InvalidBindAddress(String),

    #[error("listener port must be non-zero")]
    ZeroPort,

    #[error("upstream base_url {url:?} is invalid: {reason}")]
    InvalidUpstreamUrl { url: String, reason: String },

    #[error("upstream path_prefix {0:?} must start and end with '/'")]
    InvalidPathPrefix(String),

    #[error("upstream timeout_secs must be greater than zero")]
    ZeroTimeout,

    #[error("static index_file {0:?} must be a plain file name")]
    InvalidIndexFile(String),
}

/// Validate a loaded configuration.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let bind = config.bind_address();
    if bind.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(bind));
    }
    if config.listener.port == 0 {
        errors.push(ValidationError::ZeroPort);
    }

    let base = &config.upstream.base_url;
    match Url::parse(base) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {}
        Ok(url) => errors.push(ValidationError::InvalidUpstreamUrl {
            url: base.clone(),
            reason: format!("unsupported scheme {:?}", url.scheme()),
        }),
        Err(e) => errors.push(ValidationError::InvalidUpstreamUrl {
            url: base.clone(),
            reason: e.to_string(),
        }),
    }

    let prefix = &config.upstream.path_prefix;
    if prefix.len() < 2 || !prefix.starts_with('/') || !prefix.ends_with('/') {
        errors.push(ValidationError::InvalidPathPrefix(prefix.clone()));
    }

    if config.upstream.timeout_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }

    let index = &config.static_files.index_file;
    if index.is_empty() || index.contains('/') || index.contains('\\') || index == ".." {
        errors.push(ValidationError::InvalidIndexFile(index.clone()));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
