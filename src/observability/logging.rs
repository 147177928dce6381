//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the `tracing` subscriber once at startup
//! - Take the filter from `RUST_LOG`, falling back to the configured default
//!
//! # Design Decisions
//! - Uses tracing crate for structured logging
//! - Human-readable fmt output; the proxy runs on a developer machine

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::schema::DEFAULT_LOG_FILTER;
use crate::config::ObservabilityConfig;

/// Build the env filter for the given config.
pub fn env_filter(config: &ObservabilityConfig) -> EnvFilter {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    select_filter(rust_log.as_deref(), config)
}

/// First directive set that parses: `rust_log`, the config, the default.
fn select_filter(rust_log: Option<&str>, config: &ObservabilityConfig) -> EnvFilter {
    rust_log
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .or_else(|| EnvFilter::try_new(&config.log_filter).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER))
}

/// Install the global subscriber.
///
/// Returns an error if a subscriber is already installed.
pub fn init(config: &ObservabilityConfig) -> Result<(), tracing_subscriber::util::TryInitError> {
    tracing_subscriber::registry()
        .with(env_filter(config))
        .with(tracing_subscriber::fmt::layer())
        .try_init()
}
