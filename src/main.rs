//! UMVVS calculator proxy.
//!
//! # Architecture Overview
//!
//! ```text
//!                      ┌────────────────────────────────────────────┐
//!                      │                umvvs-proxy                 │
//!                      │                                            │
//!   Browser request    │  ┌────────┐    ┌─────────┐                 │
//!   ───────────────────┼─▶│  http  │───▶│ routing │                 │
//!                      │  │ server │    │  table  │                 │
//!                      │  └────────┘    └────┬────┘                 │
//!                      │          ┌──────────┼───────────┐          │
//!                      │          ▼          ▼           ▼          │
//!                      │     preflight    files      upstream ──────┼──▶ Calculator
//!                      │       (204)    (disk read)  (reqwest GET)   │      API
//!                      │          └──────────┼───────────┘          │
//!   Browser response   │                     ▼                      │
//!   ◀──────────────────┼──────────── cors headers layer             │
//!                      └────────────────────────────────────────────┘
//! ```
//!
//! Configuration comes from defaults, an optional TOML file named by
//! `UMVVS_PROXY_CONFIG`, and the `PORT` environment variable.

use umvvs_proxy::config;
use umvvs_proxy::lifecycle::{self, signals::shutdown_signal};
use umvvs_proxy::observability::logging;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = config::load_from_env()?;

    logging::init(&config.observability)?;

    tracing::info!("umvvs-proxy v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.bind_address(),
        upstream = %config.upstream.base_url,
        timeout_secs = config.upstream.timeout_secs,
        "Configuration loaded"
    );

    lifecycle::run(config, shutdown_signal()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
