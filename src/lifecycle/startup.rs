//! Startup orchestration.
//!
//! # Responsibilities
//! - Build the server from validated configuration
//! - Bind the listener
//! - Serve until a shutdown signal arrives
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Listener binds last (traffic only when ready)

use std::future::Future;

use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::ProxyConfig;
use crate::http::HttpServer;
use crate::upstream::UpstreamError;

/// Errors that stop the server from starting or running.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to build upstream client: {0}")]
    Upstream(#[from] UpstreamError),

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}

/// Start the proxy and serve until `shutdown` resolves.
pub async fn run<F>(config: ProxyConfig, shutdown: F) -> Result<(), StartupError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let server = HttpServer::new(config)?;

    let address = server.config().bind_address();
    let listener = TcpListener::bind(&address)
        .await
        .map_err(|source| StartupError::Bind {
            address: address.clone(),
            source,
        })?;

    if let Ok(local) = listener.local_addr() {
        tracing::info!(address = %local, "Listening for connections");
        tracing::info!("Open http://{} in a browser", local);
    }

    server.run(listener, shutdown).await.map_err(StartupError::Serve)
}
