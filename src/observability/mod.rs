//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Handlers and middleware produce:
//!     → tracing events (request_id, path, upstream, status fields)
//!     → tower_http TraceLayer spans per request
//!
//! Consumers:
//!     → logging.rs subscriber (stdout)
//! ```
//!
//! # Design Decisions
//! - Request ID flows through every handler log line
//! - Log level configurable via config and environment

pub mod logging;
