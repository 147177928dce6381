//! Upstream proxy subsystem.
//!
//! # Data Flow
//! ```text
//! endpoint + query (from the routing layer)
//!     → target.rs (base URL + "/" + endpoint [+ "?" + query])
//!     → client.rs (single GET, timeout bounded)
//!     → UpstreamResponse { status, content_type, body } | UpstreamError
//! ```

pub mod client;
pub mod target;

pub use client::{UpstreamClient, UpstreamError, UpstreamResponse};
pub use target::{build_target_url, has_dot_segment};
