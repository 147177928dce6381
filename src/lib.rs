//! Local CORS proxy for the UMVVS vehicle valuation calculator.
//!
//! Serves a browser client's files from the working directory and forwards
//! `/umvvs/<endpoint>` to the upstream calculator API, adding permissive CORS
//! headers to every response.

pub mod config;
pub mod files;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;
pub mod upstream;

pub use config::schema::ProxyConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
