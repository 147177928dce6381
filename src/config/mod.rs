//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! optional TOML file ($UMVVS_PROXY_CONFIG) or defaults
//!     → loader.rs (parse & deserialize, $PORT override)
//!     → validation.rs (semantic checks)
//!     → ProxyConfig (validated, immutable)
//!     → shared with the router, upstream client and static server
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; there is no runtime mutation
//! - All fields have defaults to allow running with no config file at all
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_from_env, ConfigError};
pub use schema::ListenerConfig;
pub use schema::ObservabilityConfig;
pub use schema::ProxyConfig;
pub use schema::StaticFilesConfig;
pub use schema::UpstreamConfig;
