//! Configuration loading from disk and environment.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::schema::ProxyConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable naming an optional TOML config file.
pub const CONFIG_PATH_ENV: &str = "UMVVS_PROXY_CONFIG";

/// Environment variable overriding the listener port.
pub const PORT_ENV: &str = "PORT";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid PORT value {0:?}")]
    InvalidPort(String),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load configuration from the process environment.
///
/// Reads the file named by `UMVVS_PROXY_CONFIG` and the `PORT` override.
pub fn load_from_env() -> Result<ProxyConfig, ConfigError> {
    let path = std::env::var_os(CONFIG_PATH_ENV).map(PathBuf::from);
    let port = std::env::var(PORT_ENV).ok();
    load_config(path.as_deref(), port.as_deref())
}

/// Build, override and validate the configuration.
///
/// Starts from the TOML file at `path` (or defaults when `None`), applies
/// the `port` override, then validates the result.
pub fn load_config(path: Option<&Path>, port: Option<&str>) -> Result<ProxyConfig, ConfigError> {
    let mut config = match path {
        Some(path) => {
            tracing::info!(path = %path.display(), "Loading configuration file");
            let content = fs::read_to_string(path)?;
            toml::from_str(&content)?
        }
        None => ProxyConfig::default(),
    };

    apply_port_override(&mut config, port)?;
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Replace the listener port with `value` when one is given.
pub fn apply_port_override(config: &mut ProxyConfig, value: Option<&str>) -> Result<(), ConfigError> {
    if let Some(raw) = value {
        let port = raw
            .trim()
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort(raw.to_string()))?;
        config.listener.port = port;
    }
    Ok(())
}
