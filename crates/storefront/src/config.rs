//! Storefront configuration loaded from environment variables.
//!
//! Business settings (name, currency, contact channels, Telegram credentials)
//! live in the catalog's `config.json`, not here. This module only covers how
//! the process runs.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `STOREFRONT_CATALOG` - Catalog directory or `http(s)://` base URL
//!   (default: crates/storefront/catalog)
//! - `STOREFRONT_DATA_DIR` - Directory for the saved cart and contact info
//!   (default: .telecart)
//! - `TELEGRAM_API_BASE` - Telegram Bot API base URL (default: <https://api.telegram.org>)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error event sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Performance trace sample rate (default: 0.0)

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use thiserror::Error;
use url::Url;

use crate::catalog::CatalogSource;

/// Default Telegram Bot API base URL.
pub const DEFAULT_TELEGRAM_API_BASE: &str = "https://api.telegram.org";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Where `config.json` and `products.json` are loaded from
    pub catalog: CatalogSource,
    /// Directory holding the persisted cart and contact records
    pub data_dir: PathBuf,
    /// Telegram Bot API base URL
    pub telegram_api_base: Url,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
    /// Fraction of error events sent to Sentry
    pub sentry_sample_rate: f32,
    /// Fraction of transactions traced
    pub sentry_traces_sample_rate: f32,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("STOREFRONT_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_HOST".to_string(), e.to_string())
            })?;
        let port = get_env_or_default("STOREFRONT_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_PORT".to_string(), e.to_string())
            })?;
        let catalog = parse_catalog_source(&get_env_or_default(
            "STOREFRONT_CATALOG",
            "crates/storefront/catalog",
        ))?;
        let data_dir = PathBuf::from(get_env_or_default("STOREFRONT_DATA_DIR", ".telecart"));
        let telegram_api_base =
            Url::parse(&get_env_or_default("TELEGRAM_API_BASE", DEFAULT_TELEGRAM_API_BASE))
                .map_err(|e| {
                    ConfigError::InvalidEnvVar("TELEGRAM_API_BASE".to_string(), e.to_string())
                })?;

        Ok(Self {
            host,
            port,
            catalog,
            data_dir,
            telegram_api_base,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: get_rate("SENTRY_SAMPLE_RATE", 1.0)?,
            sentry_traces_sample_rate: get_rate("SENTRY_TRACES_SAMPLE_RATE", 0.0)?,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Interpret a catalog location: `http://` or `https://` means remote,
/// anything else is a local directory.
fn parse_catalog_source(value: &str) -> Result<CatalogSource, ConfigError> {
    if value.starts_with("http://") || value.starts_with("https://") {
        let url = Url::parse(value).map_err(|e| {
            ConfigError::InvalidEnvVar("STOREFRONT_CATALOG".to_string(), e.to_string())
        })?;
        return Ok(CatalogSource::Remote(url));
    }
    if value.trim().is_empty() {
        return Err(ConfigError::InvalidEnvVar(
            "STOREFRONT_CATALOG".to_string(),
            "must not be empty".to_string(),
        ));
    }
    Ok(CatalogSource::Directory(PathBuf::from(value)))
}

/// Read a sample rate in `0.0..=1.0`.
fn get_rate(key: &str, default: f32) -> Result<f32, ConfigError> {
    let Some(raw) = get_optional_env(key) else {
        return Ok(default);
    };
    let rate = raw
        .parse::<f32>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    if !(0.0..=1.0).contains(&rate) {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("must be between 0.0 and 1.0 (got {rate})"),
        ));
    }
    Ok(rate)
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_catalog_source_directory() {
        let source = parse_catalog_source("crates/storefront/catalog").unwrap();
        assert!(matches!(source, CatalogSource::Directory(path) if path.ends_with("catalog")));
    }

    #[test]
    fn test_parse_catalog_source_remote() {
        let source = parse_catalog_source("https://cdn.example.com/shop/").unwrap();
        assert!(
            matches!(source, CatalogSource::Remote(url) if url.host_str() == Some("cdn.example.com"))
        );
    }

    #[test]
    fn test_parse_catalog_source_invalid_url() {
        let result = parse_catalog_source("https://");
        assert!(matches!(result, Err(ConfigError::InvalidEnvVar(_, _))));
    }

    #[test]
    fn test_parse_catalog_source_empty() {
        assert!(parse_catalog_source("  ").is_err());
    }

    #[test]
    fn test_socket_addr() {
        let config = StorefrontConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            catalog: CatalogSource::Directory(PathBuf::from("catalog")),
            data_dir: PathBuf::from(".telecart"),
            telegram_api_base: Url::parse(DEFAULT_TELEGRAM_API_BASE).unwrap(),
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
        };

        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 3000);
    }
}
