//! Web configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `DONOR_FINDER_HOST` - Bind address (default: 127.0.0.1)
//! - `DONOR_FINDER_PORT` - Listen port (default: 3000)
//! - `DONOR_FINDER_BASE_URL` - Public URL (default: <http://localhost:3000>)
//! - `DONOR_FINDER_SOURCE_URL` - Mock user list endpoint
//!   (default: <https://jsonplaceholder.typicode.com/users>)
//! - `DONOR_FINDER_STORAGE_PATH` - Request storage file (default: data/storage.json)
//! - `DONOR_FINDER_STORAGE_KEY` - Key the request list lives under (default: requests)
//! - `DONOR_FINDER_REQUESTER_EMAIL` - Email attached to new requests and used
//!   to namespace the request list
//! - `DONOR_FINDER_SHOW_SORT` - Show the sort-by-availability toggle (default: true)
//! - `DONOR_FINDER_ALLOW_CANCEL` - Allow cancelling requests (default: true)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Transaction sample rate (default: 0.0)

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;

use donor_finder_core::Email;
use donor_finder_core::storage::DEFAULT_REQUESTS_KEY;
use thiserror::Error;
use url::Url;

use crate::directory::DEFAULT_SOURCE_URL;

/// Default location of the request storage file.
pub const DEFAULT_STORAGE_PATH: &str = "data/storage.json";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Web application configuration.
#[derive(Debug, Clone)]
pub struct WebConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL
    pub base_url: String,
    /// Endpoint returning the mock user list
    pub source_url: Url,
    /// File the request list is persisted to
    pub storage_path: PathBuf,
    /// Storage key of the request list
    pub storage_key: String,
    /// Identity attached to new requests, if any
    pub requester_email: Option<Email>,
    /// Optional screen features
    pub features: FeatureFlags,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
    /// Fraction of errors sent to Sentry
    pub sentry_sample_rate: f32,
    /// Fraction of transactions traced
    pub sentry_traces_sample_rate: f32,
}

/// Toggles for the features that differ between directory screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureFlags {
    /// Render the sort-by-availability toggle.
    pub show_sort: bool,
    /// Render per-request cancel buttons and accept cancel posts.
    pub allow_cancel: bool,
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self {
            show_sort: true,
            allow_cancel: true,
        }
    }
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::from([127, 0, 0, 1]),
            port: 3000,
            base_url: "http://localhost:3000".to_string(),
            source_url: default_source_url(),
            storage_path: PathBuf::from(DEFAULT_STORAGE_PATH),
            storage_key: DEFAULT_REQUESTS_KEY.to_string(),
            requester_email: None,
            features: FeatureFlags::default(),
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
        }
    }
}

impl WebConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let env = Env(&lookup);

        Ok(Self {
            host: env.parse_or("DONOR_FINDER_HOST", defaults.host)?,
            port: env.parse_or("DONOR_FINDER_PORT", defaults.port)?,
            base_url: env.get("DONOR_FINDER_BASE_URL").unwrap_or(defaults.base_url),
            source_url: env.parse_or("DONOR_FINDER_SOURCE_URL", defaults.source_url)?,
            storage_path: env
                .get("DONOR_FINDER_STORAGE_PATH")
                .map_or(defaults.storage_path, PathBuf::from),
            storage_key: env
                .get("DONOR_FINDER_STORAGE_KEY")
                .unwrap_or(defaults.storage_key),
            requester_email: env.parse_optional("DONOR_FINDER_REQUESTER_EMAIL")?,
            features: FeatureFlags {
                show_sort: env.bool_or("DONOR_FINDER_SHOW_SORT", defaults.features.show_sort)?,
                allow_cancel: env
                    .bool_or("DONOR_FINDER_ALLOW_CANCEL", defaults.features.allow_cancel)?,
            },
            sentry_dsn: env.get("SENTRY_DSN"),
            sentry_environment: env.get("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: env.parse_or("SENTRY_SAMPLE_RATE", defaults.sentry_sample_rate)?,
            sentry_traces_sample_rate: env.parse_or(
                "SENTRY_TRACES_SAMPLE_RATE",
                defaults.sentry_traces_sample_rate,
            )?,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether cookies should carry the `Secure` attribute.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

#[allow(clippy::expect_used)]
fn default_source_url() -> Url {
    Url::parse(DEFAULT_SOURCE_URL).expect("default source URL is valid")
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Variable lookup that treats empty values as unset.
struct Env<'a, F>(&'a F);

impl<F: Fn(&str) -> Option<String>> Env<'_, F> {
    fn get(&self, key: &str) -> Option<String> {
        (self.0)(key)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    }

    fn parse_optional<T>(&self, key: &str) -> Result<Option<T>, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        self.get(key)
            .map(|value| {
                value
                    .parse::<T>()
                    .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
            })
            .transpose()
    }

    fn parse_or<T>(&self, key: &str, default: T) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        Ok(self.parse_optional(key)?.unwrap_or(default))
    }

    fn bool_or(&self, key: &str, default: bool) -> Result<bool, ConfigError> {
        match self.get(key) {
            None => Ok(default),
            Some(value) => parse_bool(&value).ok_or_else(|| {
                ConfigError::InvalidEnvVar(key.to_string(), format!("not a boolean: {value}"))
            }),
        }
    }
}

/// Parse common boolean spellings.
fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(pairs: &[(&str, &str)]) -> Result<WebConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        WebConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:3000");
        assert_eq!(
            config.source_url.as_str(),
            "https://jsonplaceholder.typicode.com/users"
        );
        assert_eq!(config.storage_path, PathBuf::from("data/storage.json"));
        assert_eq!(config.storage_key, "requests");
        assert!(config.requester_email.is_none());
        assert_eq!(config.features, FeatureFlags::default());
        assert!(!config.is_secure());
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("DONOR_FINDER_HOST", "0.0.0.0"),
            ("DONOR_FINDER_PORT", "8080"),
            ("DONOR_FINDER_BASE_URL", "https://donors.example.org"),
            ("DONOR_FINDER_STORAGE_KEY", "blood_requests"),
            ("DONOR_FINDER_REQUESTER_EMAIL", "user@email.com"),
            ("DONOR_FINDER_SHOW_SORT", "off"),
            ("DONOR_FINDER_ALLOW_CANCEL", "0"),
        ])
        .unwrap();

        assert_eq!(config.socket_addr().to_string(), "0.0.0.0:8080");
        assert_eq!(config.storage_key, "blood_requests");
        assert_eq!(
            config.requester_email.as_ref().map(Email::as_str),
            Some("user@email.com")
        );
        assert!(!config.features.show_sort);
        assert!(!config.features.allow_cancel);
        assert!(config.is_secure());
    }

    #[test]
    fn test_empty_values_fall_back_to_defaults() {
        let config = config_from(&[("DONOR_FINDER_PORT", ""), ("SENTRY_DSN", "  ")]).unwrap();
        assert_eq!(config.port, 3000);
        assert!(config.sentry_dsn.is_none());
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let err = config_from(&[("DONOR_FINDER_PORT", "eighty")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref key, _) if key == "DONOR_FINDER_PORT"));

        assert!(config_from(&[("DONOR_FINDER_SOURCE_URL", "not a url")]).is_err());
        assert!(config_from(&[("DONOR_FINDER_REQUESTER_EMAIL", "nobody")]).is_err());
        assert!(config_from(&[("DONOR_FINDER_SHOW_SORT", "maybe")]).is_err());
    }

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool("TRUE"), Some(true));
        assert_eq!(parse_bool("yes"), Some(true));
        assert_eq!(parse_bool("Off"), Some(false));
        assert_eq!(parse_bool("2"), None);
    }
}
