//! CLI command implementations.

pub mod donors;
pub mod requests;

use donor_finder_core::{FileStore, RequestService, RequestStore};
use donor_finder_web::config::{ConfigError, WebConfig};
use donor_finder_web::directory::HttpDonorSource;

/// Shared configuration and storage for one CLI invocation.
pub struct Context {
    pub config: WebConfig,
    pub service: RequestService<FileStore>,
}

impl Context {
    /// Load configuration (including `.env`) and open the request file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if an environment variable is malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = WebConfig::from_env()?;
        let store = FileStore::new(config.storage_path.clone());
        let service = RequestService::new(RequestStore::with_key(store, config.storage_key.clone()));

        Ok(Self { config, service })
    }

    /// Donor source for the configured endpoint.
    #[must_use]
    pub fn source(&self) -> HttpDonorSource {
        HttpDonorSource::new(self.config.source_url.clone())
    }
}
