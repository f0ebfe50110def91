//! Inbound donor data source.
//!
//! # Architecture
//!
//! The directory only needs "an ordered list of `{id, name}` users". Where
//! that list comes from is a [`DonorSource`] capability handed to the app at
//! startup:
//!
//! - [`HttpDonorSource`] - GET against the public mock-data endpoint
//! - [`StaticDonorSource`] - fixed list for tests and offline demos
//!
//! The list is fetched exactly once. A failed fetch is not retried; the
//! directory degrades to an empty list (see [`load_donors`]).

mod http;

use std::future::Future;

use donor_finder_core::{Donor, RawUser, assign_donor_meta};
use thiserror::Error;

pub use http::HttpDonorSource;

/// Endpoint used when no source URL is configured.
pub const DEFAULT_SOURCE_URL: &str = "https://jsonplaceholder.typicode.com/users";

/// Errors that can occur while fetching the user list.
#[derive(Debug, Error)]
pub enum DirectoryError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Endpoint answered with a non-success status.
    #[error("Unexpected status {0}")]
    Status(u16),

    /// Body was not a JSON array of users.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Something that can produce the raw user list.
pub trait DonorSource: Send + Sync + 'static {
    /// Fetch the users in upstream order.
    fn fetch_users(&self) -> impl Future<Output = Result<Vec<RawUser>, DirectoryError>> + Send;
}

/// A source that always returns the same users.
#[derive(Debug, Clone, Default)]
pub struct StaticDonorSource {
    users: Vec<RawUser>,
}

impl StaticDonorSource {
    /// Serve `users` as-is.
    #[must_use]
    pub const fn new(users: Vec<RawUser>) -> Self {
        Self { users }
    }
}

impl DonorSource for StaticDonorSource {
    async fn fetch_users(&self) -> Result<Vec<RawUser>, DirectoryError> {
        Ok(self.users.clone())
    }
}

/// Fetch users from `source` and decorate them as donors.
///
/// A failed fetch is logged and yields an empty directory.
pub async fn load_donors<S: DonorSource>(source: &S) -> Vec<Donor> {
    match source.fetch_users().await {
        Ok(users) => {
            let donors = assign_donor_meta(&users);
            tracing::info!(count = donors.len(), "Donor directory loaded");
            donors
        }
        Err(e) => {
            tracing::warn!(error = %e, "Failed to load donor directory, showing empty list");
            Vec::new()
        }
    }
}
