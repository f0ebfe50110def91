//! Session-related types.
//!
//! Per-visitor directory state kept between requests.

use donor_finder_core::DonorQuery;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

/// What the visitor currently sees in the directory.
///
/// The query's filters are the *applied* ones: they change only when the
/// visitor presses "Search" or "Clear", never while they pick dropdown values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryView {
    pub query: DonorQuery,
}

impl DirectoryView {
    /// Read the view from the session, falling back to the default view.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store cannot be read.
    pub async fn load(session: &Session) -> Result<Self, tower_sessions::session::Error> {
        Ok(session
            .get::<Self>(keys::DIRECTORY_VIEW)
            .await?
            .unwrap_or_default())
    }

    /// Write the view back to the session.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store cannot be written.
    pub async fn save(&self, session: &Session) -> Result<(), tower_sessions::session::Error> {
        session.insert(keys::DIRECTORY_VIEW, self).await
    }
}

/// Session keys.
pub mod keys {
    /// Key for the visitor's directory view state.
    pub const DIRECTORY_VIEW: &str = "directory_view";
}
