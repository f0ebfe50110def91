//! HTTP donor source backed by `reqwest`.

use donor_finder_core::RawUser;
use tracing::instrument;
use url::Url;

use super::{DirectoryError, DonorSource};

/// Fetches the user list with a plain GET.
#[derive(Debug, Clone)]
pub struct HttpDonorSource {
    client: reqwest::Client,
    url: Url,
}

impl HttpDonorSource {
    /// Create a source for `url` with a default client.
    #[must_use]
    pub fn new(url: Url) -> Self {
        Self {
            client: reqwest::Client::new(),
            url,
        }
    }
}

impl DonorSource for HttpDonorSource {
    #[instrument(skip(self), fields(url = %self.url))]
    async fn fetch_users(&self) -> Result<Vec<RawUser>, DirectoryError> {
        let response = self
            .client
            .get(self.url.clone())
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();

        // Get response body as text first for better error diagnostics
        let body = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %body.chars().take(500).collect::<String>(),
                "Donor source returned non-success status"
            );
            return Err(DirectoryError::Status(status.as_u16()));
        }

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %body.chars().take(500).collect::<String>(),
                "Failed to parse donor source response"
            );
            DirectoryError::Parse(e)
        })
    }
}
