//! Application state shared across handlers.

use std::sync::Arc;

use donor_finder_core::{Donor, Email, KeyValueStore, RequestService, RequestStore};
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

use crate::config::WebConfig;
use crate::error::AppError;
use crate::directory::{DonorSource, load_donors};

/// Storage capability shared by all handlers.
pub type SharedStore = Arc<dyn KeyValueStore + Send + Sync>;

/// Loading state of the donor directory.
#[derive(Debug, Clone)]
pub enum DirectoryState {
    /// The initial fetch has not finished yet.
    Loading,
    /// The fetch finished (possibly with an empty list after a failure).
    Ready(Arc<Vec<Donor>>),
}

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// configuration, the donor directory and the request workflow.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: WebConfig,
    directory: RwLock<DirectoryState>,
    requests: RequestService<SharedStore>,
}

impl AppState {
    /// Create a new application state with the directory still loading.
    ///
    /// # Arguments
    ///
    /// * `config` - Web configuration
    /// * `store` - Key-value store the request list is persisted in
    #[must_use]
    pub fn new(config: WebConfig, store: SharedStore) -> Self {
        let requests = RequestService::new(RequestStore::with_key(
            store,
            config.storage_key.clone(),
        ));

        Self {
            inner: Arc::new(AppStateInner {
                config,
                directory: RwLock::new(DirectoryState::Loading),
                requests,
            }),
        }
    }

    /// Get a reference to the web configuration.
    #[must_use]
    pub fn config(&self) -> &WebConfig {
        &self.inner.config
    }

    /// Get a reference to the request workflow.
    #[must_use]
    pub fn requests(&self) -> &RequestService<SharedStore> {
        &self.inner.requests
    }

    /// Identity attached to requests made through this app.
    #[must_use]
    pub fn requester(&self) -> Option<&Email> {
        self.inner.config.requester_email.as_ref()
    }

    /// Run a request workflow call on the blocking thread pool.
    ///
    /// The file store does synchronous I/O under a lock, so async handlers go
    /// through here instead of calling [`Self::requests`] directly. The
    /// closure also receives the configured requester.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Internal` if the blocking task panicked.
    pub async fn with_requests<T, F>(&self, f: F) -> Result<T, AppError>
    where
        F: FnOnce(&RequestService<SharedStore>, Option<&Email>) -> T + Send + 'static,
        T: Send + 'static,
    {
        let state = self.clone();
        tokio::task::spawn_blocking(move || f(state.requests(), state.requester()))
            .await
            .map_err(|e| AppError::Internal(format!("request workflow task failed: {e}")))
    }

    /// Current directory state.
    pub async fn directory(&self) -> DirectoryState {
        self.inner.directory.read().await.clone()
    }

    /// The loaded donors, or `None` while the initial fetch is running.
    pub async fn donors(&self) -> Option<Arc<Vec<Donor>>> {
        match &*self.inner.directory.read().await {
            DirectoryState::Loading => None,
            DirectoryState::Ready(donors) => Some(Arc::clone(donors)),
        }
    }

    /// Fetch the directory from `source` and mark it ready.
    pub async fn load_directory<S: DonorSource>(&self, source: &S) {
        let donors = load_donors(source).await;
        *self.inner.directory.write().await = DirectoryState::Ready(Arc::new(donors));
    }

    /// Start loading the directory in the background.
    pub fn start_loading<S: DonorSource>(&self, source: S) -> JoinHandle<()> {
        let state = self.clone();
        tokio::spawn(async move {
            state.load_directory(&source).await;
        })
    }
}
