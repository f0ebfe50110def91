//! Integration test harness for Donor Finder.
//!
//! Each [`TestContext`] boots the full web app on an ephemeral localhost
//! port, backed by a [`StaticDonorSource`] and an in-memory request store, and
//! drives it with a cookie-carrying `reqwest` client (one client = one
//! visitor session).
//!
//! ```rust,ignore
//! let ctx = TestContext::new(users(9)).await;
//! let page = ctx.get_page("/").await;
//! assert!(page.contains("9 donors"));
//! ```

use std::sync::Arc;

use donor_finder_core::{KeyValueStore, MemoryStore, RawUser, Request};
use donor_finder_web::app;
use donor_finder_web::config::WebConfig;
use donor_finder_web::directory::StaticDonorSource;
use donor_finder_web::state::AppState;
use reqwest::{Client, Response};

/// A running app plus a client bound to it.
pub struct TestContext {
    pub client: Client,
    pub base_url: String,
    pub state: AppState,
    pub store: Arc<MemoryStore>,
}

/// `count` users named `Donor 01`, `Donor 02`, ... with ids starting at 1.
#[must_use]
pub fn users(count: i64) -> Vec<RawUser> {
    (1..=count)
        .map(|id| RawUser::new(id, format!("Donor {id:02}")))
        .collect()
}

impl TestContext {
    /// Start the app with default configuration and a loaded directory.
    pub async fn new(users: Vec<RawUser>) -> Self {
        Self::with_config(WebConfig::default(), users).await
    }

    /// Start the app with `config` and a loaded directory.
    pub async fn with_config(config: WebConfig, users: Vec<RawUser>) -> Self {
        let ctx = Self::loading(config).await;
        ctx.state
            .load_directory(&StaticDonorSource::new(users))
            .await;
        ctx
    }

    /// Start the app with the directory still loading.
    #[allow(clippy::expect_used)]
    pub async fn loading(config: WebConfig) -> Self {
        let store = Arc::new(MemoryStore::new());
        let state = AppState::new(config, store.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Listener has no address");

        let router = app(state.clone());
        tokio::spawn(async move {
            axum::serve(listener, router)
                .await
                .expect("Test server failed");
        });

        Self {
            client: Self::client(),
            base_url: format!("http://{addr}"),
            state,
            store,
        }
    }

    /// A fresh client, i.e. a new visitor with no session.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn client() -> Client {
        Client::builder()
            .cookie_store(true)
            .build()
            .expect("Failed to create HTTP client")
    }

    /// Absolute URL for `path`.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// GET `path` and return the body, asserting success.
    #[allow(clippy::expect_used)]
    pub async fn get_page(&self, path: &str) -> String {
        let response = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("GET failed");
        assert!(response.status().is_success(), "GET {path}: {}", response.status());
        response.text().await.expect("Body was not text")
    }

    /// POST a form to `path`, following the redirect.
    #[allow(clippy::expect_used)]
    pub async fn post_form(&self, path: &str, form: &[(&str, &str)]) -> Response {
        self.client
            .post(self.url(path))
            .form(form)
            .send()
            .await
            .expect("POST failed")
    }

    /// POST a form to `path` and return the body of the page it redirects to.
    #[allow(clippy::expect_used)]
    pub async fn submit(&self, path: &str, form: &[(&str, &str)]) -> String {
        let response = self.post_form(path, form).await;
        assert!(response.status().is_success(), "POST {path}: {}", response.status());
        response.text().await.expect("Body was not text")
    }

    /// All stored requests, regardless of requester.
    #[must_use]
    pub fn stored_requests(&self) -> Vec<Request> {
        self.state.requests().store().load()
    }

    /// Raw value stored under `key`, or an empty string.
    #[must_use]
    pub fn store_value(&self, key: &str) -> String {
        self.store.get(key).ok().flatten().unwrap_or_default()
    }
}
