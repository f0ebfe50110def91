//! HTTP route handlers for the donor directory.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                        - Donor directory with the "My Requests" panel
//! POST /search                  - Apply the selected blood group and city
//! POST /clear                   - Reset the filters
//! POST /sort                    - Toggle sort-by-availability
//! POST /donors/{id}/request     - Request help from a donor
//!
//! # Requests
//! GET  /requests                - "My Requests" page
//! POST /requests/{id}/cancel    - Cancel a request
//! POST /requests/{id}/status    - Change a request's status
//! ```
//!
//! All POST handlers answer with a `303 See Other` back to a page, so a
//! browser refresh never resubmits a form.

pub mod donors;
pub mod requests;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the request routes router.
pub fn request_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(requests::index))
        .route("/{id}/cancel", post(requests::cancel))
        .route("/{id}/status", post(requests::update_status))
}

/// Create all page routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Directory
        .route("/", get(donors::index))
        .route("/search", post(donors::search))
        .route("/clear", post(donors::clear))
        .route("/sort", post(donors::sort))
        .route("/donors/{id}/request", post(donors::request_help))
        // Requests
        .nest("/requests", request_routes())
}
