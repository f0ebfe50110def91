//! Request route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    response::Redirect,
};
use donor_finder_core::{Request, RequestId, RequestStatus};
use serde::Deserialize;
use tracing::instrument;

use crate::config::FeatureFlags;
use crate::error::{AppError, Result};
use crate::filters;
use crate::routes::donors::OptionView;
use crate::state::AppState;

/// Pages a request form may send the visitor back to.
const RETURN_PATHS: [&str; 2] = ["/", "/requests"];

/// Request card display data for templates.
#[derive(Clone)]
pub struct RequestCardView {
    pub id: i64,
    pub name: String,
    pub city: &'static str,
    pub blood_group: &'static str,
    pub badge_class: &'static str,
    pub status: &'static str,
    pub date: String,
    pub date_only: String,
    pub status_options: Vec<OptionView>,
}

impl From<&Request> for RequestCardView {
    fn from(request: &Request) -> Self {
        Self {
            id: request.id.as_i64(),
            name: request.name.clone(),
            city: request.city.as_str(),
            blood_group: request.blood_group.as_str(),
            badge_class: request.blood_group.slug(),
            status: request.status.as_str(),
            date: request.date.clone(),
            date_only: request.date_only().to_string(),
            status_options: RequestStatus::ALL
                .iter()
                .map(|&status| OptionView {
                    label: status.as_str(),
                    selected: status == request.status,
                })
                .collect(),
        }
    }
}

/// "My Requests" page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/requests.html")]
pub struct RequestsTemplate {
    pub requests: Vec<RequestCardView>,
    /// Configured requester email, empty when requests are anonymous.
    pub requester: String,
    pub features: FeatureFlags,
}

/// Display the visitor's requests.
///
/// Only requests made by the configured requester are shown; without one,
/// only anonymous requests.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<RequestsTemplate> {
    let own = state
        .with_requests(|requests, requester| requests.list_own(requester))
        .await?;

    Ok(RequestsTemplate {
        requests: own.iter().map(RequestCardView::from).collect(),
        requester: state
            .requester()
            .map(ToString::to_string)
            .unwrap_or_default(),
        features: state.config().features,
    })
}

/// Where to redirect after a request form.
#[derive(Debug, Deserialize)]
pub struct ReturnForm {
    #[serde(default)]
    pub return_to: String,
}

/// Resolve a submitted return path, falling back to the directory.
fn return_path(requested: &str) -> &'static str {
    RETURN_PATHS
        .into_iter()
        .find(|path| *path == requested)
        .unwrap_or("/")
}

/// Cancel a request.
///
/// Cancelling an unknown id, or another requester's request, is a no-op.
#[instrument(skip(state, form))]
pub async fn cancel(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Form(form): Form<ReturnForm>,
) -> Result<Redirect> {
    if !state.config().features.allow_cancel {
        return Err(AppError::NotFound("request cancellation is disabled".to_string()));
    }

    let id = RequestId::new(id);
    let cancelled = state
        .with_requests(move |requests, requester| requests.cancel_own(id, requester))
        .await??;
    if cancelled {
        tracing::info!(request_id = %id, "Request cancelled");
    }

    Ok(Redirect::to(return_path(&form.return_to)))
}

/// Status update form data.
#[derive(Debug, Deserialize)]
pub struct StatusForm {
    pub status: String,
    #[serde(default)]
    pub return_to: String,
}

/// Change the status of a request.
///
/// Another requester's request is left unchanged.
#[instrument(skip(state, form))]
pub async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Form(form): Form<StatusForm>,
) -> Result<Redirect> {
    let status: RequestStatus = form.status.parse().map_err(AppError::BadRequest)?;
    let id = RequestId::new(id);

    let updated = state
        .with_requests(move |requests, requester| {
            requests.update_own_status(id, requester, status)
        })
        .await??;
    if updated {
        tracing::info!(request_id = %id, %status, "Request status updated");
    } else {
        tracing::debug!(request_id = %id, "Status update for unknown or foreign request");
    }

    let return_to = if form.return_to.is_empty() {
        "/requests"
    } else {
        return_path(&form.return_to)
    };
    Ok(Redirect::to(return_to))
}
