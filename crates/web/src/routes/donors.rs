//! Donor directory route handlers.
//!
//! The directory page combines the donor grid, the filter bar and the
//! "My Requests" panel. Filter and sort choices live in the visitor's session
//! (see [`DirectoryView`]); the donor list itself is shared by everyone.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    response::Redirect,
};
use donor_finder_core::{
    ALL_LABEL, BloodGroup, City, Donor, DonorId, DonorQuery, Selection, available_count,
    derive_display_list,
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::config::FeatureFlags;
use crate::error::{AppError, Result};
use crate::filters;
use crate::models::DirectoryView;
use crate::routes::requests::RequestCardView;
use crate::state::AppState;

/// One entry of a `<select>` element.
#[derive(Clone)]
pub struct OptionView {
    pub label: &'static str,
    pub selected: bool,
}

/// Dropdown options for a filter, led by the "All" sentinel.
pub fn filter_options<T: Copy + PartialEq>(
    values: &[T],
    label: fn(T) -> &'static str,
    current: Selection<T>,
) -> Vec<OptionView> {
    std::iter::once(OptionView {
        label: ALL_LABEL,
        selected: current == Selection::All,
    })
    .chain(values.iter().map(|&value| OptionView {
        label: label(value),
        selected: current == Selection::Only(value),
    }))
    .collect()
}

/// Donor card display data for templates.
#[derive(Clone)]
pub struct DonorCardView {
    pub id: i64,
    pub name: String,
    pub city: &'static str,
    pub blood_group: &'static str,
    pub badge_class: &'static str,
    pub available: bool,
    pub requested: bool,
    pub avatar_url: String,
    /// Contact email, empty when the upstream record has none.
    pub email: String,
}

impl DonorCardView {
    fn new(donor: &Donor, requested: bool) -> Self {
        Self {
            id: donor.id.as_i64(),
            name: donor.name.clone(),
            city: donor.city.as_str(),
            blood_group: donor.blood_group.as_str(),
            badge_class: donor.blood_group.slug(),
            available: donor.available,
            requested,
            avatar_url: donor.avatar_url.clone(),
            email: donor.email.clone().unwrap_or_default(),
        }
    }
}

/// "3 donors" / "1 donor".
fn donor_count_label(count: usize) -> String {
    if count == 1 {
        "1 donor".to_string()
    } else {
        format!("{count} donors")
    }
}

/// Directory page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/directory.html")]
pub struct DirectoryTemplate {
    pub loading: bool,
    pub donors: Vec<DonorCardView>,
    pub donor_count_label: String,
    pub available_count: usize,
    pub blood_groups: Vec<OptionView>,
    pub cities: Vec<OptionView>,
    pub searched: bool,
    pub sort_by_availability: bool,
    pub features: FeatureFlags,
    pub requests: Vec<RequestCardView>,
}

/// Display the donor directory.
#[instrument(skip(state, session))]
pub async fn index(State(state): State<AppState>, session: Session) -> Result<DirectoryTemplate> {
    let view = DirectoryView::load(&session).await?;
    let features = state.config().features;
    let query = view
        .query
        .sorted(view.query.sort_by_availability && features.show_sort);

    // The panel lists the same requests that mark donors as requested
    let (requested, own) = state
        .with_requests(|requests, requester| {
            (
                requests.requested_donors(requester),
                requests.list_own(requester),
            )
        })
        .await?;

    let (loading, donors, available) = match state.donors().await {
        None => (true, Vec::new(), 0),
        Some(all) => {
            let shown = derive_display_list(&all, &query)
                .iter()
                .map(|donor| DonorCardView::new(donor, requested.contains(&donor.id)))
                .collect();
            (false, shown, available_count(&all))
        }
    };

    let requests = own.iter().map(RequestCardView::from).collect();

    Ok(DirectoryTemplate {
        loading,
        donor_count_label: donor_count_label(donors.len()),
        donors,
        available_count: available,
        blood_groups: filter_options(&BloodGroup::ALL, BloodGroup::as_str, query.blood_group),
        cities: filter_options(&City::ALL, City::as_str, query.city),
        searched: query.searched,
        sort_by_availability: query.sort_by_availability,
        features,
        requests,
    })
}

/// Search form data.
///
/// Missing fields count as "All".
#[derive(Debug, Deserialize)]
pub struct SearchForm {
    #[serde(default)]
    pub blood_group: String,
    #[serde(default)]
    pub city: String,
}

/// Apply the submitted dropdown values as the visitor's filter.
#[instrument(skip(session))]
pub async fn search(session: Session, Form(form): Form<SearchForm>) -> Result<Redirect> {
    let blood_group: Selection<BloodGroup> = form.blood_group.parse()?;
    let city: Selection<City> = form.city.parse()?;

    let mut view = DirectoryView::load(&session).await?;
    view.query = DonorQuery::search(blood_group, city).sorted(view.query.sort_by_availability);
    view.save(&session).await?;

    tracing::debug!(%blood_group, %city, "Filter applied");
    Ok(Redirect::to("/"))
}

/// Reset both filters and leave search mode.
///
/// The sort flag is kept.
#[instrument(skip(session))]
pub async fn clear(session: Session) -> Result<Redirect> {
    let mut view = DirectoryView::load(&session).await?;
    view.query = DonorQuery::default().sorted(view.query.sort_by_availability);
    view.save(&session).await?;
    Ok(Redirect::to("/"))
}

/// Sort toggle form data.
#[derive(Debug, Deserialize)]
pub struct SortForm {
    #[serde(default)]
    pub sort: bool,
}

/// Turn sort-by-availability on or off.
#[instrument(skip(state, session))]
pub async fn sort(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<SortForm>,
) -> Result<Redirect> {
    if !state.config().features.show_sort {
        return Err(AppError::NotFound("sorting is disabled".to_string()));
    }

    let mut view = DirectoryView::load(&session).await?;
    view.query = view.query.sorted(form.sort);
    view.save(&session).await?;
    Ok(Redirect::to("/"))
}

/// Request help from a donor.
///
/// Unavailable donors and donors this requester already has an active
/// request with are silently skipped.
#[instrument(skip(state))]
pub async fn request_help(State(state): State<AppState>, Path(id): Path<i64>) -> Result<Redirect> {
    let donor_id = DonorId::new(id);
    let donors = state
        .donors()
        .await
        .ok_or_else(|| AppError::NotFound("donor directory is still loading".to_string()))?;
    let donor = donors
        .iter()
        .find(|donor| donor.id == donor_id)
        .cloned()
        .ok_or_else(|| AppError::NotFound(format!("donor {donor_id}")))?;

    match state
        .with_requests(move |requests, requester| requests.submit(&donor, requester))
        .await??
    {
        Some(request) => {
            tracing::info!(request_id = %request.id, %donor_id, "Help request sent");
        }
        None => {
            tracing::debug!(%donor_id, "Help request skipped");
        }
    }

    Ok(Redirect::to("/"))
}
