//! Request management commands.
//!
//! These share the request file with the web server, so a request made here
//! shows up as "Request Sent" in the browser and vice versa.

use donor_finder_core::{
    DonorId, Email, KeyValueStore, Request, RequestId, RequestService, RequestStatus,
    StorageError, assign_donor_meta,
};
use donor_finder_web::directory::{DirectoryError, DonorSource};
use thiserror::Error;

/// Errors that can occur during request operations.
#[derive(Debug, Error)]
pub enum RequestsError {
    /// The user list could not be fetched.
    #[error(transparent)]
    Directory(#[from] DirectoryError),

    /// The request file could not be written.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// No donor has this id.
    #[error("Donor not found: {0}")]
    DonorNotFound(DonorId),
}

/// One line of request output.
#[must_use]
pub fn format_request(request: &Request) -> String {
    format!(
        "{} {} ({}, {}) {} [{}]",
        request.id,
        request.name,
        request.blood_group,
        request.city,
        request.date,
        request.status
    )
}

/// Request help from the donor with `donor_id`.
///
/// Returns the stored request, or `None` if the donor is unavailable or
/// already requested by `requester`.
///
/// # Errors
///
/// Returns `RequestsError` if the directory cannot be fetched, the donor does
/// not exist or the request file cannot be written.
pub async fn request<D: DonorSource, S: KeyValueStore>(
    source: &D,
    service: &RequestService<S>,
    donor_id: DonorId,
    requester: Option<&Email>,
) -> Result<Option<Request>, RequestsError> {
    let donors = assign_donor_meta(&source.fetch_users().await?);
    let donor = donors
        .iter()
        .find(|donor| donor.id == donor_id)
        .ok_or(RequestsError::DonorNotFound(donor_id))?;

    let created = service.submit(donor, requester)?;
    match &created {
        Some(request) => tracing::info!("Request sent: {}", format_request(request)),
        None if !donor.available => tracing::warn!("{} is not available", donor.name),
        None => tracing::warn!("{} already has an open request", donor.name),
    }

    Ok(created)
}

/// Cancel the request with `id`.
///
/// # Errors
///
/// Returns `StorageError` if the request file cannot be written.
pub fn cancel<S: KeyValueStore>(
    service: &RequestService<S>,
    id: RequestId,
) -> Result<bool, StorageError> {
    let removed = service.cancel(id)?;
    if removed {
        tracing::info!("Request {id} cancelled");
    } else {
        tracing::warn!("No request with id {id}");
    }
    Ok(removed)
}

/// Log the stored requests, optionally only those from `requester`.
pub fn list<S: KeyValueStore>(
    service: &RequestService<S>,
    requester: Option<&Email>,
) -> Vec<Request> {
    let requests = service.list(requester);
    if requests.is_empty() {
        tracing::info!("No requests sent yet.");
    }
    for request in &requests {
        tracing::info!("{}", format_request(request));
    }
    requests
}

/// Change the status of the request with `id`.
///
/// # Errors
///
/// Returns `StorageError` if the request file cannot be written.
pub fn update_status<S: KeyValueStore>(
    service: &RequestService<S>,
    id: RequestId,
    status: RequestStatus,
) -> Result<bool, StorageError> {
    let updated = service.update_status(id, status)?;
    if updated {
        tracing::info!("Request {id} is now {status}");
    } else {
        tracing::warn!("No request with id {id}");
    }
    Ok(updated)
}
