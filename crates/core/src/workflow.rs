//! Request workflow: submit, cancel, list and update help requests.
//!
//! Every operation is a read-modify-write of the whole list through the
//! [`RequestStore`]. Operations whose precondition fails are no-ops and do
//! not touch the store.

use std::collections::HashSet;

use chrono::{DateTime, Local, TimeZone};

use crate::storage::{KeyValueStore, RequestStore, StorageError};
use crate::types::{Donor, DonorId, Email, Request, RequestId, RequestStatus};

/// Display format for the request creation time, e.g. `6/10/2024, 9:13:20 AM`.
pub const DATE_FORMAT: &str = "%-m/%-d/%Y, %-I:%M:%S %p";

/// Request operations over an injected store.
#[derive(Debug, Clone)]
pub struct RequestService<S> {
    requests: RequestStore<S>,
}

impl<S: KeyValueStore> RequestService<S> {
    /// Create a service over an already-bound request store.
    pub const fn new(requests: RequestStore<S>) -> Self {
        Self { requests }
    }

    /// The underlying request store.
    pub const fn store(&self) -> &RequestStore<S> {
        &self.requests
    }

    /// Request help from `donor` at the current local time.
    ///
    /// See [`Self::submit_at`].
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the updated list cannot be saved.
    pub fn submit(
        &self,
        donor: &Donor,
        requester: Option<&Email>,
    ) -> Result<Option<Request>, StorageError> {
        self.submit_at(donor, requester, Local::now())
    }

    /// Request help from `donor` as `requester`, stamped with `now`.
    ///
    /// Returns `Ok(None)` without writing anything when the donor is
    /// unavailable or already has an active request from the same requester.
    /// Otherwise appends a pending request and returns it.
    ///
    /// The id is `now` in Unix milliseconds, bumped past the largest stored id
    /// when two requests land in the same millisecond. It never collides with
    /// a stored id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the updated list cannot be saved.
    pub fn submit_at<Tz: TimeZone>(
        &self,
        donor: &Donor,
        requester: Option<&Email>,
        now: DateTime<Tz>,
    ) -> Result<Option<Request>, StorageError>
    where
        Tz::Offset: std::fmt::Display,
    {
        if !donor.available {
            return Ok(None);
        }

        let mut all = self.requests.load();
        if has_active(&all, donor.id, requester) {
            return Ok(None);
        }

        let now_ms = now.timestamp_millis();
        let taken: HashSet<i64> = all.iter().map(|r| r.id.as_i64()).collect();
        let mut next_id = taken
            .iter()
            .max()
            .and_then(|max| max.checked_add(1))
            .map_or(now_ms, |floor| floor.max(now_ms));
        // Only reachable when the largest stored id is i64::MAX
        while taken.contains(&next_id) {
            next_id = next_id.wrapping_add(1);
        }

        let request = Request::pending(
            RequestId::new(next_id),
            donor,
            now.format(DATE_FORMAT).to_string(),
            requester.cloned(),
        );
        all.push(request.clone());
        self.requests.save(&all)?;

        Ok(Some(request))
    }

    /// Remove the request with `id`.
    ///
    /// Returns `false` (and writes nothing) if no such request exists.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the updated list cannot be saved.
    pub fn cancel(&self, id: RequestId) -> Result<bool, StorageError> {
        self.cancel_matching(|r| r.id == id)
    }

    /// Remove the request with `id` if it was made by `requester`.
    ///
    /// Another requester's request is left alone, as if it did not exist.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the updated list cannot be saved.
    pub fn cancel_own(
        &self,
        id: RequestId,
        requester: Option<&Email>,
    ) -> Result<bool, StorageError> {
        self.cancel_matching(|r| r.id == id && r.is_from(requester))
    }

    fn cancel_matching(&self, matches: impl Fn(&Request) -> bool) -> Result<bool, StorageError> {
        let mut all = self.requests.load();
        let before = all.len();
        all.retain(|r| !matches(r));
        if all.len() == before {
            return Ok(false);
        }

        self.requests.save(&all)?;
        Ok(true)
    }

    /// All requests in insertion order, optionally limited to one requester.
    #[must_use]
    pub fn list(&self, requester: Option<&Email>) -> Vec<Request> {
        let all = self.requests.load();
        match requester {
            Some(email) => all.into_iter().filter(|r| r.is_from(Some(email))).collect(),
            None => all,
        }
    }

    /// Requests made by exactly `requester`, in insertion order.
    ///
    /// Unlike [`Self::list`], `None` means "anonymous requests only". This is
    /// the same set [`Self::requested_donors`] looks at.
    #[must_use]
    pub fn list_own(&self, requester: Option<&Email>) -> Vec<Request> {
        self.requests
            .load()
            .into_iter()
            .filter(|r| r.is_from(requester))
            .collect()
    }

    /// Look up a single request.
    #[must_use]
    pub fn get(&self, id: RequestId) -> Option<Request> {
        self.requests.load().into_iter().find(|r| r.id == id)
    }

    /// Set the status of the request with `id`.
    ///
    /// Returns `false` (and writes nothing) if no such request exists.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the updated list cannot be saved.
    pub fn update_status(&self, id: RequestId, status: RequestStatus) -> Result<bool, StorageError> {
        self.update_status_matching(status, |r| r.id == id)
    }

    /// Set the status of the request with `id` if it was made by `requester`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the updated list cannot be saved.
    pub fn update_own_status(
        &self,
        id: RequestId,
        requester: Option<&Email>,
        status: RequestStatus,
    ) -> Result<bool, StorageError> {
        self.update_status_matching(status, |r| r.id == id && r.is_from(requester))
    }

    fn update_status_matching(
        &self,
        status: RequestStatus,
        matches: impl Fn(&Request) -> bool,
    ) -> Result<bool, StorageError> {
        let mut all = self.requests.load();
        let Some(request) = all.iter_mut().find(|r| matches(r)) else {
            return Ok(false);
        };

        request.status = status;
        self.requests.save(&all)?;
        Ok(true)
    }

    /// Donors that `requester` currently has an active request with.
    #[must_use]
    pub fn requested_donors(&self, requester: Option<&Email>) -> HashSet<DonorId> {
        self.requests
            .load()
            .iter()
            .filter(|r| r.status.is_active() && r.is_from(requester))
            .map(|r| r.donor_id)
            .collect()
    }
}

fn has_active(all: &[Request], donor_id: DonorId, requester: Option<&Email>) -> bool {
    all.iter()
        .any(|r| r.donor_id == donor_id && r.status.is_active() && r.is_from(requester))
}
