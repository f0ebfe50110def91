//! Derivation of the displayed donor list.
//!
//! The directory never filters in place. Every render derives a fresh list
//! from the full donor list and the visitor's [`DonorQuery`].

use serde::{Deserialize, Serialize};

use crate::types::{BloodGroup, City, Donor, Selection};

/// What the visitor asked to see.
///
/// `blood_group` and `city` are the *applied* filters, frozen when the
/// visitor last pressed "Search". They are ignored until `searched` is set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DonorQuery {
    pub blood_group: Selection<BloodGroup>,
    pub city: Selection<City>,
    pub sort_by_availability: bool,
    pub searched: bool,
}

impl DonorQuery {
    /// A searched query with the given filters and no sorting.
    #[must_use]
    pub const fn search(blood_group: Selection<BloodGroup>, city: Selection<City>) -> Self {
        Self {
            blood_group,
            city,
            sort_by_availability: false,
            searched: true,
        }
    }

    /// Same query with the sort-by-availability flag set to `sort`.
    #[must_use]
    pub const fn sorted(mut self, sort: bool) -> Self {
        self.sort_by_availability = sort;
        self
    }

    fn admits(&self, donor: &Donor) -> bool {
        !self.searched
            || (self.blood_group.matches(&donor.blood_group) && self.city.matches(&donor.city))
    }
}

/// Compute the donors to display for `query`.
///
/// Filters narrow the list only after a search. With the sort flag set,
/// available donors move ahead of unavailable ones while keeping their
/// relative order (stable sort). The input slice is left untouched.
#[must_use]
pub fn derive_display_list(donors: &[Donor], query: &DonorQuery) -> Vec<Donor> {
    let mut list: Vec<Donor> = donors
        .iter()
        .filter(|donor| query.admits(donor))
        .cloned()
        .collect();

    if query.sort_by_availability {
        list.sort_by_key(|donor| !donor.available);
    }

    list
}

/// Number of available donors in `donors`.
#[must_use]
pub fn available_count(donors: &[Donor]) -> usize {
    donors.iter().filter(|donor| donor.available).count()
}
