//! Deterministic donor metadata assignment.
//!
//! The mock user list carries no medical data, so each user is given a blood
//! group, city and availability purely from their position in the list:
//!
//! | Attribute   | Rule for index `i`                    |
//! |-------------|---------------------------------------|
//! | blood group | `BloodGroup::ALL[i % 8]`              |
//! | city        | `City::ALL[(i * 7 + 3) % 5]`          |
//! | available   | `i % 3 != 2`                          |
//!
//! Assignments are stable only as long as the upstream list order is.

use crate::types::{BloodGroup, City, Donor, RawUser};

const AVATAR_BASE_URL: &str = "https://api.dicebear.com/7.x/personas/svg";
const AVATAR_BACKGROUNDS: &str = "b6e3f4,c0aede,d1d4f9,ffd5dc,ffdfbf";

/// Decorate every user with synthetic donor attributes.
///
/// Pure and total: the same input always yields the same output, and any
/// finite list (including an empty one) is accepted.
#[must_use]
pub fn assign_donor_meta(users: &[RawUser]) -> Vec<Donor> {
    users
        .iter()
        .enumerate()
        .map(|(index, user)| Donor {
            id: user.id,
            name: user.name.clone(),
            blood_group: blood_group_for(index),
            city: city_for(index),
            available: is_available(index),
            avatar_url: avatar_url(&user.name),
            email: user.email.clone(),
            phone: user.phone.clone(),
        })
        .collect()
}

/// Blood group for the donor at `index`.
#[must_use]
#[allow(clippy::indexing_slicing)] // modulo keeps the index in bounds
pub const fn blood_group_for(index: usize) -> BloodGroup {
    BloodGroup::ALL[index % BloodGroup::ALL.len()]
}

/// City for the donor at `index`.
#[must_use]
#[allow(clippy::indexing_slicing)] // modulo keeps the index in bounds
pub const fn city_for(index: usize) -> City {
    City::ALL[(index.wrapping_mul(7).wrapping_add(3)) % City::ALL.len()]
}

/// Every third donor (index 2, 5, 8, ...) is unavailable.
#[must_use]
pub const fn is_available(index: usize) -> bool {
    index % 3 != 2
}

/// Avatar image URL seeded by the donor's name.
#[must_use]
pub fn avatar_url(name: &str) -> String {
    format!(
        "{AVATAR_BASE_URL}?seed={}&backgroundColor={AVATAR_BACKGROUNDS}",
        urlencoding::encode(name)
    )
}
