//! Donor listing command.

use donor_finder_core::{
    BloodGroup, City, Donor, DonorQuery, Selection, assign_donor_meta, available_count,
    derive_display_list,
};
use donor_finder_web::directory::{DirectoryError, DonorSource};

/// Build the query for the given flags.
///
/// Passing any filter counts as a search.
#[must_use]
pub fn query_for(blood_group: Option<BloodGroup>, city: Option<City>, sort: bool) -> DonorQuery {
    let query = if blood_group.is_some() || city.is_some() {
        DonorQuery::search(Selection::from(blood_group), Selection::from(city))
    } else {
        DonorQuery::default()
    };
    query.sorted(sort)
}

/// One line of donor output.
#[must_use]
pub fn format_donor(donor: &Donor) -> String {
    format!(
        "#{:<3} {:<26} {:<4} {:<10} {}",
        donor.id,
        donor.name,
        donor.blood_group,
        donor.city,
        if donor.available {
            "available"
        } else {
            "unavailable"
        }
    )
}

/// Fetch the directory and log the matching donors.
///
/// # Errors
///
/// Returns `DirectoryError` if the user list cannot be fetched.
pub async fn list<S: DonorSource>(
    source: &S,
    blood_group: Option<BloodGroup>,
    city: Option<City>,
    sort: bool,
) -> Result<Vec<Donor>, DirectoryError> {
    let donors = assign_donor_meta(&source.fetch_users().await?);
    let shown = derive_display_list(&donors, &query_for(blood_group, city, sort));

    tracing::info!(
        "{} donors ({} available overall)",
        shown.len(),
        available_count(&donors)
    );
    if shown.is_empty() {
        tracing::info!("No donors found");
    }
    for donor in &shown {
        tracing::info!("{}", format_donor(donor));
    }

    Ok(shown)
}
