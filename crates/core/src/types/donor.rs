//! Upstream user records and the donors derived from them.

use serde::{Deserialize, Serialize};

use super::attributes::{BloodGroup, City};
use super::id::DonorId;

/// A user record as returned by the mock-data endpoint.
///
/// Only `id` and `name` are required. Everything else the endpoint sends
/// (address, company, ...) is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawUser {
    pub id: DonorId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl RawUser {
    /// Create a user with only the required fields.
    #[must_use]
    pub fn new(id: impl Into<DonorId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            username: None,
            email: None,
            phone: None,
        }
    }
}

/// A user decorated with synthetic donor attributes.
///
/// Built once by [`crate::assign_donor_meta`] and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Donor {
    pub id: DonorId,
    pub name: String,
    pub blood_group: BloodGroup,
    pub city: City,
    pub available: bool,
    pub avatar_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_user_ignores_extra_fields() {
        let json = r#"{
            "id": 1,
            "name": "Leanne Graham",
            "username": "Bret",
            "email": "Sincere@april.biz",
            "address": { "city": "Gwenborough" },
            "company": { "name": "Romaguera-Crona" }
        }"#;

        let user: RawUser = serde_json::from_str(json).unwrap();
        assert_eq!(user.id, DonorId::new(1));
        assert_eq!(user.name, "Leanne Graham");
        assert_eq!(user.email.as_deref(), Some("Sincere@april.biz"));
        assert!(user.phone.is_none());
    }

    #[test]
    fn test_raw_user_requires_name() {
        assert!(serde_json::from_str::<RawUser>(r#"{"id": 3}"#).is_err());
    }
}
