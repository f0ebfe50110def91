//! Persisted help request record.

use serde::{Deserialize, Serialize};

use super::attributes::{BloodGroup, City};
use super::donor::Donor;
use super::email::Email;
use super::id::{DonorId, RequestId};
use super::status::RequestStatus;

/// A visitor's request for help from one donor.
///
/// The donor's name, blood group and city are copied in at creation time so
/// the request list renders on its own, even if the donor later disappears
/// from the fetched directory.
///
/// ## Wire format
///
/// ```json
/// {"id": 1718000000000, "donorId": 1, "name": "Leanne Graham",
///  "bloodGroup": "A+", "city": "Chennai", "status": "pending",
///  "date": "6/10/2024, 9:13:20 AM", "requesterEmail": "me@example.com"}
/// ```
///
/// `requesterEmail` is omitted when the request was made anonymously.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    pub id: RequestId,
    pub donor_id: DonorId,
    pub name: String,
    pub blood_group: BloodGroup,
    pub city: City,
    pub status: RequestStatus,
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requester_email: Option<Email>,
}

impl Request {
    /// Build a pending request snapshotting the donor's details.
    #[must_use]
    pub fn pending(
        id: RequestId,
        donor: &Donor,
        date: String,
        requester_email: Option<Email>,
    ) -> Self {
        Self {
            id,
            donor_id: donor.id,
            name: donor.name.clone(),
            blood_group: donor.blood_group,
            city: donor.city,
            status: RequestStatus::Pending,
            date,
            requester_email,
        }
    }

    /// Whether this request was made by `requester` (`None` = anonymous).
    #[must_use]
    pub fn is_from(&self, requester: Option<&Email>) -> bool {
        self.requester_email.as_ref() == requester
    }

    /// Date part of the creation timestamp, e.g. `"6/10/2024"`.
    #[must_use]
    pub fn date_only(&self) -> &str {
        self.date
            .split_once(',')
            .map_or(self.date.as_str(), |(date, _)| date)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sample() -> Request {
        Request {
            id: RequestId::new(1_718_000_000_000),
            donor_id: DonorId::new(1),
            name: "Leanne Graham".to_string(),
            blood_group: BloodGroup::APositive,
            city: City::Chennai,
            status: RequestStatus::Pending,
            date: "6/10/2024, 9:13:20 AM".to_string(),
            requester_email: None,
        }
    }

    #[test]
    fn test_wire_format_omits_missing_requester() {
        let value = serde_json::to_value(sample()).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "id": 1_718_000_000_000_i64,
                "donorId": 1,
                "name": "Leanne Graham",
                "bloodGroup": "A+",
                "city": "Chennai",
                "status": "pending",
                "date": "6/10/2024, 9:13:20 AM"
            })
        );
    }

    #[test]
    fn test_wire_format_reads_requester_email() {
        let json = r#"{"id": 5, "donorId": 2, "name": "Ervin Howell",
            "bloodGroup": "O-", "city": "Delhi", "status": "accepted",
            "date": "1/2/2025, 3:04:05 PM", "requesterEmail": "user@email.com"}"#;

        let request: Request = serde_json::from_str(json).unwrap();
        assert_eq!(request.status, RequestStatus::Accepted);
        assert_eq!(
            request.requester_email.as_ref().map(Email::as_str),
            Some("user@email.com")
        );
    }

    #[test]
    fn test_is_from() {
        let mut request = sample();
        assert!(request.is_from(None));

        let email = Email::parse("user@email.com").unwrap();
        request.requester_email = Some(email.clone());
        assert!(request.is_from(Some(&email)));
        assert!(!request.is_from(None));
    }

    #[test]
    fn test_date_only() {
        assert_eq!(sample().date_only(), "6/10/2024");

        let mut request = sample();
        request.date = "yesterday".to_string();
        assert_eq!(request.date_only(), "yesterday");
    }
}
