//! Synthetic donor attributes: blood group, city, and filter selections.
//!
//! Both enumerations are fixed and ordered. The order matters: metadata
//! assignment indexes into [`BloodGroup::ALL`] and [`City::ALL`], so reordering
//! a variant changes which donor gets which attribute.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// Label of the "no filter" option in both dropdowns.
pub const ALL_LABEL: &str = "All";

/// Error returned when a string is not a known attribute value.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseAttributeError {
    #[error("unknown blood group: {0}")]
    BloodGroup(String),
    #[error("unknown city: {0}")]
    City(String),
}

/// ABO/Rh blood group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BloodGroup {
    #[serde(rename = "A+")]
    APositive,
    #[serde(rename = "A-")]
    ANegative,
    #[serde(rename = "B+")]
    BPositive,
    #[serde(rename = "B-")]
    BNegative,
    #[serde(rename = "O+")]
    OPositive,
    #[serde(rename = "O-")]
    ONegative,
    #[serde(rename = "AB+")]
    AbPositive,
    #[serde(rename = "AB-")]
    AbNegative,
}

impl BloodGroup {
    /// All blood groups in assignment order.
    pub const ALL: [Self; 8] = [
        Self::APositive,
        Self::ANegative,
        Self::BPositive,
        Self::BNegative,
        Self::OPositive,
        Self::ONegative,
        Self::AbPositive,
        Self::AbNegative,
    ];

    /// Display label, e.g. `"AB-"`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::APositive => "A+",
            Self::ANegative => "A-",
            Self::BPositive => "B+",
            Self::BNegative => "B-",
            Self::OPositive => "O+",
            Self::ONegative => "O-",
            Self::AbPositive => "AB+",
            Self::AbNegative => "AB-",
        }
    }

    /// Lowercase ASCII slug, e.g. `"ab-neg"`, used for CSS classes.
    #[must_use]
    pub const fn slug(self) -> &'static str {
        match self {
            Self::APositive => "a-pos",
            Self::ANegative => "a-neg",
            Self::BPositive => "b-pos",
            Self::BNegative => "b-neg",
            Self::OPositive => "o-pos",
            Self::ONegative => "o-neg",
            Self::AbPositive => "ab-pos",
            Self::AbNegative => "ab-neg",
        }
    }
}

impl fmt::Display for BloodGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BloodGroup {
    type Err = ParseAttributeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|group| group.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseAttributeError::BloodGroup(s.to_string()))
    }
}

/// City a donor is listed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum City {
    Mumbai,
    Delhi,
    Bangalore,
    Chennai,
    Hyderabad,
}

impl City {
    /// All cities in assignment order.
    pub const ALL: [Self; 5] = [
        Self::Mumbai,
        Self::Delhi,
        Self::Bangalore,
        Self::Chennai,
        Self::Hyderabad,
    ];

    /// Display label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Mumbai => "Mumbai",
            Self::Delhi => "Delhi",
            Self::Bangalore => "Bangalore",
            Self::Chennai => "Chennai",
            Self::Hyderabad => "Hyderabad",
        }
    }
}

impl fmt::Display for City {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for City {
    type Err = ParseAttributeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|city| city.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseAttributeError::City(s.to_string()))
    }
}

/// A dropdown value: either the `"All"` sentinel or one concrete value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Selection<T> {
    All,
    Only(T),
}

impl<T> Default for Selection<T> {
    fn default() -> Self {
        Self::All
    }
}

impl<T: PartialEq> Selection<T> {
    /// Whether `value` passes this selection. `All` passes everything.
    pub fn matches(&self, value: &T) -> bool {
        match self {
            Self::All => true,
            Self::Only(expected) => expected == value,
        }
    }
}

impl<T: fmt::Display> fmt::Display for Selection<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str(ALL_LABEL),
            Self::Only(value) => value.fmt(f),
        }
    }
}

impl<T: FromStr> FromStr for Selection<T> {
    type Err = T::Err;

    /// Parses `"All"` (any case) or an empty string as [`Selection::All`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(ALL_LABEL) {
            return Ok(Self::All);
        }
        trimmed.parse().map(Self::Only)
    }
}

impl<T> From<Option<T>> for Selection<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::All, Self::Only)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_blood_group_order() {
        let labels: Vec<_> = BloodGroup::ALL.iter().map(|g| g.as_str()).collect();
        assert_eq!(labels, ["A+", "A-", "B+", "B-", "O+", "O-", "AB+", "AB-"]);
    }

    #[test]
    fn test_blood_group_parse() {
        assert_eq!("O+".parse::<BloodGroup>().unwrap(), BloodGroup::OPositive);
        assert_eq!("ab-".parse::<BloodGroup>().unwrap(), BloodGroup::AbNegative);
        assert!(matches!(
            "C+".parse::<BloodGroup>(),
            Err(ParseAttributeError::BloodGroup(_))
        ));
    }

    #[test]
    fn test_blood_group_serde_uses_labels() {
        let json = serde_json::to_string(&BloodGroup::AbPositive).unwrap();
        assert_eq!(json, "\"AB+\"");
        let parsed: BloodGroup = serde_json::from_str("\"B-\"").unwrap();
        assert_eq!(parsed, BloodGroup::BNegative);
    }

    #[test]
    fn test_city_parse() {
        assert_eq!("Chennai".parse::<City>().unwrap(), City::Chennai);
        assert!("Pune".parse::<City>().is_err());
    }

    #[test]
    fn test_selection_parse() {
        assert_eq!("All".parse::<Selection<City>>().unwrap(), Selection::All);
        assert_eq!("".parse::<Selection<City>>().unwrap(), Selection::All);
        assert_eq!(
            "Delhi".parse::<Selection<City>>().unwrap(),
            Selection::Only(City::Delhi)
        );
        assert!("Nowhere".parse::<Selection<City>>().is_err());
    }

    #[test]
    fn test_selection_matches() {
        let all: Selection<BloodGroup> = Selection::All;
        assert!(all.matches(&BloodGroup::ONegative));

        let only = Selection::Only(BloodGroup::OPositive);
        assert!(only.matches(&BloodGroup::OPositive));
        assert!(!only.matches(&BloodGroup::ONegative));
    }

    #[test]
    fn test_selection_display() {
        assert_eq!(Selection::<City>::All.to_string(), "All");
        assert_eq!(Selection::Only(BloodGroup::APositive).to_string(), "A+");
    }
}
