//! Municipal geographic keys.

use std::fmt;

use crate::entity::EntityId;

/// Concatenated INEGI municipality key: two-digit entity code followed by
/// the three-digit municipality code (`"01001"` for Aguascalientes,
/// Aguascalientes). Matches the `CVEGEO` property of the municipal
/// GeoJSON and the key column of the municipal population table.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Cve(String);

impl Cve {
    /// Build a key from raw entity and municipality codes. Values are
    /// zero-padded, never truncated; negative codes are rejected.
    pub fn from_codes(entity: i64, municipality: i64) -> Option<Self> {
        if entity < 0 || municipality < 0 {
            return None;
        }
        Some(Self(format!("{entity:02}{municipality:03}")))
    }

    /// Parse an already-concatenated key, zero-padding short ones.
    pub fn from_key(key: &str) -> Option<Self> {
        let trimmed = key.trim();
        if trimmed.is_empty() || !trimmed.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        if trimmed.len() >= 5 {
            Some(Self(trimmed.to_string()))
        } else {
            Some(Self(format!("{trimmed:0>5}")))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Entity portion of the key.
    pub fn entity(&self) -> Option<EntityId> {
        let digits = self.0.get(..2)?;
        digits.parse::<i64>().ok().and_then(EntityId::from_code)
    }
}

impl fmt::Display for Cve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_zero_padded() {
        assert_eq!(Cve::from_codes(1, 1).unwrap().as_str(), "01001");
        assert_eq!(Cve::from_codes(9, 17).unwrap().as_str(), "09017");
        assert_eq!(Cve::from_codes(30, 131).unwrap().as_str(), "30131");
        assert_eq!(Cve::from_codes(-1, 3), None);
    }

    #[test]
    fn keys_parse_and_pad() {
        assert_eq!(Cve::from_key("1001").unwrap().as_str(), "01001");
        assert_eq!(Cve::from_key("30131").unwrap().as_str(), "30131");
        assert_eq!(Cve::from_key("abc"), None);
        assert_eq!(Cve::from_key(""), None);
    }

    #[test]
    fn entity_portion_resolves() {
        let cve = Cve::from_codes(14, 39).unwrap();
        assert_eq!(cve.entity().unwrap().name(), Some("Jalisco"));
    }
}
