//! Status bitsets and caller-defined named flags.
//!
//! A [`Status`] is an opaque bitmask. The engine never interprets individual
//! bits; it only ORs them together. Meaning is attached by the caller through a
//! [`StatusCatalog`], an ordered set of named single-bit flags.

use std::fmt;
use std::ops::{BitAnd, BitOr, BitOrAssign};

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::error::{Result, StatusError};

/// A set of status bits.
///
/// `Status::EMPTY` doubles as "no status": a record carrying it is invalid and
/// is ignored during resolution.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Status(u32);

impl Status {
    pub const EMPTY: Self = Self(0);

    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// True when every bit of `other` is also set in `self`.
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    /// True when exactly one bit is set.
    pub const fn is_single_flag(self) -> bool {
        self.0.count_ones() == 1
    }
}

impl BitOr for Status {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for Status {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for Status {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

impl From<u32> for Status {
    fn from(bits: u32) -> Self {
        Self(bits)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#b}", self.0)
    }
}

// ── StatusCatalog ───────────────────────────────────────────────────────────

/// An ordered set of named single-bit status flags.
///
/// Names are matched case-insensitively. Each name and each bit may appear at
/// most once.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "serde_json::Map<String, serde_json::Value>")]
pub struct StatusCatalog {
    entries: Vec<(String, Status)>,
}

impl StatusCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a named flag.
    ///
    /// # Errors
    ///
    /// Returns [`StatusError::InvalidStatusFlag`] if `status` does not have
    /// exactly one bit set, or [`StatusError::DuplicateStatus`] if the name or
    /// the bit is already registered.
    pub fn insert(&mut self, name: &str, status: Status) -> Result<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StatusError::InvalidStatusFlag(
                "status name must not be empty".to_string(),
            ));
        }
        if !status.is_single_flag() {
            return Err(StatusError::InvalidStatusFlag(format!(
                "'{name}' must have exactly one bit set, got {status}"
            )));
        }
        if let Some((existing, _)) = self
            .entries
            .iter()
            .find(|(n, s)| n.eq_ignore_ascii_case(name) || *s == status)
        {
            return Err(StatusError::DuplicateStatus(format!(
                "'{name}' ({status}) collides with '{existing}'"
            )));
        }
        self.entries.push((name.to_string(), status));
        Ok(())
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, name: &str, status: Status) -> Result<Self> {
        self.insert(name, status)?;
        Ok(self)
    }

    pub fn get(&self, name: &str) -> Option<Status> {
        let name = name.trim();
        self.entries
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, s)| *s)
    }

    /// Names of the catalog flags set in `mask`, in catalog order.
    pub fn names(&self, mask: Status) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|(_, s)| mask.contains(*s))
            .map(|(n, _)| n.as_str())
            .collect()
    }

    /// Bits set in `mask` that no catalog entry names.
    pub fn unnamed_bits(&self, mask: Status) -> Status {
        let named = self
            .entries
            .iter()
            .fold(Status::EMPTY, |acc, (_, s)| acc | *s);
        Status(mask.0 & !named.0)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Status)> {
        self.entries.iter().map(|(n, s)| (n.as_str(), *s))
    }
}

impl TryFrom<serde_json::Map<String, serde_json::Value>> for StatusCatalog {
    type Error = StatusError;

    fn try_from(map: serde_json::Map<String, serde_json::Value>) -> Result<Self> {
        let mut catalog = Self::new();
        for (name, value) in map {
            let bits = value
                .as_u64()
                .and_then(|v| u32::try_from(v).ok())
                .ok_or_else(|| {
                    StatusError::InvalidStatusFlag(format!(
                        "'{name}' must map to an unsigned 32-bit integer, got {value}"
                    ))
                })?;
            catalog.insert(&name, Status(bits))?;
        }
        Ok(catalog)
    }
}

impl Serialize for StatusCatalog {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, status) in &self.entries {
            map.serialize_entry(name, status)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn personalities() -> StatusCatalog {
        StatusCatalog::new()
            .with("upholder", Status::from_bits(0x1))
            .and_then(|c| c.with("questioner", Status::from_bits(0x2)))
            .and_then(|c| c.with("obliger", Status::from_bits(0x4)))
            .and_then(|c| c.with("rebel", Status::from_bits(0x8)))
            .unwrap()
    }

    #[test]
    fn test_status_bit_ops() {
        let a = Status::from_bits(0b01);
        let b = Status::from_bits(0b10);
        let mut both = a | b;
        assert_eq!(both.bits(), 0b11);
        assert!(both.contains(a));
        assert!(both.intersects(b));
        assert_eq!(both & a, a);
        both |= a;
        assert_eq!(both.bits(), 0b11);
        assert!(Status::EMPTY.is_empty());
    }

    #[test]
    fn test_status_display_is_binary() {
        assert_eq!(Status::from_bits(0b101).to_string(), "0b101");
    }

    #[test]
    fn test_catalog_lookup_is_case_insensitive() {
        let catalog = personalities();
        assert_eq!(catalog.get("Obliger"), Some(Status::from_bits(0x4)));
        assert_eq!(catalog.get(" REBEL "), Some(Status::from_bits(0x8)));
        assert_eq!(catalog.get("skeptic"), None);
    }

    #[test]
    fn test_catalog_names_in_catalog_order() {
        let catalog = personalities();
        let mask = Status::from_bits(0x8 | 0x1);
        assert_eq!(catalog.names(mask), vec!["upholder", "rebel"]);
    }

    #[test]
    fn test_catalog_unnamed_bits() {
        let catalog = personalities();
        let mask = Status::from_bits(0x1 | 0x40);
        assert_eq!(catalog.unnamed_bits(mask), Status::from_bits(0x40));
    }

    #[test]
    fn test_catalog_rejects_multi_bit_flag() {
        let err = StatusCatalog::new()
            .with("both", Status::from_bits(0b11))
            .unwrap_err();
        assert!(matches!(err, StatusError::InvalidStatusFlag(_)));
    }

    #[test]
    fn test_catalog_rejects_zero_flag() {
        let err = StatusCatalog::new()
            .with("none", Status::EMPTY)
            .unwrap_err();
        assert!(matches!(err, StatusError::InvalidStatusFlag(_)));
    }

    #[test]
    fn test_catalog_rejects_duplicate_name_and_bit() {
        let catalog = personalities();
        let err = catalog
            .clone()
            .with("UPHOLDER", Status::from_bits(0x10))
            .unwrap_err();
        assert!(matches!(err, StatusError::DuplicateStatus(_)));

        let err = catalog
            .with("skeptic", Status::from_bits(0x2))
            .unwrap_err();
        assert!(matches!(err, StatusError::DuplicateStatus(_)));
    }

    #[test]
    fn test_catalog_from_json_preserves_order() {
        let catalog: StatusCatalog =
            serde_json::from_str(r#"{"rebel": 8, "upholder": 1}"#).unwrap();
        let names: Vec<&str> = catalog.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["rebel", "upholder"]);
        assert_eq!(
            serde_json::to_string(&catalog).unwrap(),
            r#"{"rebel":8,"upholder":1}"#
        );
    }

    #[test]
    fn test_catalog_from_json_rejects_bad_value() {
        let result: std::result::Result<StatusCatalog, _> =
            serde_json::from_str(r#"{"rebel": "eight"}"#);
        assert!(result.is_err());
        let result: std::result::Result<StatusCatalog, _> =
            serde_json::from_str(r#"{"a": 1, "b": 1}"#);
        assert!(result.is_err());
    }
}
