//! Label → code lookup tables.
//!
//! The codes mirror the label encoding used when the model was trained. Note
//! that `SIZE_MAP` is not monotonic (`High` encodes to 0) and `TYPE_MAP` is
//! reversed relative to listing order; both must be kept exactly as they are.

use crate::error::EncodeError;

/// An immutable categorical lookup table for one form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LookupTable {
    pub field: &'static str,
    entries: &'static [(&'static str, u8)],
}

impl LookupTable {
    pub const fn new(field: &'static str, entries: &'static [(&'static str, u8)]) -> Self {
        Self { field, entries }
    }

    /// Code for `label`, or `UnknownCategory` when the label is not mapped.
    ///
    /// Matching is exact after trimming surrounding whitespace.
    pub fn lookup(&self, label: &str) -> Result<u8, EncodeError> {
        let label = label.trim();
        self.entries
            .iter()
            .find(|(key, _)| *key == label)
            .map(|&(_, code)| code)
            .ok_or_else(|| EncodeError::UnknownCategory {
                field: self.field,
                value: label.to_string(),
                allowed: self.labels(),
            })
    }

    /// Labels in presentation order.
    pub fn labels(&self) -> Vec<&'static str> {
        self.entries.iter().map(|&(label, _)| label).collect()
    }

    pub fn entries(&self) -> &'static [(&'static str, u8)] {
        self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Position of `label` in presentation order (used by the form selectors).
    pub fn position(&self, label: &str) -> Option<usize> {
        self.entries.iter().position(|(key, _)| *key == label.trim())
    }

    /// Label `delta` steps away from `label`, wrapping around in either direction.
    pub fn cycle(&self, label: &str, delta: i32) -> &'static str {
        let n = self.entries.len() as i32;
        let current = self.position(label).map(|p| p as i32).unwrap_or(0);
        let next = (current + delta).rem_euclid(n);
        self.entries[next as usize].0
    }
}

pub static FAT_MAP: LookupTable = LookupTable::new(
    "item_fat_content",
    &[("Low Fat", 0), ("Regular", 1)],
);

pub static SIZE_MAP: LookupTable = LookupTable::new(
    "outlet_size",
    &[("Small", 1), ("Medium", 2), ("High", 0)],
);

pub static LOCATION_MAP: LookupTable = LookupTable::new(
    "outlet_location_type",
    &[("Tier 1", 0), ("Tier 2", 1), ("Tier 3", 2)],
);

pub static TYPE_MAP: LookupTable = LookupTable::new(
    "outlet_type",
    &[
        ("Supermarket Type1", 3),
        ("Supermarket Type2", 2),
        ("Supermarket Type3", 0),
        ("Grocery Store", 1),
    ],
);

/// All categorical tables, in feature order.
pub static ALL_TABLES: [&LookupTable; 4] = [&FAT_MAP, &SIZE_MAP, &LOCATION_MAP, &TYPE_MAP];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documented_codes() {
        assert_eq!(FAT_MAP.lookup("Low Fat"), Ok(0));
        assert_eq!(FAT_MAP.lookup("Regular"), Ok(1));

        assert_eq!(SIZE_MAP.lookup("Small"), Ok(1));
        assert_eq!(SIZE_MAP.lookup("Medium"), Ok(2));
        assert_eq!(SIZE_MAP.lookup("High"), Ok(0));

        assert_eq!(LOCATION_MAP.lookup("Tier 1"), Ok(0));
        assert_eq!(LOCATION_MAP.lookup("Tier 2"), Ok(1));
        assert_eq!(LOCATION_MAP.lookup("Tier 3"), Ok(2));

        assert_eq!(TYPE_MAP.lookup("Supermarket Type1"), Ok(3));
        assert_eq!(TYPE_MAP.lookup("Supermarket Type2"), Ok(2));
        assert_eq!(TYPE_MAP.lookup("Supermarket Type3"), Ok(0));
        assert_eq!(TYPE_MAP.lookup("Grocery Store"), Ok(1));
    }

    #[test]
    fn unknown_label_is_rejected() {
        let err = SIZE_MAP.lookup("Ultra Size").unwrap_err();
        match err {
            EncodeError::UnknownCategory { field, value, allowed } => {
                assert_eq!(field, "outlet_size");
                assert_eq!(value, "Ultra Size");
                assert_eq!(allowed, vec!["Small", "Medium", "High"]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn lookup_is_case_sensitive_but_trims() {
        assert_eq!(FAT_MAP.lookup("  Regular "), Ok(1));
        assert!(FAT_MAP.lookup("low fat").is_err());
    }

    #[test]
    fn codes_are_unique_within_each_table() {
        for table in ALL_TABLES {
            let mut codes: Vec<u8> = table.entries().iter().map(|&(_, c)| c).collect();
            codes.sort_unstable();
            codes.dedup();
            assert_eq!(codes.len(), table.len(), "duplicate code in {}", table.field);
        }
    }

    #[test]
    fn cycle_wraps_both_ways() {
        assert_eq!(SIZE_MAP.cycle("High", 1), "Small");
        assert_eq!(SIZE_MAP.cycle("Small", -1), "High");
        assert_eq!(TYPE_MAP.cycle("Supermarket Type1", 1), "Supermarket Type2");
    }
}
