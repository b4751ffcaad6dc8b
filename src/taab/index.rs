//! # Display Indexes
//!
//! Users refer to entries by a **1-based** position in the list as shown
//! (`1` is the oldest entry). Internally the store uses 0-based positions;
//! [`DisplayIndex::position`] converts.
//!
//! A display index is only meaningful against the list it was read from: any
//! insert or delete shifts the entries after it. Commands that act on several
//! indexes therefore resolve them all up front against one snapshot.
//!
//! Search results keep the index of each entry in the full list (not its
//! rank among the matches), so `taab search alice` followed by `taab edit 7`
//! edits the same entry the search showed as `7`.
//!
//! ## Selector grammar
//!
//! - Single index: `"3"`
//! - Range: `"3-5"` expands to 3, 4, 5 (start must be <= end)

use crate::model::Entry;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// A 1-based, user-facing entry position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DisplayIndex(pub usize);

impl DisplayIndex {
    pub fn from_position(position: usize) -> Self {
        DisplayIndex(position + 1)
    }

    /// The 0-based store position.
    pub fn position(self) -> usize {
        self.0.saturating_sub(1)
    }
}

impl fmt::Display for DisplayIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for DisplayIndex {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().parse::<usize>() {
            Ok(0) => Err("Indexes start at 1".to_string()),
            Ok(n) => Ok(DisplayIndex(n)),
            Err(_) => Err(format!("Invalid index format: {}", s)),
        }
    }
}

/// An entry paired with its index in the full list.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexedEntry {
    pub index: DisplayIndex,
    pub entry: Entry,
}

pub fn index_entries(entries: &[Entry]) -> Vec<IndexedEntry> {
    entries
        .iter()
        .enumerate()
        .map(|(position, entry)| IndexedEntry {
            index: DisplayIndex::from_position(position),
            entry: entry.clone(),
        })
        .collect()
}

/// Parses a single input that may be one index or a range. A range may not
/// reach past `last`, the highest index currently shown; it is checked before
/// being expanded.
pub fn parse_index_or_range(s: &str, last: usize) -> Result<Vec<DisplayIndex>, String> {
    if let Some(dash_pos) = s.find('-') {
        // A leading '-' is not a range separator
        if dash_pos > 0 {
            let start = DisplayIndex::from_str(&s[..dash_pos])?;
            let end = DisplayIndex::from_str(&s[dash_pos + 1..])?;
            if start > end {
                return Err(format!(
                    "Invalid range: start ({}) must be <= end ({})",
                    start, end
                ));
            }
            if end.0 > last {
                return Err(format!(
                    "Invalid range: {} goes past the last entry ({})",
                    s.trim(),
                    last
                ));
            }
            return Ok((start.0..=end.0).map(DisplayIndex).collect());
        }
    }

    DisplayIndex::from_str(s).map(|idx| vec![idx])
}

/// Parses every selector, flattening ranges and dropping duplicates while
/// keeping first-seen order. See [`parse_index_or_range`] for `last`.
pub fn parse_indexes<S: AsRef<str>>(
    inputs: &[S],
    last: usize,
) -> Result<Vec<DisplayIndex>, String> {
    let mut seen = BTreeSet::new();
    let mut out: Vec<DisplayIndex> = Vec::new();
    for input in inputs {
        for idx in parse_index_or_range(input.as_ref(), last)? {
            if seen.insert(idx) {
                out.push(idx);
            }
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parsing() {
        assert_eq!(DisplayIndex::from_str("1"), Ok(DisplayIndex(1)));
        assert_eq!(DisplayIndex::from_str(" 42 "), Ok(DisplayIndex(42)));

        assert!(DisplayIndex::from_str("").is_err());
        assert!(DisplayIndex::from_str("0").is_err());
        assert!(DisplayIndex::from_str("abc").is_err());
        assert!(DisplayIndex::from_str("12a").is_err());
        assert!(DisplayIndex::from_str("p1").is_err());
    }

    #[test]
    fn test_position_round_trip() {
        assert_eq!(DisplayIndex(1).position(), 0);
        assert_eq!(DisplayIndex::from_position(4), DisplayIndex(5));
    }

    #[test]
    fn test_parse_range() {
        assert_eq!(
            parse_index_or_range("3-5", 10),
            Ok(vec![DisplayIndex(3), DisplayIndex(4), DisplayIndex(5)])
        );
        assert_eq!(parse_index_or_range("3-3", 10), Ok(vec![DisplayIndex(3)]));
        assert_eq!(parse_index_or_range("7", 10), Ok(vec![DisplayIndex(7)]));
    }

    #[test]
    fn test_parse_range_invalid() {
        let result = parse_index_or_range("5-3", 10);
        assert!(result.unwrap_err().contains("must be <= end"));

        assert!(parse_index_or_range("abc-5", 10).is_err());
        assert!(parse_index_or_range("3-xyz", 10).is_err());
        assert!(parse_index_or_range("-5", 10).is_err());
        assert!(parse_index_or_range("3-", 10).is_err());
        assert!(parse_index_or_range("0-2", 10).is_err());
    }

    #[test]
    fn test_parse_indexes_dedups() {
        let parsed = parse_indexes(&["2", "1-3", "2"], 5).unwrap();
        assert_eq!(parsed, vec![DisplayIndex(2), DisplayIndex(1), DisplayIndex(3)]);
    }

    #[test]
    fn test_range_past_last_entry_is_rejected() {
        let err = parse_index_or_range("1-18446744073709551615", 3).unwrap_err();
        assert!(err.contains("goes past the last entry (3)"));
        assert!(parse_indexes(&["2-4"], 3).is_err());
        assert!(parse_indexes(&["1-1000000"], 0).is_err());
    }

    #[test]
    fn test_wide_range_within_list() {
        let parsed = parse_indexes(&["1-50000", "25000-50000"], 50_000).unwrap();
        assert_eq!(parsed.len(), 50_000);
        assert_eq!(parsed[0], DisplayIndex(1));
        assert_eq!(parsed[49_999], DisplayIndex(50_000));
    }

    #[test]
    fn test_single_index_is_not_bounded_here() {
        // Out-of-range single indexes are reported by the command that resolves them
        assert_eq!(parse_indexes(&["9"], 2), Ok(vec![DisplayIndex(9)]));
    }

    #[test]
    fn test_index_entries_is_one_based() {
        let entries = vec![Entry::new("A1"), Entry::new("A2")];
        let indexed = index_entries(&entries);
        assert_eq!(indexed[0].index, DisplayIndex(1));
        assert_eq!(indexed[1].index, DisplayIndex(2));
        assert_eq!(indexed[1].entry.card_id, "A2");
    }
}
