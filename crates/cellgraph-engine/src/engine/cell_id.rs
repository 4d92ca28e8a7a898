//! Cell identifier parsing and ordering.
//!
//! Identifiers are spreadsheet-style names: one or more uppercase letters
//! followed by a row number with no leading zero (`A1`, `AB42`). The letters
//! and digits also give zero-indexed column/row coordinates, which is what
//! identifiers sort by.
//!
//! # Examples
//!
//! ```
//! use cellgraph_engine::engine::CellId;
//!
//! let id: CellId = "B3".parse().unwrap();
//! assert_eq!(id.row(), 2); // 0-indexed
//! assert_eq!(id.col(), 1);
//! assert_eq!(id.to_string(), "B3");
//! ```

use regex::Regex;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use crate::error::IdError;

/// A validated cell identifier.
#[derive(Clone, Debug, Hash, Eq, PartialEq)]
pub struct CellId {
    name: String,
    col: usize,
    row: usize,
}

fn cell_id_re() -> &'static Regex {
    static CELL_ID_RE: OnceLock<Regex> = OnceLock::new();
    CELL_ID_RE.get_or_init(|| {
        Regex::new(r"^(?<letters>[A-Z]+)(?<numbers>[1-9][0-9]*)$")
            .expect("cell identifier regex must compile")
    })
}

impl CellId {
    /// Parse an identifier, rejecting anything outside the `A1` grammar.
    pub fn parse(name: &str) -> Result<CellId, IdError> {
        let malformed = || IdError::Malformed(name.to_string());

        let caps = cell_id_re().captures(name).ok_or_else(malformed)?;
        let col = caps["letters"]
            .bytes()
            .try_fold(0usize, |acc, c| {
                acc.checked_mul(26)?.checked_add((c - b'A') as usize + 1)
            })
            .ok_or_else(malformed)?
            - 1;
        let row = caps["numbers"].parse::<usize>().map_err(|_| malformed())? - 1;

        Ok(CellId {
            name: name.to_string(),
            col,
            row,
        })
    }

    /// Build an identifier from zero-indexed coordinates.
    pub fn from_coords(col: usize, row: usize) -> CellId {
        CellId {
            name: format!("{}{}", CellId::col_to_letters(col), row + 1),
            col,
            row,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.name
    }

    pub fn col(&self) -> usize {
        self.col
    }

    pub fn row(&self) -> usize {
        self.row
    }

    /// Convert column index to spreadsheet-style letters (0 -> A, 25 -> Z, 26 -> AA).
    pub fn col_to_letters(col: usize) -> String {
        let mut result = String::new();
        let mut n = col + 1;
        while n > 0 {
            n -= 1;
            result.insert(0, (b'A' + (n % 26) as u8) as char);
            n /= 26;
        }
        result
    }
}

impl FromStr for CellId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CellId::parse(s)
    }
}

impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.name)
    }
}

impl Ord for CellId {
    fn cmp(&self, other: &Self) -> Ordering {
        self.col.cmp(&other.col).then(self.row.cmp(&other.row))
    }
}

impl PartialOrd for CellId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(name: &str) -> CellId {
        CellId::parse(name).unwrap()
    }

    #[test]
    fn test_parse_single_letter_columns() {
        let a1 = id("A1");
        assert_eq!((a1.col(), a1.row()), (0, 0));

        let z9 = id("Z9");
        assert_eq!((z9.col(), z9.row()), (25, 8));
    }

    #[test]
    fn test_parse_multi_letter_columns() {
        assert_eq!(id("AA1").col(), 26);
        assert_eq!(id("AB42").col(), 27);
        assert_eq!(id("AB42").row(), 41);
        assert_eq!(id("BA1").col(), 52);
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for bad in ["", "A", "1", "A0", "A01", "a1", "aA1", "1A", "A 1", " A1", "A1B", "A-1"] {
            assert_eq!(
                CellId::parse(bad),
                Err(IdError::Malformed(bad.to_string())),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_parse_rejects_overflowing_column() {
        let huge = format!("{}1", "Z".repeat(40));
        assert!(CellId::parse(&huge).is_err());
    }

    #[test]
    fn test_from_coords_round_trips_through_display() {
        assert_eq!(CellId::from_coords(0, 0).to_string(), "A1");
        assert_eq!(CellId::from_coords(26, 9).to_string(), "AA10");
        assert_eq!(CellId::from_coords(26, 9), id("AA10"));
    }

    #[test]
    fn test_ordering_is_column_then_row() {
        let mut ids = vec![id("AA1"), id("A10"), id("B2"), id("A2")];
        ids.sort();
        let names: Vec<_> = ids.iter().map(CellId::as_str).collect();
        assert_eq!(names, vec!["A2", "A10", "B2", "AA1"]);
    }

    #[test]
    fn test_display_respects_padding() {
        assert_eq!(format!("{:>4}|", id("B1")), "  B1|");
    }
}
