//! Display formatting for cell values and identifier lists.

use super::CellId;

/// Format a number for display: always one decimal place.
///
/// Non-finite values come out as Rust prints them (`inf`, `-inf`, `NaN`).
pub fn format_number(n: f64) -> String {
    format!("{:.1}", n)
}

/// Join identifiers with a separator, e.g. `A1, B2` or `A1 -> B1 -> A1`.
pub fn format_id_list<'a, I>(ids: I, separator: &str) -> String
where
    I: IntoIterator<Item = &'a CellId>,
{
    ids.into_iter()
        .map(CellId::as_str)
        .collect::<Vec<_>>()
        .join(separator)
}
