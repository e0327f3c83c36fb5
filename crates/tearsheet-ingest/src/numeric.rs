//! Numeric cell parsing.

use crate::record::Cell;

/// Parse a cell into a finite number.
///
/// Text may carry a trailing `%` (scaled by 1/100) and `,` thousands
/// separators. Empty, non-numeric and non-finite values yield `None`.
///
/// # Examples
///
/// ```
/// use tearsheet_ingest::{Cell, numeric::parse_numeric};
///
/// assert_eq!(parse_numeric(&Cell::from("12%")), Some(0.12));
/// assert_eq!(parse_numeric(&Cell::from("1,250.5")), Some(1250.5));
/// assert_eq!(parse_numeric(&Cell::from("n/a")), None);
/// ```
pub fn parse_numeric(cell: &Cell) -> Option<f64> {
    let value = match cell {
        Cell::Number(n) => *n,
        Cell::Text(s) => parse_text(s)?,
    };
    value.is_finite().then_some(value)
}

fn parse_text(raw: &str) -> Option<f64> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    let (body, scale) = s
        .strip_suffix('%')
        .map_or((s, 1.0), |stripped| (stripped.trim_end(), 100.0));

    let cleaned: String = body.chars().filter(|c| *c != ',').collect();
    cleaned.parse::<f64>().ok().map(|v| v / scale)
}
