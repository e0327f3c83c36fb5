//! Date normalization for heterogeneous calendar strings.
//!
//! Every accepted input is reduced to a [`NaiveDate`]; its `Display` form is the
//! canonical zero-padded `YYYY-MM-DD` encoding used throughout the workspace.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Generic date-time layouts tried after the explicit numeric forms.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
];

/// Generic date-only layouts tried after the explicit numeric forms.
const DATE_FORMATS: &[&str] = &["%b %d %Y", "%b %d, %Y", "%B %d, %Y", "%d %b %Y", "%d %B %Y"];

/// Parse a calendar string into a date.
///
/// Accepted forms, in order: `YYYY/M/D`, `YYYY-M-D`, `M/D/YYYY` or `D/M/YYYY`
/// (day-first only when the first group exceeds 12), `YYYY.M.D`, then a set of
/// generic layouts (RFC 3339, RFC 2822, date-times, month names). Time parts
/// are dropped. Impossible dates such as `2024-02-30` yield `None`.
///
/// # Examples
///
/// ```
/// use tearsheet_ingest::dates::normalize_date;
///
/// assert_eq!(normalize_date("2024/1/5").unwrap().to_string(), "2024-01-05");
/// assert_eq!(normalize_date("25/12/2023").unwrap().to_string(), "2023-12-25");
/// assert!(normalize_date("not-a-date").is_none());
/// ```
pub fn normalize_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    if let Some([y, m, d]) = numeric_groups(s, '/', [4, 2, 2]) {
        return ymd(y, m, d);
    }
    if let Some([y, m, d]) = numeric_groups(s, '-', [4, 2, 2]) {
        return ymd(y, m, d);
    }
    if let Some([a, b, y]) = numeric_groups(s, '/', [2, 2, 4]) {
        return if a > 12 && b <= 12 {
            ymd(y, b, a)
        } else if a <= 12 {
            ymd(y, a, b)
        } else {
            None
        };
    }
    if let Some([y, m, d]) = numeric_groups(s, '.', [4, 2, 2]) {
        return ymd(y, m, d);
    }

    parse_generic(s)
}

/// Whether `value` has the shape `YYYY-M-D` or `YYYY/M/D`.
///
/// Only the shape is checked; the date itself may still be invalid.
pub fn looks_like_iso_date(value: &str) -> bool {
    let s = value.trim();
    numeric_groups(s, '-', [4, 2, 2]).is_some() || numeric_groups(s, '/', [4, 2, 2]).is_some()
}

/// Split `s` on `sep` into exactly three all-digit groups.
///
/// `widths` gives the maximum digit count per group; a width of 4 is exact.
fn numeric_groups(s: &str, sep: char, widths: [usize; 3]) -> Option<[u32; 3]> {
    let mut parts = s.split(sep);
    let mut out = [0u32; 3];

    for (slot, width) in out.iter_mut().zip(widths) {
        let part = parts.next()?;
        let valid_len = if width == 4 {
            part.len() == 4
        } else {
            (1..=width).contains(&part.len())
        };
        if !valid_len || !part.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        *slot = part.parse().ok()?;
    }

    if parts.next().is_some() {
        return None;
    }
    Some(out)
}

fn ymd(year: u32, month: u32, day: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(i32::try_from(year).ok()?, month, day)
}

fn parse_generic(s: &str) -> Option<NaiveDate> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.date_naive());
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|dt| dt.date())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        })
}
