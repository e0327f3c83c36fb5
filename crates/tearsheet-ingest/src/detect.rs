//! Column and series-kind detection.
//!
//! Detection is driven by column names. The only content check is the
//! date-column fallback, which looks at the first value of the first column.

use crate::dates::looks_like_iso_date;
use crate::error::{IngestError, Result};
use crate::record::RawRecord;
use crate::series::SeriesKind;
use serde::{Deserialize, Serialize};

/// Column names that identify a date column exactly.
const DATE_KEYWORDS: &[&str] = &[
    "date",
    "time",
    "timestamp",
    "day",
    "month",
    "year",
    "日期",
    "时间",
];

/// Date field used by the legacy candle export format.
const LEGACY_DATE_FIELD: &str = "candle_begin_time";

const DAILY_RETURN_TOKENS: &[&str] = &["daily_return", "dailyreturn", "daily_ret", "日收益"];

const CUMULATIVE_RETURN_TOKENS: &[&str] = &[
    "cumulative",
    "cum_return",
    "total_return",
    "totalreturn",
    "累计收益",
    "总收益",
];

/// A column that only says "return" is read as a cumulative return.
const BARE_RETURN_TOKENS: &[&str] = &["return", "收益", "回报", "yield"];

const PRICE_TOKENS: &[&str] = &[
    "nav",
    "净值",
    "netvalue",
    "net_value",
    "close",
    "收盘",
    "price",
    "价格",
];

const VALUE_TOKENS: &[&str] = &[
    "value", "数值", "amount", "金额", "equity", "权益", "balance", "余额", "open", "开盘",
];

/// Outcome of column detection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Detection {
    /// Column holding the observation dates
    pub date_column: String,
    /// Column holding the observed values
    pub value_column: String,
    /// How the value column is to be interpreted
    pub kind: SeriesKind,
}

/// Identify the date column, the value column and the series kind.
///
/// Column names are taken from the first record. Blank names are ignored.
///
/// # Errors
/// * [`IngestError::InsufficientData`] if `records` is empty
/// * [`IngestError::UnidentifiableColumns`] if fewer than two usable columns exist
///
/// # Examples
///
/// ```
/// use tearsheet_ingest::{RawRecord, SeriesKind, detect::detect_columns};
///
/// let rows = vec![RawRecord::from_pairs([
///     ("date", "2024-01-02".into()),
///     ("daily_return", "0.5%".into()),
/// ])];
/// let detection = detect_columns(&rows).unwrap();
///
/// assert_eq!(detection.date_column, "date");
/// assert_eq!(detection.kind, SeriesKind::DailyReturn);
/// ```
pub fn detect_columns(records: &[RawRecord]) -> Result<Detection> {
    let first = records.first().ok_or(IngestError::InsufficientData {
        required: 2,
        actual: 0,
    })?;

    let columns: Vec<&str> = first.columns().filter(|c| !c.trim().is_empty()).collect();
    if columns.len() < 2 {
        return Err(unidentifiable(first, records.len()));
    }

    let date_column = detect_date_column(first, &columns);
    let (value_column, kind) = columns
        .iter()
        .filter(|c| **c != date_column)
        .filter_map(|c| classify_value_column(c).map(|(rank, kind)| (rank, *c, kind)))
        .min_by_key(|(rank, _, _)| *rank)
        .map(|(_, c, kind)| (c, kind))
        .or_else(|| {
            columns
                .iter()
                .find(|c| **c != date_column)
                .map(|c| (*c, SeriesKind::Price))
        })
        .ok_or_else(|| unidentifiable(first, records.len()))?;

    tracing::debug!(
        date_column,
        value_column,
        kind = %kind,
        "detected columns"
    );

    Ok(Detection {
        date_column: date_column.to_string(),
        value_column: value_column.to_string(),
        kind,
    })
}

fn detect_date_column<'a>(first: &RawRecord, columns: &[&'a str]) -> &'a str {
    let exact = columns.iter().find(|c| {
        let name = c.trim().to_lowercase();
        name == LEGACY_DATE_FIELD || DATE_KEYWORDS.contains(&name.as_str())
    });
    if let Some(column) = exact {
        return *column;
    }

    let leading = columns[0];
    let leading_is_date = first
        .get(leading)
        .is_some_and(|cell| looks_like_iso_date(&cell.as_text()));
    if leading_is_date {
        return leading;
    }

    columns
        .iter()
        .find(|c| {
            let name = c.to_lowercase();
            DATE_KEYWORDS.iter().any(|k| name.contains(k))
        })
        .copied()
        .unwrap_or(leading)
}

/// Rank a column name by how strongly it names a value column.
///
/// Lower ranks win. Returns `None` when no keyword family matches.
fn classify_value_column(name: &str) -> Option<(u8, SeriesKind)> {
    let name = normalize_name(name);
    let has = |tokens: &[&str]| tokens.iter().any(|t| name.contains(t));

    if has(DAILY_RETURN_TOKENS) {
        Some((0, SeriesKind::DailyReturn))
    } else if has(CUMULATIVE_RETURN_TOKENS) {
        Some((1, SeriesKind::CumulativeReturn))
    } else if has(PRICE_TOKENS) {
        Some((2, SeriesKind::Price))
    } else if has(BARE_RETURN_TOKENS) {
        Some((3, SeriesKind::CumulativeReturn))
    } else if has(VALUE_TOKENS) {
        Some((4, SeriesKind::Price))
    } else {
        None
    }
}

fn normalize_name(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .chars()
        .map(|c| if c == ' ' || c == '-' { '_' } else { c })
        .collect()
}

fn unidentifiable(first: &RawRecord, rows: usize) -> IngestError {
    IngestError::UnidentifiableColumns {
        columns: first.columns().map(str::to_string).collect(),
        rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Cell;
    use rstest::rstest;

    fn row(pairs: &[(&str, &str)]) -> RawRecord {
        RawRecord::from_pairs(pairs.iter().map(|(k, v)| (*k, Cell::from(*v))))
    }

    #[rstest]
    #[case("daily_return", SeriesKind::DailyReturn)]
    #[case("Daily Return", SeriesKind::DailyReturn)]
    #[case("日收益率", SeriesKind::DailyReturn)]
    #[case("cumulative_return", SeriesKind::CumulativeReturn)]
    #[case("Total Return", SeriesKind::CumulativeReturn)]
    #[case("累计收益", SeriesKind::CumulativeReturn)]
    #[case("strategy_return", SeriesKind::CumulativeReturn)]
    #[case("NAV", SeriesKind::Price)]
    #[case("Adj Close", SeriesKind::Price)]
    #[case("净值", SeriesKind::Price)]
    #[case("portfolio value", SeriesKind::Price)]
    #[case("whatever", SeriesKind::Price)]
    fn test_kind_from_column_name(#[case] column: &str, #[case] expected: SeriesKind) {
        let records = vec![row(&[("date", "2024-01-01"), (column, "1.0")])];
        let detection = detect_columns(&records).unwrap();

        assert_eq!(detection.value_column, column);
        assert_eq!(detection.kind, expected);
    }

    #[test]
    fn test_exact_date_keyword_wins_over_position() {
        let records = vec![row(&[("nav", "1.0"), ("Date", "2024-01-01")])];
        let detection = detect_columns(&records).unwrap();

        assert_eq!(detection.date_column, "Date");
        assert_eq!(detection.value_column, "nav");
    }

    #[test]
    fn test_legacy_candle_field() {
        let records = vec![row(&[
            ("candle_begin_time", "2024-01-01 00:00:00"),
            ("daily_return", "0.01"),
            ("cumulative_return", "0.01"),
        ])];
        let detection = detect_columns(&records).unwrap();

        assert_eq!(detection.date_column, "candle_begin_time");
        assert_eq!(detection.value_column, "daily_return");
        assert_eq!(detection.kind, SeriesKind::DailyReturn);
    }

    #[test]
    fn test_first_column_content_fallback() {
        let records = vec![row(&[("when", "2024/3/1"), ("close", "12.5")])];
        let detection = detect_columns(&records).unwrap();

        assert_eq!(detection.date_column, "when");
        assert_eq!(detection.kind, SeriesKind::Price);
    }

    #[test]
    fn test_partial_date_name_then_first_column() {
        let records = vec![row(&[("nav", "1.0"), ("trade_date", "01/02/2024")])];
        assert_eq!(detect_columns(&records).unwrap().date_column, "trade_date");

        let records = vec![row(&[("a", "x"), ("b", "1.0")])];
        let detection = detect_columns(&records).unwrap();
        assert_eq!(detection.date_column, "a");
        assert_eq!(detection.value_column, "b");
    }

    #[test]
    fn test_close_preferred_over_open() {
        let records = vec![row(&[
            ("date", "2024-01-01"),
            ("open", "10"),
            ("close", "11"),
        ])];
        assert_eq!(detect_columns(&records).unwrap().value_column, "close");
    }

    #[test]
    fn test_single_column_is_unidentifiable() {
        let records = vec![row(&[("date", "2024-01-01"), ("  ", "1.0")])];
        let err = detect_columns(&records).unwrap_err();

        match err {
            IngestError::UnidentifiableColumns { columns, rows } => {
                assert_eq!(columns.len(), 2);
                assert_eq!(rows, 1);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_empty_table_is_insufficient() {
        assert!(matches!(
            detect_columns(&[]),
            Err(IngestError::InsufficientData { actual: 0, .. })
        ));
    }
}
