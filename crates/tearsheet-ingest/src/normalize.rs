//! Series normalization and reconstruction.
//!
//! Rows are parsed into `(date, value)` pairs, sorted ascending, de-duplicated
//! by date, and then turned into a price series plus the aligned daily-return
//! series according to the detected [`SeriesKind`]:
//!
//! | kind | prices | returns |
//! |------|--------|---------|
//! | `Price` | values as given | `p[i] / p[i-1] - 1` |
//! | `DailyReturn` | compounding walk from 1.0 | values as given |
//! | `CumulativeReturn` | `1 + cr[i]` | `p[i] / p[i-1] - 1` |
//!
//! Rows that cannot be used are skipped and reported as [`MalformedRow`]s.

use crate::dates::normalize_date;
use crate::detect::Detection;
use crate::error::{IngestError, Result};
use crate::numeric::parse_numeric;
use crate::record::RawRecord;
use crate::series::{PriceSeries, ReturnSeries, SeriesKind, TimeSeriesPoint};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A row that was skipped during normalization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MalformedRow {
    /// Zero-based index of the row in the input table
    pub row: usize,
    /// Why the row was skipped
    pub reason: String,
}

impl MalformedRow {
    fn new(row: usize, reason: impl Into<String>) -> Self {
        Self {
            row,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for MalformedRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "row {}: {}", self.row, self.reason)
    }
}

/// Output of normalization: both representations plus the skipped rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedSeries {
    /// Kind the series was reconstructed from
    pub kind: SeriesKind,
    /// Ascending price series; the first point is the anchor
    pub prices: PriceSeries,
    /// Daily returns dated by the trailing day of each interval
    pub returns: ReturnSeries,
    /// Rows that were skipped, in table order
    pub skipped: Vec<MalformedRow>,
}

impl NormalizedSeries {
    /// Date of the first price point.
    pub fn anchor_date(&self) -> Option<NaiveDate> {
        self.prices.anchor().map(|p| p.date)
    }

    /// Date of the last price point.
    pub fn terminal_date(&self) -> Option<NaiveDate> {
        self.prices.terminal().map(|p| p.date)
    }
}

/// Configuration for the normalizer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizerConfig {
    /// Minimum number of parsed points (default: 2)
    pub min_points: usize,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self { min_points: 2 }
    }
}

/// Converts raw records into canonical series.
#[derive(Debug, Clone)]
pub struct Normalizer {
    config: NormalizerConfig,
}

impl Normalizer {
    /// Create a normalizer.
    ///
    /// # Errors
    /// Returns [`IngestError::InsufficientData`] if `min_points` is below 2,
    /// since no return can be formed from fewer points.
    pub fn new(config: NormalizerConfig) -> Result<Self> {
        if config.min_points < 2 {
            return Err(IngestError::InsufficientData {
                required: 2,
                actual: config.min_points,
            });
        }
        Ok(Self { config })
    }

    /// Normalize `records` using the columns and kind from `detection`.
    ///
    /// # Errors
    /// Returns [`IngestError::InsufficientData`] when fewer than
    /// `min_points` rows survive parsing.
    pub fn normalize(
        &self,
        records: &[RawRecord],
        detection: &Detection,
    ) -> Result<NormalizedSeries> {
        let mut skipped = Vec::new();
        let mut parsed = Vec::with_capacity(records.len());

        for (idx, record) in records.iter().enumerate() {
            match parse_row(record, detection) {
                Ok((date, value)) => parsed.push((idx, TimeSeriesPoint::new(date, value))),
                Err(reason) => skipped.push(MalformedRow::new(idx, reason)),
            }
        }

        // Stable sort keeps table order among equal dates, so the last
        // duplicate in the table is the one retained.
        parsed.sort_by_key(|(_, p)| p.date);
        let mut points: Vec<(usize, TimeSeriesPoint)> = Vec::with_capacity(parsed.len());
        for (idx, point) in parsed {
            if let Some((prev_idx, prev)) = points.last()
                && prev.date == point.date
            {
                skipped.push(MalformedRow::new(
                    *prev_idx,
                    format!("duplicate date {}", point.date),
                ));
                points.pop();
            }
            points.push((idx, point));
        }
        skipped.sort_by_key(|m| m.row);

        for row in &skipped {
            tracing::warn!(row = row.row, reason = %row.reason, "skipping malformed row");
        }

        if points.len() < self.config.min_points {
            return Err(IngestError::InsufficientData {
                required: self.config.min_points,
                actual: points.len(),
            });
        }

        let points: Vec<TimeSeriesPoint> = points.into_iter().map(|(_, p)| p).collect();
        let (prices, returns) = reconstruct(detection.kind, points);

        tracing::debug!(
            kind = %detection.kind,
            prices = prices.len(),
            returns = returns.len(),
            skipped = skipped.len(),
            "normalized series"
        );

        Ok(NormalizedSeries {
            kind: detection.kind,
            prices,
            returns,
            skipped,
        })
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self {
            config: NormalizerConfig::default(),
        }
    }
}

/// Normalize with the default configuration.
///
/// # Errors
/// See [`Normalizer::normalize`].
pub fn normalize(records: &[RawRecord], detection: &Detection) -> Result<NormalizedSeries> {
    Normalizer::default().normalize(records, detection)
}

fn parse_row(
    record: &RawRecord,
    detection: &Detection,
) -> std::result::Result<(NaiveDate, f64), String> {
    let date_cell = record
        .get(&detection.date_column)
        .filter(|c| !c.is_blank())
        .ok_or_else(|| format!("missing date in column '{}'", detection.date_column))?;
    let date_text = date_cell.as_text();
    let date =
        normalize_date(&date_text).ok_or_else(|| format!("unparseable date '{date_text}'"))?;

    let value_cell = record
        .get(&detection.value_column)
        .filter(|c| !c.is_blank())
        .ok_or_else(|| format!("missing value in column '{}'", detection.value_column))?;
    let value = parse_numeric(value_cell)
        .ok_or_else(|| format!("non-numeric value '{}'", value_cell.as_text()))?;

    match detection.kind {
        SeriesKind::Price if value <= 0.0 => Err(format!("non-positive price {value}")),
        SeriesKind::DailyReturn if value <= -1.0 => {
            Err(format!("daily return {value} wipes out the position"))
        }
        SeriesKind::CumulativeReturn if 1.0 + value <= 0.0 => {
            Err(format!("cumulative return {value} wipes out the position"))
        }
        _ => Ok((date, value)),
    }
}

fn reconstruct(kind: SeriesKind, points: Vec<TimeSeriesPoint>) -> (PriceSeries, ReturnSeries) {
    match kind {
        SeriesKind::Price => {
            let prices = PriceSeries::from_sorted(points);
            let returns = prices.daily_returns();
            (prices, returns)
        }
        SeriesKind::DailyReturn => {
            let first = points[0].date;
            let anchor = first.pred_opt().unwrap_or(first);
            let (dates, values) = points.into_iter().map(|p| (p.date, p.value)).unzip();
            let returns = ReturnSeries::from_parts(dates, values);
            let prices = PriceSeries::compound(anchor, 1.0, &returns);
            (prices, returns)
        }
        SeriesKind::CumulativeReturn => {
            let prices = PriceSeries::from_sorted(
                points
                    .into_iter()
                    .map(|p| TimeSeriesPoint::new(p.date, 1.0 + p.value))
                    .collect(),
            );
            let returns = prices.daily_returns();
            (prices, returns)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Cell;
    use approx::assert_relative_eq;

    fn detection(kind: SeriesKind) -> Detection {
        Detection {
            date_column: "date".to_string(),
            value_column: "value".to_string(),
            kind,
        }
    }

    fn rows(data: &[(&str, &str)]) -> Vec<RawRecord> {
        data.iter()
            .map(|(d, v)| {
                RawRecord::from_pairs([("date", Cell::from(*d)), ("value", Cell::from(*v))])
            })
            .collect()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_price_series() {
        let records = rows(&[("2024-01-01", "100"), ("2024-01-02", "110"), ("2024-01-03", "99")]);
        let series = normalize(&records, &detection(SeriesKind::Price)).unwrap();

        assert_eq!(series.prices.len(), 3);
        assert_eq!(series.returns.len(), 2);
        assert_relative_eq!(series.returns.returns()[0], 0.10, epsilon = 1e-12);
        assert_relative_eq!(series.returns.returns()[1], -0.10, epsilon = 1e-12);
        assert_eq!(series.anchor_date(), Some(date(2024, 1, 1)));
        assert_eq!(series.returns.dates()[0], date(2024, 1, 2));
    }

    #[test]
    fn test_daily_return_reconstruction() {
        let records = rows(&[("2024-01-02", "0.01"), ("2024-01-03", "-2%"), ("2024-01-04", "0.03")]);
        let series = normalize(&records, &detection(SeriesKind::DailyReturn)).unwrap();

        let expected = [1.0, 1.01, 0.9898, 1.019494];
        for (actual, expected) in series.prices.values().iter().zip(expected) {
            assert_relative_eq!(*actual, expected, epsilon = 1e-12);
        }
        assert_eq!(series.returns.returns(), &[0.01, -0.02, 0.03]);
        assert_eq!(series.anchor_date(), Some(date(2024, 1, 1)));
        assert_eq!(series.returns.len(), series.prices.len() - 1);
    }

    #[test]
    fn test_cumulative_return_is_additive() {
        let records = rows(&[("2024-01-01", "0"), ("2024-01-02", "0.05"), ("2024-01-03", "-0.02")]);
        let series = normalize(&records, &detection(SeriesKind::CumulativeReturn)).unwrap();

        assert_eq!(series.prices.values(), vec![1.0, 1.0 + 0.05, 1.0 + -0.02]);
        assert_relative_eq!(series.returns.returns()[1], 0.98 / 1.05 - 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_unsorted_rows_and_mixed_formats() {
        let records = rows(&[("2024/1/3", "99"), ("01/01/2024", "100"), ("2024.01.02", "110")]);
        let series = normalize(&records, &detection(SeriesKind::Price)).unwrap();

        let dates: Vec<_> = series.prices.points().iter().map(|p| p.date).collect();
        assert_eq!(dates, vec![date(2024, 1, 1), date(2024, 1, 2), date(2024, 1, 3)]);
        assert!(series.skipped.is_empty());
    }

    #[test]
    fn test_bad_rows_are_skipped() {
        let records = rows(&[
            ("2024-01-01", "100"),
            ("not-a-date", "105"),
            ("2024-01-02", "abc"),
            ("2024-01-03", "-5"),
            ("2024-01-04", "110"),
        ]);
        let series = normalize(&records, &detection(SeriesKind::Price)).unwrap();

        assert_eq!(series.prices.len(), 2);
        let skipped: Vec<usize> = series.skipped.iter().map(|m| m.row).collect();
        assert_eq!(skipped, vec![1, 2, 3]);
        assert!(series.skipped[0].reason.contains("not-a-date"));
    }

    #[test]
    fn test_duplicate_dates_keep_last_row() {
        let records = rows(&[("2024-01-01", "100"), ("2024-01-02", "105"), ("2024-01-02", "107")]);
        let series = normalize(&records, &detection(SeriesKind::Price)).unwrap();

        assert_eq!(series.prices.values(), vec![100.0, 107.0]);
        assert_eq!(series.skipped.len(), 1);
        assert_eq!(series.skipped[0].row, 1);
    }

    #[test]
    fn test_insufficient_after_skipping() {
        let records = rows(&[("2024-01-01", "100"), ("not-a-date", "105")]);
        let err = normalize(&records, &detection(SeriesKind::Price)).unwrap_err();

        assert!(matches!(
            err,
            IngestError::InsufficientData {
                required: 2,
                actual: 1
            }
        ));
    }

    #[test]
    fn test_min_points_must_allow_a_return() {
        assert!(Normalizer::new(NormalizerConfig { min_points: 1 }).is_err());
        assert!(Normalizer::new(NormalizerConfig { min_points: 5 }).is_ok());
    }
}
