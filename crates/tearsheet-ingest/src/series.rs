//! Canonical series types shared by the normalizer and the metrics engine.

use crate::error::{IngestError, Result};
use chrono::NaiveDate;
use derive_more::Display;
use serde::{Deserialize, Serialize};

/// What the value column of a dataset represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeriesKind {
    /// Absolute price or net asset value
    #[display("price")]
    Price,
    /// One-period simple return
    #[display("daily_return")]
    DailyReturn,
    /// Return accumulated since the first observation
    #[display("cumulative_return")]
    CumulativeReturn,
}

/// A dated observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesPoint {
    /// Calendar date, no time component
    pub date: NaiveDate,
    /// Observed value
    pub value: f64,
}

impl TimeSeriesPoint {
    /// Create a new point.
    pub const fn new(date: NaiveDate, value: f64) -> Self {
        Self { date, value }
    }
}

/// Ascending series of positive prices. The first point is the anchor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    points: Vec<TimeSeriesPoint>,
}

impl PriceSeries {
    /// Wrap points that are already sorted ascending with unique dates.
    pub(crate) const fn from_sorted(points: Vec<TimeSeriesPoint>) -> Self {
        Self { points }
    }

    /// Replay a compounding walk from `anchor_value` at `anchor_date`.
    ///
    /// `price[0] = anchor_value` and `price[i] = price[i-1] * (1 + returns[i-1])`,
    /// each price dated by the matching entry of `returns.dates()`.
    pub fn compound(anchor_date: NaiveDate, anchor_value: f64, returns: &ReturnSeries) -> Self {
        let mut points = Vec::with_capacity(returns.len() + 1);
        points.push(TimeSeriesPoint::new(anchor_date, anchor_value));

        let mut price = anchor_value;
        for (date, r) in returns.iter() {
            price *= 1.0 + r;
            points.push(TimeSeriesPoint::new(date, price));
        }

        Self { points }
    }

    /// All points in date order.
    pub fn points(&self) -> &[TimeSeriesPoint] {
        &self.points
    }

    /// Price values in date order.
    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.value).collect()
    }

    /// The first point.
    pub fn anchor(&self) -> Option<&TimeSeriesPoint> {
        self.points.first()
    }

    /// The last point.
    pub fn terminal(&self) -> Option<&TimeSeriesPoint> {
        self.points.last()
    }

    /// Number of points.
    pub const fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the series is empty.
    pub const fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Daily returns between consecutive prices, dated by the trailing point.
    pub fn daily_returns(&self) -> ReturnSeries {
        let (dates, returns) = self
            .points
            .windows(2)
            .map(|w| (w[1].date, w[1].value / w[0].value - 1.0))
            .unzip();
        ReturnSeries { dates, returns }
    }
}

/// Daily returns paired 1:1 with the trailing date of each interval.
///
/// Deserialization goes through [`ReturnSeries::new`], so mismatched lengths
/// are rejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "UncheckedReturnSeries")]
pub struct ReturnSeries {
    dates: Vec<NaiveDate>,
    returns: Vec<f64>,
}

#[derive(Deserialize)]
struct UncheckedReturnSeries {
    dates: Vec<NaiveDate>,
    returns: Vec<f64>,
}

impl TryFrom<UncheckedReturnSeries> for ReturnSeries {
    type Error = IngestError;

    fn try_from(raw: UncheckedReturnSeries) -> Result<Self> {
        Self::new(raw.dates, raw.returns)
    }
}

impl ReturnSeries {
    /// Pair dates with returns.
    ///
    /// # Errors
    /// Returns [`IngestError::LengthMismatch`] if the lengths differ.
    pub fn new(dates: Vec<NaiveDate>, returns: Vec<f64>) -> Result<Self> {
        if dates.len() != returns.len() {
            return Err(IngestError::LengthMismatch {
                dates: dates.len(),
                values: returns.len(),
            });
        }
        Ok(Self { dates, returns })
    }

    pub(crate) const fn from_parts(dates: Vec<NaiveDate>, returns: Vec<f64>) -> Self {
        Self { dates, returns }
    }

    /// Trailing dates.
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Simple daily returns.
    pub fn returns(&self) -> &[f64] {
        &self.returns
    }

    /// Iterate `(date, return)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, f64)> + '_ {
        self.dates.iter().copied().zip(self.returns.iter().copied())
    }

    /// Number of returns.
    pub const fn len(&self) -> usize {
        self.returns.len()
    }

    /// Whether there are no returns.
    pub const fn is_empty(&self) -> bool {
        self.returns.is_empty()
    }
}
