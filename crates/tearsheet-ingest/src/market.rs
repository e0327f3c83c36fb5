//! Conversion of market-data bars into daily prices and returns.
//!
//! Bars arrive from the quote-fetching layer in aggregate form (epoch
//! millisecond timestamp plus close). Fetching is not done here.

use crate::series::{PriceSeries, ReturnSeries, TimeSeriesPoint};
use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};

/// A single aggregate bar. Only the close is needed for returns.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// Bar start, milliseconds since the Unix epoch
    #[serde(rename = "t")]
    pub timestamp_ms: i64,
    /// Closing price
    #[serde(rename = "c")]
    pub close: f64,
}

impl Bar {
    /// Create a bar.
    pub const fn new(timestamp_ms: i64, close: f64) -> Self {
        Self {
            timestamp_ms,
            close,
        }
    }

    /// UTC calendar date of the bar.
    pub fn date(&self) -> Option<NaiveDate> {
        DateTime::from_timestamp_millis(self.timestamp_ms).map(|dt| dt.date_naive())
    }
}

/// Daily closing prices from `bars`, one point per UTC calendar date.
///
/// Bars are sorted by timestamp. Bars with a non-finite or non-positive close
/// or an out-of-range timestamp are discarded. When several bars fall on the
/// same date the latest one is that day's close.
pub fn bars_to_prices(bars: &[Bar]) -> PriceSeries {
    let mut usable: Vec<(i64, NaiveDate, f64)> = bars
        .iter()
        .filter(|b| b.close.is_finite() && b.close > 0.0)
        .filter_map(|b| b.date().map(|d| (b.timestamp_ms, d, b.close)))
        .collect();
    usable.sort_by_key(|(ts, _, _)| *ts);

    let mut points: Vec<TimeSeriesPoint> = Vec::with_capacity(usable.len());
    for (_, date, close) in usable {
        match points.last_mut() {
            Some(last) if last.date == date => last.value = close,
            _ => points.push(TimeSeriesPoint::new(date, close)),
        }
    }

    PriceSeries::from_sorted(points)
}

/// Close-to-close daily returns from `bars`, dated by the later day.
///
/// See [`bars_to_prices`] for how bars are reduced to one close per day.
pub fn bars_to_returns(bars: &[Bar]) -> ReturnSeries {
    bars_to_prices(bars).daily_returns()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const DAY_MS: i64 = 86_400_000;
    // 2024-01-02T00:00:00Z
    const START_MS: i64 = 1_704_153_600_000;

    #[test]
    fn test_unsorted_bars() {
        let bars = [
            Bar::new(START_MS + 2 * DAY_MS, 99.0),
            Bar::new(START_MS, 100.0),
            Bar::new(START_MS + DAY_MS, 110.0),
        ];
        let returns = bars_to_returns(&bars);

        assert_eq!(returns.len(), 2);
        assert_eq!(returns.dates()[0].to_string(), "2024-01-03");
        assert_relative_eq!(returns.returns()[0], 0.10, epsilon = 1e-12);
        assert_relative_eq!(returns.returns()[1], -0.10, epsilon = 1e-12);
    }

    #[test]
    fn test_bad_closes_are_dropped() {
        let bars = [
            Bar::new(START_MS, 100.0),
            Bar::new(START_MS + DAY_MS, f64::NAN),
            Bar::new(START_MS + 2 * DAY_MS, 0.0),
            Bar::new(START_MS + 3 * DAY_MS, 105.0),
        ];
        let returns = bars_to_returns(&bars);

        assert_eq!(returns.len(), 1);
        assert_eq!(returns.dates()[0].to_string(), "2024-01-05");
        assert_relative_eq!(returns.returns()[0], 0.05, epsilon = 1e-12);
    }

    #[test]
    fn test_intraday_bars_collapse_to_last_close() {
        let hour = DAY_MS / 24;
        let bars = [
            Bar::new(START_MS + hour, 101.0),
            Bar::new(START_MS, 100.0),
            Bar::new(START_MS + 2 * hour, 102.0),
            Bar::new(START_MS + DAY_MS, 107.1),
        ];

        let prices = bars_to_prices(&bars);
        assert_eq!(prices.len(), 2);
        assert_eq!(prices.values(), vec![102.0, 107.1]);

        let returns = bars_to_returns(&bars);
        assert_eq!(returns.dates().len(), 1);
        assert_eq!(returns.dates()[0].to_string(), "2024-01-03");
        assert_relative_eq!(returns.returns()[0], 0.05, epsilon = 1e-12);
    }

    #[test]
    fn test_prices_keep_first_trading_day() {
        // Fri 2024-01-05, Mon 2024-01-08, Tue 2024-01-09
        let friday = START_MS + 3 * DAY_MS;
        let bars = [
            Bar::new(friday, 100.0),
            Bar::new(friday + 3 * DAY_MS, 101.0),
            Bar::new(friday + 4 * DAY_MS, 102.0),
        ];
        let prices = bars_to_prices(&bars);

        assert_eq!(prices.anchor().unwrap().date.to_string(), "2024-01-05");
        assert_eq!(prices.terminal().unwrap().date.to_string(), "2024-01-09");
    }

    #[test]
    fn test_deserialize_aggregate_fields() {
        let bar: Bar = serde_json::from_str(r#"{"t": 1704153600000, "c": 187.5}"#).unwrap();
        assert_eq!(bar.close, 187.5);
        assert_eq!(bar.date().unwrap().to_string(), "2024-01-02");
    }
}
