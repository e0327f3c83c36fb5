//! Metric configuration.

use crate::error::{MetricsError, Result};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

/// Parameters shared by the metric functions.
///
/// The report keys for the windows and trailing periods keep their default
/// names: `rollingSharpe90d*` always holds the short window,
/// `rollingSharpe365d*` the long window, and `return3M` / `return6M` the short
/// and long trailing periods.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    /// Return periods per year used for annualization (default: 252)
    pub periods_per_year: u32,

    /// Calendar days per year used for CAGR (default: 365.25)
    pub days_per_year: f64,

    /// Short rolling-Sharpe window in returns, reported as
    /// `rollingSharpe90d*` (default: 90)
    pub short_rolling_window: usize,

    /// Long rolling-Sharpe window in returns, reported as
    /// `rollingSharpe365d*` (default: 365)
    pub long_rolling_window: usize,

    /// Trailing positions for the short period return, reported as
    /// `return3M` (default: 90)
    pub short_period: usize,

    /// Trailing positions for the long period return, reported as
    /// `return6M` (default: 180)
    pub long_period: usize,

    /// Reference date for month- and year-to-date returns.
    /// `None` means today's local date.
    pub as_of: Option<NaiveDate>,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            periods_per_year: 252,
            days_per_year: 365.25,
            short_rolling_window: 90,
            long_rolling_window: 365,
            short_period: 90,
            long_period: 180,
            as_of: None,
        }
    }
}

impl MetricsConfig {
    /// Check that every parameter is usable.
    ///
    /// # Errors
    /// Returns [`MetricsError::InvalidConfig`] describing the first bad field.
    pub fn validate(&self) -> Result<()> {
        if self.periods_per_year == 0 {
            return Err(MetricsError::InvalidConfig(
                "periods_per_year must be positive".to_string(),
            ));
        }
        if !(self.days_per_year.is_finite() && self.days_per_year > 0.0) {
            return Err(MetricsError::InvalidConfig(
                "days_per_year must be a positive number".to_string(),
            ));
        }
        if self.short_rolling_window == 0 {
            return Err(MetricsError::InvalidConfig(
                "short_rolling_window must be positive".to_string(),
            ));
        }
        if self.long_rolling_window <= self.short_rolling_window {
            return Err(MetricsError::InvalidConfig(
                "long_rolling_window must be greater than short_rolling_window".to_string(),
            ));
        }
        if self.short_period == 0 || self.long_period == 0 {
            return Err(MetricsError::InvalidConfig(
                "period lengths must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// The reference date for calendar-to-date returns.
    pub fn as_of_date(&self) -> NaiveDate {
        self.as_of.unwrap_or_else(|| Local::now().date_naive())
    }

    /// Annualization factor as a float.
    pub fn periods(&self) -> f64 {
        f64::from(self.periods_per_year)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = MetricsConfig::default();
        assert_eq!(config.periods_per_year, 252);
        assert_eq!(config.days_per_year, 365.25);
        assert_eq!(config.short_rolling_window, 90);
        assert_eq!(config.long_rolling_window, 365);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_periods() {
        let config = MetricsConfig {
            periods_per_year: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_window_order() {
        let config = MetricsConfig {
            short_rolling_window: 365,
            long_rolling_window: 90,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_day_basis() {
        let config = MetricsConfig {
            days_per_year: f64::NAN,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_explicit_as_of() {
        let as_of = NaiveDate::from_ymd_opt(2024, 6, 30).unwrap();
        let config = MetricsConfig {
            as_of: Some(as_of),
            ..Default::default()
        };
        assert_eq!(config.as_of_date(), as_of);
    }

    #[test]
    fn test_partial_deserialize_uses_defaults() {
        let config: MetricsConfig =
            serde_json::from_str(r#"{"periods_per_year": 365, "as_of": "2024-03-01"}"#).unwrap();
        assert_eq!(config.periods_per_year, 365);
        assert_eq!(config.long_period, 180);
        assert_eq!(config.as_of_date().to_string(), "2024-03-01");
    }
}
