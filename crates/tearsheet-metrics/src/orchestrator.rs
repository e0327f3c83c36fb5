//! From a normalized series to a finished [`Analysis`].

use crate::config::MetricsConfig;
use crate::error::{MetricsError, Result};
use crate::report::{MIN_RETURNS, MetricsReport, compute_report};
use serde::{Deserialize, Serialize};
use tearsheet_ingest::{NormalizedSeries, PriceSeries, ReturnSeries, SeriesKind};

/// A computed report together with the return series it was computed from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    /// Kind of input the returns were derived from
    pub kind: SeriesKind,
    /// All metrics
    pub report: MetricsReport,
    /// Aligned daily returns
    pub returns: ReturnSeries,
}

/// Resolves which representation of a series to measure and runs the engine.
#[derive(Debug, Clone, Default)]
pub struct Orchestrator {
    config: MetricsConfig,
}

impl Orchestrator {
    /// Create an orchestrator.
    ///
    /// # Errors
    /// Returns [`MetricsError::InvalidConfig`] if `config` fails validation.
    pub fn new(config: MetricsConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The active configuration.
    pub const fn config(&self) -> &MetricsConfig {
        &self.config
    }

    /// Compute the report for a normalized series.
    ///
    /// Daily-return input is measured on the returns exactly as supplied.
    /// Price and cumulative-return input is measured on returns derived from
    /// the price path. The price path's first and last dates fix the span.
    ///
    /// # Errors
    /// Returns [`MetricsError::InsufficientData`] with fewer than two price
    /// points.
    pub fn report(&self, series: &NormalizedSeries) -> Result<Analysis> {
        let returns = match series.kind {
            SeriesKind::DailyReturn => series.returns.clone(),
            SeriesKind::Price | SeriesKind::CumulativeReturn => series.prices.daily_returns(),
        };
        self.measure(series.kind, &series.prices, returns)
    }

    /// Compute the report for a bare price series, such as daily closes
    /// built from market bars.
    ///
    /// # Errors
    /// Returns [`MetricsError::InsufficientData`] with fewer than two points.
    pub fn report_prices(&self, prices: &PriceSeries) -> Result<Analysis> {
        self.measure(SeriesKind::Price, prices, prices.daily_returns())
    }

    fn measure(
        &self,
        kind: SeriesKind,
        prices: &PriceSeries,
        returns: ReturnSeries,
    ) -> Result<Analysis> {
        // a single point spans no interval
        let [anchor, .., terminal] = prices.points() else {
            return Err(MetricsError::InsufficientData {
                required: MIN_RETURNS,
                actual: 0,
            });
        };

        let report = compute_report(
            returns.returns(),
            returns.dates(),
            anchor.date,
            terminal.date,
            &self.config,
        )?;

        tracing::debug!(
            %kind,
            points = report.data_points,
            start = %report.start_date,
            end = %report.end_date,
            "computed metrics report"
        );

        Ok(Analysis {
            kind,
            report,
            returns,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;
    use tearsheet_ingest::market::{Bar, bars_to_prices};
    use tearsheet_ingest::{Cell, RawRecord, detect_columns, normalize};

    fn records(column: &str, rows: &[(&str, f64)]) -> Vec<RawRecord> {
        rows.iter()
            .map(|(date, v)| {
                RawRecord::from_pairs([
                    ("date".to_string(), Cell::from(*date)),
                    (column.to_string(), Cell::Number(*v)),
                ])
            })
            .collect()
    }

    fn orchestrator() -> Orchestrator {
        Orchestrator::new(MetricsConfig {
            as_of: NaiveDate::from_ymd_opt(2024, 1, 31),
            ..Default::default()
        })
        .unwrap()
    }

    fn analyze(column: &str, rows: &[(&str, f64)]) -> Result<Analysis> {
        let table = records(column, rows);
        let detection = detect_columns(&table).unwrap();
        let series = normalize(&table, &detection).unwrap();
        orchestrator().report(&series)
    }

    #[test]
    fn test_rejects_invalid_config() {
        let config = MetricsConfig {
            long_rolling_window: 10,
            ..Default::default()
        };
        assert!(matches!(
            Orchestrator::new(config),
            Err(MetricsError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_price_rise_then_fall() {
        let rows = [("2024-01-01", 100.0), ("2024-01-02", 110.0), ("2024-01-03", 99.0)];
        let analysis = analyze("close", &rows).unwrap();
        let r = &analysis.report;

        assert_eq!(analysis.kind, SeriesKind::Price);
        assert_relative_eq!(r.cumulative_return, -0.01, epsilon = 1e-12);
        assert_relative_eq!(r.max_drawdown, -0.10, epsilon = 1e-12);
        assert_eq!(r.data_points, 2);
        assert_eq!(r.total_days, 2);
        assert_eq!(analysis.returns.dates()[0].to_string(), "2024-01-02");
    }

    #[test]
    fn test_daily_returns_measured_verbatim() {
        let rows = [("2024-01-02", 0.01), ("2024-01-03", 0.02), ("2024-01-04", 0.0)];
        let analysis = analyze("daily_return", &rows).unwrap();

        assert_eq!(analysis.returns.returns(), &[0.01, 0.02, 0.0]);
        assert_eq!(analysis.report.start_date.to_string(), "2024-01-01");
        assert_eq!(analysis.report.sortino_ratio, f64::INFINITY);
        assert_eq!(analysis.report.max_drawdown, 0.0);
    }

    #[test]
    fn test_cumulative_and_price_agree() {
        let prices = [("2024-01-01", 1.0), ("2024-01-02", 1.05), ("2024-01-03", 0.98), ("2024-01-04", 1.02)];
        let cumulative: Vec<(&str, f64)> = prices.iter().map(|(d, p)| (*d, p - 1.0)).collect();

        let from_prices = analyze("nav", &prices).unwrap().report;
        let from_cumulative = analyze("cumulative_return", &cumulative).unwrap().report;

        assert_relative_eq!(from_prices.cumulative_return, 0.02, epsilon = 1e-12);
        assert_relative_eq!(
            from_prices.cumulative_return,
            from_cumulative.cumulative_return,
            epsilon = 1e-12
        );
        assert_relative_eq!(from_prices.sharpe_ratio, from_cumulative.sharpe_ratio, epsilon = 1e-9);
    }

    #[test]
    fn test_two_prices_give_a_report() {
        let analysis = analyze("nav", &[("2024-01-02", 1.00), ("2024-01-03", 1.01)]).unwrap();

        assert_eq!(analysis.report.data_points, 1);
        assert_relative_eq!(analysis.report.cumulative_return, 0.01, epsilon = 1e-12);
        assert_eq!(analysis.report.volatility, 0.0);
    }

    #[test]
    fn test_report_prices_from_bars() {
        let day = 86_400_000;
        let start = 1_704_153_600_000;
        let bars: Vec<Bar> = [100.0, 101.0, 99.0, 102.0]
            .iter()
            .enumerate()
            .map(|(i, c)| Bar::new(start + i as i64 * day, *c))
            .collect();
        let analysis = orchestrator().report_prices(&bars_to_prices(&bars)).unwrap();

        assert_eq!(analysis.kind, SeriesKind::Price);
        assert_eq!(analysis.report.data_points, 3);
        assert_eq!(analysis.report.start_date.to_string(), "2024-01-02");
        assert_relative_eq!(analysis.report.cumulative_return, 0.02, epsilon = 1e-12);
    }

    #[test]
    fn test_bar_span_starts_at_first_close() {
        // Fri 2024-01-05, Mon 2024-01-08, Tue 2024-01-09
        let day = 86_400_000;
        let friday = 1_704_412_800_000;
        let bars = [
            Bar::new(friday, 100.0),
            Bar::new(friday + 3 * day, 101.0),
            Bar::new(friday + 4 * day, 102.0),
        ];
        let report = orchestrator()
            .report_prices(&bars_to_prices(&bars))
            .unwrap()
            .report;

        assert_eq!(report.start_date.to_string(), "2024-01-05");
        assert_eq!(report.end_date.to_string(), "2024-01-09");
        assert_eq!(report.total_days, 4);
    }

    #[test]
    fn test_report_prices_needs_two_points() {
        let single = bars_to_prices(&[Bar::new(1_704_153_600_000, 100.0)]);
        assert!(matches!(
            orchestrator().report_prices(&single),
            Err(MetricsError::InsufficientData {
                required: 1,
                actual: 0
            })
        ));
        assert!(matches!(
            orchestrator().report_prices(&PriceSeries::default()),
            Err(MetricsError::InsufficientData { actual: 0, .. })
        ));
    }
}
