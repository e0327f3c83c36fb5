//! The full metrics report and the function that computes it.

use crate::calendar::{
    best, gain_pain_ratio, monthly_returns, monthly_value_at_risk, worst, yearly_returns,
};
use crate::config::MetricsConfig;
use crate::drawdown::{duration_of_max_drawdown, longest_drawdown, max_drawdown};
use crate::error::{MetricsError, Result};
use crate::returns::{
    best_day, cagr, cumulative_return, month_to_date, trailing_return, worst_day, year_to_date,
};
use crate::risk::{
    calmar_ratio, conditional_value_at_risk, gini_coefficient, kurtosis, omega_ratio,
    outlier_loss_ratio, outlier_win_ratio, sharpe_ratio, skew, sortino_ratio, tail_ratio,
    value_at_risk, volatility,
};
use crate::rolling::rolling_sharpe;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Minimum number of returns [`compute_report`] accepts.
///
/// One return is two price points. Statistics that need more points than
/// they are given report 0.
pub const MIN_RETURNS: usize = 1;

/// Performance and risk summary of one return series.
///
/// Serializes with camelCase keys. Ratios that can be unbounded serialize
/// `f64::INFINITY` as the string `"Infinity"`.
///
/// Window and period keys are fixed names. `rollingSharpe90d*` and `return3M`
/// hold the configured short window and period, `rollingSharpe365d*` and
/// `return6M` the long ones; see [`MetricsConfig`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsReport {
    /// Anchor date of the price path
    pub start_date: NaiveDate,
    /// Terminal date of the price path
    pub end_date: NaiveDate,
    /// Calendar days between anchor and terminal, at least 1
    pub total_days: i64,
    /// `total_days` in years
    pub years: f64,
    /// Number of returns
    pub data_points: usize,

    /// Compounded total return
    pub cumulative_return: f64,
    /// Compound annual growth rate
    pub cagr: f64,
    /// Annualized volatility
    pub volatility: f64,
    /// Annualized Sharpe ratio
    pub sharpe_ratio: f64,
    /// Annualized Sortino ratio
    #[serde(with = "unbounded")]
    pub sortino_ratio: f64,

    /// Maximum drawdown, at most 0
    pub max_drawdown: f64,
    /// Index span of the maximum-drawdown episode
    #[serde(rename = "durationOfMD")]
    pub duration_of_md: usize,
    /// Index span of the longest drawdown episode
    pub max_drawdown_duration: usize,
    /// Depth of the longest drawdown episode
    #[serde(rename = "drawdownOfMDD")]
    pub drawdown_of_mdd: f64,
    /// CAGR over maximum drawdown
    pub calmar_ratio: f64,

    /// Daily value at risk at 95%
    pub var95: f64,
    /// Monthly value at risk at 99%
    pub var99_monthly: f64,
    /// Daily conditional value at risk at 95%
    pub cvar95: f64,
    /// Daily conditional value at risk at 99%
    pub cvar99: f64,

    /// Gini coefficient of absolute returns
    pub gini_coefficient: f64,
    /// Gains over losses
    #[serde(with = "unbounded")]
    pub omega_ratio: f64,
    /// Monthly gains over monthly pain
    #[serde(with = "unbounded")]
    pub gain_pain_ratio: f64,
    /// `|P95 / P5|`
    #[serde(with = "unbounded")]
    pub tail_ratio: f64,
    /// Share of positive returns above the 99th percentile
    pub outlier_win_ratio: f64,
    /// Share of negative returns below the 1st percentile
    pub outlier_loss_ratio: f64,

    /// Mean of the short-window rolling Sharpe (90 by default)
    pub rolling_sharpe_90d_mean: f64,
    /// Median of the short-window rolling Sharpe
    pub rolling_sharpe_90d_median: f64,
    /// Last short-window rolling Sharpe
    pub rolling_sharpe_90d_last: f64,
    /// Mean of the long-window rolling Sharpe (365 by default)
    pub rolling_sharpe_365d_mean: f64,
    /// Median of the long-window rolling Sharpe
    pub rolling_sharpe_365d_median: f64,
    /// Last long-window rolling Sharpe
    pub rolling_sharpe_365d_last: f64,

    /// Month to date
    pub mtd: f64,
    /// Trailing short period (90 returns by default)
    #[serde(rename = "return3M")]
    pub return_3m: f64,
    /// Trailing long period (180 returns by default)
    #[serde(rename = "return6M")]
    pub return_6m: f64,
    /// Year to date
    pub ytd: f64,

    /// Best single return
    pub best_day: f64,
    /// Worst single return
    pub worst_day: f64,
    /// Best calendar month
    pub best_month: f64,
    /// Worst calendar month
    pub worst_month: f64,
    /// Best calendar year
    pub best_year: f64,
    /// Worst calendar year
    pub worst_year: f64,

    /// Population skewness
    pub skew: f64,
    /// Population excess kurtosis
    pub kurtosis: f64,
}

impl MetricsReport {
    /// Every metric as `(camelCase name, value)` in report order.
    ///
    /// Dates are excluded; counts are converted to floats.
    pub fn metrics(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("totalDays", self.total_days as f64),
            ("years", self.years),
            ("dataPoints", self.data_points as f64),
            ("cumulativeReturn", self.cumulative_return),
            ("cagr", self.cagr),
            ("volatility", self.volatility),
            ("sharpeRatio", self.sharpe_ratio),
            ("sortinoRatio", self.sortino_ratio),
            ("maxDrawdown", self.max_drawdown),
            ("durationOfMD", self.duration_of_md as f64),
            ("maxDrawdownDuration", self.max_drawdown_duration as f64),
            ("drawdownOfMDD", self.drawdown_of_mdd),
            ("calmarRatio", self.calmar_ratio),
            ("var95", self.var95),
            ("var99Monthly", self.var99_monthly),
            ("cvar95", self.cvar95),
            ("cvar99", self.cvar99),
            ("giniCoefficient", self.gini_coefficient),
            ("omegaRatio", self.omega_ratio),
            ("gainPainRatio", self.gain_pain_ratio),
            ("tailRatio", self.tail_ratio),
            ("outlierWinRatio", self.outlier_win_ratio),
            ("outlierLossRatio", self.outlier_loss_ratio),
            ("rollingSharpe90dMean", self.rolling_sharpe_90d_mean),
            ("rollingSharpe90dMedian", self.rolling_sharpe_90d_median),
            ("rollingSharpe90dLast", self.rolling_sharpe_90d_last),
            ("rollingSharpe365dMean", self.rolling_sharpe_365d_mean),
            ("rollingSharpe365dMedian", self.rolling_sharpe_365d_median),
            ("rollingSharpe365dLast", self.rolling_sharpe_365d_last),
            ("mtd", self.mtd),
            ("return3M", self.return_3m),
            ("return6M", self.return_6m),
            ("ytd", self.ytd),
            ("bestDay", self.best_day),
            ("worstDay", self.worst_day),
            ("bestMonth", self.best_month),
            ("worstMonth", self.worst_month),
            ("bestYear", self.best_year),
            ("worstYear", self.worst_year),
            ("skew", self.skew),
            ("kurtosis", self.kurtosis),
        ]
    }
}

/// Compute every metric for a daily-return series.
///
/// `dates[i]` is the date of `returns[i]`. `anchor_date` and `terminal_date`
/// bound the price path the returns were taken from and fix the calendar span
/// used for annualization.
///
/// # Errors
/// - [`MetricsError::LengthMismatch`] if `dates` and `returns` differ in length
/// - [`MetricsError::InsufficientData`] if `returns` is empty
pub fn compute_report(
    returns: &[f64],
    dates: &[NaiveDate],
    anchor_date: NaiveDate,
    terminal_date: NaiveDate,
    config: &MetricsConfig,
) -> Result<MetricsReport> {
    if dates.len() != returns.len() {
        return Err(MetricsError::LengthMismatch {
            dates: dates.len(),
            returns: returns.len(),
        });
    }
    if returns.len() < MIN_RETURNS {
        return Err(MetricsError::InsufficientData {
            required: MIN_RETURNS,
            actual: returns.len(),
        });
    }

    let periods = config.periods();
    let total_days = (terminal_date - anchor_date).num_days().max(1);
    let years = total_days as f64 / config.days_per_year;

    let cumulative = cumulative_return(returns);
    let growth = cagr(cumulative, years);
    let mdd = max_drawdown(returns);
    let longest = longest_drawdown(returns);

    let monthly = monthly_returns(returns, dates);
    let yearly = yearly_returns(returns, dates);
    let short = rolling_sharpe(returns, config.short_rolling_window, periods);
    let long = rolling_sharpe(returns, config.long_rolling_window, periods);
    let as_of = config.as_of_date();

    Ok(MetricsReport {
        start_date: anchor_date,
        end_date: terminal_date,
        total_days,
        years,
        data_points: returns.len(),

        cumulative_return: cumulative,
        cagr: growth,
        volatility: volatility(returns, periods),
        sharpe_ratio: sharpe_ratio(returns, periods),
        sortino_ratio: sortino_ratio(returns, periods),

        max_drawdown: mdd,
        duration_of_md: duration_of_max_drawdown(returns),
        max_drawdown_duration: longest.map_or(0, |e| e.duration()),
        drawdown_of_mdd: longest.map_or(0.0, |e| e.depth),
        calmar_ratio: calmar_ratio(growth, mdd),

        var95: value_at_risk(returns, 0.95),
        var99_monthly: monthly_value_at_risk(returns, dates, 0.99),
        cvar95: conditional_value_at_risk(returns, 0.95),
        cvar99: conditional_value_at_risk(returns, 0.99),

        gini_coefficient: gini_coefficient(returns),
        omega_ratio: omega_ratio(returns),
        gain_pain_ratio: gain_pain_ratio(returns, dates),
        tail_ratio: tail_ratio(returns),
        outlier_win_ratio: outlier_win_ratio(returns),
        outlier_loss_ratio: outlier_loss_ratio(returns),

        rolling_sharpe_90d_mean: short.mean,
        rolling_sharpe_90d_median: short.median,
        rolling_sharpe_90d_last: short.last,
        rolling_sharpe_365d_mean: long.mean,
        rolling_sharpe_365d_median: long.median,
        rolling_sharpe_365d_last: long.last,

        mtd: month_to_date(returns, dates, as_of),
        return_3m: trailing_return(returns, config.short_period),
        return_6m: trailing_return(returns, config.long_period),
        ytd: year_to_date(returns, dates, as_of),

        best_day: best_day(returns),
        worst_day: worst_day(returns),
        best_month: best(&monthly),
        worst_month: worst(&monthly),
        best_year: best(&yearly),
        worst_year: worst(&yearly),

        skew: skew(returns),
        kurtosis: kurtosis(returns),
    })
}

/// Serde adapter writing non-finite floats as strings.
mod unbounded {
    use serde::{Deserialize, Deserializer, Serializer};

    pub(super) fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_finite() {
            serializer.serialize_f64(*value)
        } else if value.is_nan() {
            serializer.serialize_str("NaN")
        } else if value.is_sign_positive() {
            serializer.serialize_str("Infinity")
        } else {
            serializer.serialize_str("-Infinity")
        }
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Number(f64),
        Text(String),
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        match Repr::deserialize(deserializer)? {
            Repr::Number(v) => Ok(v),
            Repr::Text(s) => match s.as_str() {
                "Infinity" => Ok(f64::INFINITY),
                "-Infinity" => Ok(f64::NEG_INFINITY),
                "NaN" => Ok(f64::NAN),
                other => Err(serde::de::Error::custom(format!(
                    "expected a number or Infinity, got '{other}'"
                ))),
            },
        }
    }
}
