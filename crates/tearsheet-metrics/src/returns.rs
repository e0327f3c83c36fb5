//! Return-level metrics: total, annualized, trailing and calendar-to-date.

use crate::stats::compound;
use chrono::{Datelike, NaiveDate};

/// Compounded return over the whole series.
///
/// # Examples
///
/// ```
/// use tearsheet_metrics::returns::cumulative_return;
///
/// let total = cumulative_return(&[0.10, -0.10]);
/// assert!((total - -0.01).abs() < 1e-12);
/// ```
pub fn cumulative_return(returns: &[f64]) -> f64 {
    compound(returns)
}

/// Compound annual growth rate from a cumulative return and a span in years.
///
/// 0 when the span is not positive.
pub fn cagr(cumulative: f64, years: f64) -> f64 {
    if years <= 0.0 {
        return 0.0;
    }
    (1.0 + cumulative).powf(1.0 / years) - 1.0
}

/// Compounded return of the last `positions` returns (all of them if shorter).
pub fn trailing_return(returns: &[f64], positions: usize) -> f64 {
    let start = returns.len().saturating_sub(positions);
    compound(&returns[start..])
}

/// Compounded return from the first date in the month of `as_of` through the
/// end of the series. 0 if no date falls in that month.
pub fn month_to_date(returns: &[f64], dates: &[NaiveDate], as_of: NaiveDate) -> f64 {
    since_first(returns, dates, |d| {
        d.year() == as_of.year() && d.month() == as_of.month()
    })
}

/// Compounded return from the first date in the year of `as_of` through the
/// end of the series. 0 if no date falls in that year.
pub fn year_to_date(returns: &[f64], dates: &[NaiveDate], as_of: NaiveDate) -> f64 {
    since_first(returns, dates, |d| d.year() == as_of.year())
}

fn since_first(returns: &[f64], dates: &[NaiveDate], pred: impl Fn(&NaiveDate) -> bool) -> f64 {
    dates
        .iter()
        .position(pred)
        .map_or(0.0, |start| compound(&returns[start.min(returns.len())..]))
}

/// Largest single return, 0 for an empty series.
pub fn best_day(returns: &[f64]) -> f64 {
    returns.iter().copied().reduce(f64::max).unwrap_or(0.0)
}

/// Smallest single return, 0 for an empty series.
pub fn worst_day(returns: &[f64]) -> f64 {
    returns.iter().copied().reduce(f64::min).unwrap_or(0.0)
}
