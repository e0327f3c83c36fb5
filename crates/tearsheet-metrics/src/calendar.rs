//! Calendar bucketing of daily returns.
//!
//! Each return is assigned to the month and year of its paired date and
//! compounded within the bucket.

use crate::stats::{quantile_sorted, sorted};
use chrono::{Datelike, NaiveDate};
use std::collections::BTreeMap;

/// Compounded return per `(year, month)`, in chronological order.
pub fn monthly_returns(returns: &[f64], dates: &[NaiveDate]) -> BTreeMap<(i32, u32), f64> {
    bucket(returns, dates, |d| (d.year(), d.month()))
}

/// Compounded return per calendar year, in chronological order.
pub fn yearly_returns(returns: &[f64], dates: &[NaiveDate]) -> BTreeMap<i32, f64> {
    bucket(returns, dates, |d| d.year())
}

fn bucket<K: Ord>(
    returns: &[f64],
    dates: &[NaiveDate],
    key: impl Fn(&NaiveDate) -> K,
) -> BTreeMap<K, f64> {
    let mut growth: BTreeMap<K, f64> = BTreeMap::new();
    for (date, r) in dates.iter().zip(returns) {
        *growth.entry(key(date)).or_insert(1.0) *= 1.0 + r;
    }
    growth.values_mut().for_each(|g| *g -= 1.0);
    growth
}

/// Largest bucket value, 0 when there are no buckets.
pub fn best<K>(buckets: &BTreeMap<K, f64>) -> f64 {
    buckets.values().copied().reduce(f64::max).unwrap_or(0.0)
}

/// Smallest bucket value, 0 when there are no buckets.
pub fn worst<K>(buckets: &BTreeMap<K, f64>) -> f64 {
    buckets.values().copied().reduce(f64::min).unwrap_or(0.0)
}

/// Value at risk over monthly returns at `confidence`.
pub fn monthly_value_at_risk(returns: &[f64], dates: &[NaiveDate], confidence: f64) -> f64 {
    let monthly: Vec<f64> = monthly_returns(returns, dates).into_values().collect();
    quantile_sorted(&sorted(&monthly), 1.0 - confidence)
}

/// Sum of positive monthly returns over the magnitude of the non-positive ones.
///
/// `f64::INFINITY` when no month lost money but some gained; 0 when neither.
pub fn gain_pain_ratio(returns: &[f64], dates: &[NaiveDate]) -> f64 {
    let monthly = monthly_returns(returns, dates);
    let (gain, pain) = monthly.values().fold((0.0, 0.0), |(gain, pain), m| {
        if *m > 0.0 {
            (gain + m, pain)
        } else {
            (gain, pain + m.abs())
        }
    });

    if pain == 0.0 {
        return if gain > 0.0 { f64::INFINITY } else { 0.0 };
    }
    gain / pain
}
