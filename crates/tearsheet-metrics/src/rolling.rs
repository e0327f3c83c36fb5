//! Rolling Sharpe ratio summaries.

use crate::stats::{mean, population_std, sorted};
use serde::{Deserialize, Serialize};

/// Mean, median and latest value of a rolling Sharpe series.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RollingSharpe {
    /// Mean across windows
    pub mean: f64,
    /// `sorted[floor(len / 2)]` across windows
    pub median: f64,
    /// Value of the most recent window
    pub last: f64,
}

/// Sharpe of every full window of `window` consecutive returns.
///
/// Each window scores `mean / population_std * sqrt(periods_per_year)`, or 0
/// when the window is flat. Empty when the series is shorter than `window`.
pub fn rolling_sharpe_series(returns: &[f64], window: usize, periods_per_year: f64) -> Vec<f64> {
    if window == 0 || returns.len() < window {
        return Vec::new();
    }
    let scale = periods_per_year.sqrt();
    returns
        .windows(window)
        .map(|w| {
            let sd = population_std(w);
            if sd == 0.0 { 0.0 } else { mean(w) / sd * scale }
        })
        .collect()
}

/// Summary of [`rolling_sharpe_series`]; all zeros when there is no full window.
pub fn rolling_sharpe(returns: &[f64], window: usize, periods_per_year: f64) -> RollingSharpe {
    let series = rolling_sharpe_series(returns, window, periods_per_year);
    let Some(last) = series.last().copied() else {
        return RollingSharpe::default();
    };
    let ordered = sorted(&series);
    RollingSharpe {
        mean: mean(&series),
        median: ordered[ordered.len() / 2],
        last,
    }
}
