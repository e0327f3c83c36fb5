//! Risk and risk-adjusted return metrics.
//!
//! Every function takes simple daily returns. Annualized figures scale by
//! `periods_per_year` (252 for trading days).

use crate::stats::{mean, population_std, quantile_sorted, sorted};

/// Annualized volatility: population standard deviation times `sqrt(periods)`.
///
/// 0 with fewer than two returns.
pub fn volatility(returns: &[f64], periods_per_year: f64) -> f64 {
    if returns.len() < 2 {
        return 0.0;
    }
    population_std(returns) * periods_per_year.sqrt()
}

/// Annualized mean over annualized volatility, risk-free rate of zero.
///
/// 0 when volatility is 0 or with fewer than two returns.
pub fn sharpe_ratio(returns: &[f64], periods_per_year: f64) -> f64 {
    let vol = volatility(returns, periods_per_year);
    if vol == 0.0 {
        return 0.0;
    }
    mean(returns) * periods_per_year / vol
}

/// Annualized mean over annualized downside deviation.
///
/// Downside deviation is `sqrt(sum(r^2 for r < 0) / n)` over all `n` returns.
/// `f64::INFINITY` when no return is negative.
pub fn sortino_ratio(returns: &[f64], periods_per_year: f64) -> f64 {
    if returns.len() < 2 {
        return 0.0;
    }
    let negatives: Vec<f64> = returns.iter().copied().filter(|r| *r < 0.0).collect();
    if negatives.is_empty() {
        return f64::INFINITY;
    }

    let downside_variance = negatives.iter().map(|r| r * r).sum::<f64>() / returns.len() as f64;
    let downside = downside_variance.sqrt() * periods_per_year.sqrt();
    if downside == 0.0 {
        return 0.0;
    }
    mean(returns) * periods_per_year / downside
}

/// CAGR over the magnitude of the maximum drawdown, 0 without a drawdown.
pub const fn calmar_ratio(cagr: f64, max_drawdown: f64) -> f64 {
    if max_drawdown == 0.0 {
        return 0.0;
    }
    cagr / max_drawdown.abs()
}

/// Historical value at risk: the sorted return at `floor((1 - confidence) * n)`.
pub fn value_at_risk(returns: &[f64], confidence: f64) -> f64 {
    quantile_sorted(&sorted(returns), 1.0 - confidence)
}

/// Mean of the returns at or below the value at risk.
pub fn conditional_value_at_risk(returns: &[f64], confidence: f64) -> f64 {
    let var = value_at_risk(returns, confidence);
    let tail: Vec<f64> = returns.iter().copied().filter(|r| *r <= var).collect();
    if tail.is_empty() {
        return var;
    }
    mean(&tail)
}

/// Sum of gains over the magnitude of the sum of losses.
///
/// `f64::INFINITY` when there are no losses.
pub fn omega_ratio(returns: &[f64]) -> f64 {
    let gains: f64 = returns.iter().filter(|r| **r > 0.0).sum();
    let losses: f64 = returns.iter().filter(|r| **r < 0.0).map(|r| r.abs()).sum();
    if losses == 0.0 {
        return f64::INFINITY;
    }
    gains / losses
}

/// `|P95 / P5|` of the return distribution.
///
/// `f64::INFINITY` when the 5th percentile is exactly 0; 0 for an empty series.
pub fn tail_ratio(returns: &[f64]) -> f64 {
    if returns.is_empty() {
        return 0.0;
    }
    let ordered = sorted(returns);
    let p95 = quantile_sorted(&ordered, 0.95);
    let p5 = quantile_sorted(&ordered, 0.05);
    if p5 == 0.0 {
        return f64::INFINITY;
    }
    (p95 / p5).abs()
}

/// Gini coefficient of absolute returns, from the area under the Lorenz curve.
pub fn gini_coefficient(returns: &[f64]) -> f64 {
    if returns.is_empty() {
        return 0.0;
    }
    let abs: Vec<f64> = returns.iter().map(|r| r.abs()).collect();
    let ordered = sorted(&abs);
    let total: f64 = ordered.iter().sum();
    if total == 0.0 {
        return 0.0;
    }

    let (_, area) = ordered.iter().fold((0.0, 0.0), |(running, area), v| {
        let running = running + v;
        (running, area + running / total)
    });
    1.0 - 2.0 * area / ordered.len() as f64
}

/// Share of returns above the 99th percentile that are also positive.
pub fn outlier_win_ratio(returns: &[f64]) -> f64 {
    if returns.is_empty() {
        return 0.0;
    }
    let p99 = quantile_sorted(&sorted(returns), 0.99);
    let count = returns.iter().filter(|r| **r > p99 && **r > 0.0).count();
    count as f64 / returns.len() as f64
}

/// Share of returns below the 1st percentile that are also negative.
pub fn outlier_loss_ratio(returns: &[f64]) -> f64 {
    if returns.is_empty() {
        return 0.0;
    }
    let p1 = quantile_sorted(&sorted(returns), 0.01);
    let count = returns.iter().filter(|r| **r < p1 && **r < 0.0).count();
    count as f64 / returns.len() as f64
}

/// Population skewness, 0 with fewer than three returns or zero dispersion.
pub fn skew(returns: &[f64]) -> f64 {
    standardized_moment(returns, 3, 3)
}

/// Population excess kurtosis, 0 with fewer than four returns or zero dispersion.
pub fn kurtosis(returns: &[f64]) -> f64 {
    let m4 = standardized_moment(returns, 4, 4);
    if m4 == 0.0 { 0.0 } else { m4 - 3.0 }
}

fn standardized_moment(returns: &[f64], order: i32, min_len: usize) -> f64 {
    if returns.len() < min_len {
        return 0.0;
    }
    let sd = population_std(returns);
    if sd == 0.0 {
        return 0.0;
    }
    let m = mean(returns);
    returns.iter().map(|r| ((r - m) / sd).powi(order)).sum::<f64>() / returns.len() as f64
}
