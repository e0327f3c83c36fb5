//! Properties that must hold for any well-formed return series.

use approx::assert_relative_eq;
use chrono::{Duration, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tearsheet_metrics::{MetricsConfig, MetricsReport, compute_report};

fn dates(len: usize) -> Vec<NaiveDate> {
    let start = NaiveDate::from_ymd_opt(2022, 3, 1).unwrap();
    (0..len).map(|i| start + Duration::days(i as i64)).collect()
}

fn random_returns(seed: u64, len: usize, lo: f64, hi: f64) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..len).map(|_| rng.gen_range(lo..hi)).collect()
}

fn report(returns: &[f64]) -> MetricsReport {
    let dates = dates(returns.len());
    let anchor = dates[0] - Duration::days(1);
    let terminal = dates[dates.len() - 1];
    let config = MetricsConfig {
        as_of: Some(terminal),
        ..Default::default()
    };
    compute_report(returns, &dates, anchor, terminal, &config).unwrap()
}

#[test]
fn test_bounds_hold_for_random_series() {
    for seed in 0..20 {
        let returns = random_returns(seed, 400, -0.04, 0.04);
        let r = report(&returns);

        assert!(r.max_drawdown <= 0.0);
        assert!(r.max_drawdown >= -1.0);
        assert!(r.volatility >= 0.0);
        assert!(r.cvar95 <= r.var95);
        assert!(r.cvar99 <= r.var95);
        assert!(r.worst_day <= r.best_day);
        assert!(r.worst_month <= r.best_month);
        assert!(r.max_drawdown_duration <= returns.len() - 1);
        assert!(r.duration_of_md <= returns.len() - 1);
        assert!(r.drawdown_of_mdd >= r.max_drawdown - 1e-12);
        assert!((0.0..=1.0).contains(&r.outlier_win_ratio));
        assert!((0.0..=1.0).contains(&r.outlier_loss_ratio));
        assert_ne!(r.rolling_sharpe_365d_last, 0.0);
    }
}

#[test]
fn test_cumulative_matches_price_ratio() {
    let returns = random_returns(7, 250, -0.03, 0.03);
    let final_price = returns.iter().fold(100.0, |p, r| p * (1.0 + r));
    let r = report(&returns);

    assert_relative_eq!(r.cumulative_return, final_price / 100.0 - 1.0, max_relative = 1e-10);
}

#[test]
fn test_non_decreasing_series_has_no_drawdown() {
    let returns = random_returns(11, 300, 0.0, 0.02);
    let r = report(&returns);

    assert_eq!(r.max_drawdown, 0.0);
    assert_eq!(r.duration_of_md, 0);
    assert_eq!(r.max_drawdown_duration, 0);
    assert_eq!(r.calmar_ratio, 0.0);
    assert_eq!(r.sortino_ratio, f64::INFINITY);
    assert_eq!(r.omega_ratio, f64::INFINITY);
}

#[test]
fn test_any_loss_creates_drawdown() {
    let mut returns = random_returns(13, 50, 0.0, 0.02);
    returns[25] = -0.001;
    let r = report(&returns);

    assert!(r.max_drawdown < 0.0);
    assert!(r.sortino_ratio.is_finite());
}

#[test]
fn test_metrics_are_deterministic() {
    let returns = random_returns(3, 120, -0.05, 0.05);
    let first = serde_json::to_string(&report(&returns)).unwrap();
    let second = serde_json::to_string(&report(&returns)).unwrap();
    assert_eq!(first, second);
}
