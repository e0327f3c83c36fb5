//! Small descriptive-statistics helpers shared by the metric modules.

/// Arithmetic mean, 0 for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation (divides by n), 0 for an empty slice.
pub fn population_std(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    let variance = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// Ascending copy of `values`.
pub fn sorted(values: &[f64]) -> Vec<f64> {
    let mut out = values.to_vec();
    out.sort_by(f64::total_cmp);
    out
}

/// Element of an ascending slice at position `floor(q * n)`, clamped to the
/// last element. 0 for an empty slice.
pub fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let idx = ((q * sorted.len() as f64).floor().max(0.0) as usize).min(sorted.len() - 1);
    sorted[idx]
}

/// Compounded return of a run of simple returns.
pub fn compound(returns: &[f64]) -> f64 {
    returns.iter().fold(1.0, |acc, r| acc * (1.0 + r)) - 1.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    #[test]
    fn test_mean_and_std() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_relative_eq!(mean(&values), 5.0);
        assert_relative_eq!(population_std(&values), 2.0);
    }

    #[test]
    fn test_empty_inputs() {
        assert_eq!(mean(&[]), 0.0);
        assert_eq!(population_std(&[]), 0.0);
        assert_eq!(quantile_sorted(&[], 0.5), 0.0);
        assert_eq!(compound(&[]), 0.0);
    }

    #[rstest]
    #[case(0.0, 1.0)]
    #[case(0.5, 3.0)]
    #[case(0.95, 5.0)]
    #[case(1.0, 5.0)]
    fn test_quantile_index(#[case] q: f64, #[case] expected: f64) {
        let values = sorted(&[5.0, 3.0, 1.0, 4.0, 2.0]);
        assert_eq!(quantile_sorted(&values, q), expected);
    }

    #[test]
    fn test_compound() {
        assert_relative_eq!(compound(&[0.1, -0.1]), -0.01, epsilon = 1e-12);
    }
}
