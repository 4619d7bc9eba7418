//! Small-sample summary statistics over recent game logs.

use statrs::statistics::Statistics;

/// Arithmetic mean, `None` for an empty sample.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.mean())
}

/// Population standard deviation (divides by `n`), `None` for an empty sample.
pub fn population_std_dev(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.population_std_dev())
}

/// Weighted mean over the overlapping prefix of `values` and `weights`,
/// renormalised by the weights actually used.
pub fn weighted_mean(values: &[f64], weights: &[f64]) -> Option<f64> {
    let used: f64 = weights.iter().take(values.len()).sum();
    if values.is_empty() || used <= 0.0 {
        return None;
    }
    let total: f64 = values.iter().zip(weights).map(|(v, w)| v * w).sum();
    Some(total / used)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_mean_and_population_std_dev() {
        let rebounds = [8.0, 11.0, 9.0, 13.0, 7.0];
        assert_relative_eq!(mean(&rebounds).unwrap(), 9.6);
        // variance = (2.56 + 1.96 + 0.36 + 11.56 + 6.76) / 5 = 4.64
        assert_relative_eq!(population_std_dev(&rebounds).unwrap(), 4.64_f64.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn test_empty_sample() {
        assert!(mean(&[]).is_none());
        assert!(population_std_dev(&[]).is_none());
        assert!(weighted_mean(&[], &[0.4, 0.3]).is_none());
    }

    #[test]
    fn test_weighted_mean_renormalises_short_history() {
        let weights = [0.4, 0.3, 0.2, 0.1];
        assert_relative_eq!(weighted_mean(&[10.0, 6.0, 8.0, 4.0], &weights).unwrap(), 7.8, epsilon = 1e-12);
        // Two games: (0.4 * 10 + 0.3 * 6) / 0.7
        assert_relative_eq!(weighted_mean(&[10.0, 6.0], &weights).unwrap(), 5.8 / 0.7, epsilon = 1e-12);
    }
}
