//! Normal distribution via a fixed-coefficient error function.

// Abramowitz & Stegun 7.1.26, max absolute error 1.5e-7
const A1: f64 = 0.254829592;
const A2: f64 = -0.284496736;
const A3: f64 = 1.421413741;
const A4: f64 = -1.453152027;
const A5: f64 = 1.061405429;
const P: f64 = 0.3275911;

/// Error function approximation. Odd by construction: `erf(-x) == -erf(x)`.
pub fn erf(x: f64) -> f64 {
    let sign = if x < 0.0 { -1.0 } else { 1.0 };
    let x = x.abs();

    let t = 1.0 / (1.0 + P * x);
    let y = 1.0 - (((((A5 * t + A4) * t) + A3) * t + A2) * t + A1) * t * (-x * x).exp();

    sign * y
}

/// Standard normal CDF: `0.5 * (1 + erf(x / sqrt(2)))`.
pub fn normal_cdf(x: f64) -> f64 {
    0.5 * (1.0 + erf(x / std::f64::consts::SQRT_2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use statrs::distribution::{ContinuousCDF, Normal};

    #[test]
    fn test_normal_cdf_at_zero() {
        assert_relative_eq!(normal_cdf(0.0), 0.5, epsilon = 1e-6);
    }

    #[test]
    fn test_normal_cdf_symmetry() {
        let mut x = -6.0;
        while x <= 6.0 {
            assert_relative_eq!(normal_cdf(-x), 1.0 - normal_cdf(x), epsilon = 1e-6);
            x += 0.25;
        }
    }

    #[test]
    fn test_normal_cdf_matches_statrs() {
        let reference = Normal::new(0.0, 1.0).unwrap();
        for &x in &[-3.0, -1.96, -0.5, 0.3, 1.0, 2.5] {
            assert_relative_eq!(normal_cdf(x), reference.cdf(x), epsilon = 1e-6);
        }
    }

    #[test]
    fn test_erf_bounds() {
        assert!(erf(10.0) <= 1.0);
        assert!(erf(-10.0) >= -1.0);
        assert_relative_eq!(erf(1.0), 0.8427007929, epsilon = 2e-7);
    }
}
