//! Poisson and binomial distributions.
//!
//! Mass functions are evaluated in log space so large counts or trial numbers
//! never overflow a factorial.

use statrs::function::factorial as sf;

use crate::{check_rate, DistributionError};

/// `n!` as a float. Overflows to infinity above `170!`; prefer
/// [`ln_factorial`] for anything that feeds a ratio.
pub fn factorial(n: u64) -> f64 {
    sf::factorial(n)
}

pub fn ln_factorial(n: u64) -> f64 {
    sf::ln_factorial(n)
}

/// `ln C(n, k)`, or negative infinity when `k > n`.
pub fn ln_choose(n: u64, k: u64) -> f64 {
    if k > n {
        return f64::NEG_INFINITY;
    }
    sf::ln_binomial(n, k)
}

/// `C(n, k)` via the multiplicative form, which stays exact for small
/// arguments and never builds an intermediate factorial.
pub fn combination(n: u64, k: u64) -> f64 {
    if k > n {
        return 0.0;
    }
    let k = k.min(n - k);
    let mut result = 1.0_f64;
    for i in 0..k {
        result = result * (n - i) as f64 / (i + 1) as f64;
    }
    result
}

/// `P(X = k)` for `X ~ Poisson(lambda)`.
pub fn poisson_pmf(k: u64, lambda: f64) -> Result<f64, DistributionError> {
    check_rate(lambda)?;
    if lambda == 0.0 {
        return Ok(if k == 0 { 1.0 } else { 0.0 });
    }
    let ln_p = k as f64 * lambda.ln() - lambda - ln_factorial(k);
    Ok(ln_p.exp())
}

/// `P(X <= k)` for `X ~ Poisson(lambda)`.
///
/// Past the mode the terms only shrink, so summation stops once they no
/// longer move the total. Very large `k` costs the same as `k` near the tail.
pub fn poisson_cdf(k: u64, lambda: f64) -> Result<f64, DistributionError> {
    check_rate(lambda)?;
    let mut sum = 0.0;
    for i in 0..=k {
        let term = poisson_pmf(i, lambda)?;
        if i as f64 > lambda && sum + term == sum {
            break;
        }
        sum += term;
    }
    Ok(sum.clamp(0.0, 1.0))
}

fn check_success_rate(p: f64) -> Result<(), DistributionError> {
    if !p.is_finite() || !(0.0..=1.0).contains(&p) {
        return Err(DistributionError::InvalidParameter(format!(
            "success probability must be within [0, 1], got {}",
            p
        )));
    }
    Ok(())
}

/// `P(X = k)` for `X ~ Binomial(n, p)`.
pub fn binomial_pmf(k: u64, n: u64, p: f64) -> Result<f64, DistributionError> {
    check_success_rate(p)?;
    if k > n {
        return Ok(0.0);
    }
    if p == 0.0 {
        return Ok(if k == 0 { 1.0 } else { 0.0 });
    }
    if p == 1.0 {
        return Ok(if k == n { 1.0 } else { 0.0 });
    }
    let ln_p = ln_choose(n, k) + k as f64 * p.ln() + (n - k) as f64 * (1.0 - p).ln();
    Ok(ln_p.exp())
}

/// `P(X <= k)` for `X ~ Binomial(n, p)`. Exactly 1 once `k >= n`.
pub fn binomial_cdf(k: u64, n: u64, p: f64) -> Result<f64, DistributionError> {
    check_success_rate(p)?;
    if k >= n {
        return Ok(1.0);
    }
    let mut sum = 0.0;
    for i in 0..=k {
        sum += binomial_pmf(i, n, p)?;
    }
    Ok(sum.clamp(0.0, 1.0))
}
