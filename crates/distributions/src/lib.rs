//! Distribution Library
//!
//! Stateless probability primitives used by the prop pricer: Poisson and
//! binomial mass/cumulative functions, an Abramowitz-Stegun normal CDF, a
//! Knuth Poisson sampler and small-sample summary statistics.

pub mod continuous;
pub mod discrete;
pub mod sampling;
pub mod summary;

pub use continuous::{erf, normal_cdf};
pub use discrete::{
    binomial_cdf, binomial_pmf, combination, factorial, ln_choose, ln_factorial, poisson_cdf,
    poisson_pmf,
};
pub use sampling::{bootstrap_sum, sample_poisson};
pub use summary::{mean, population_std_dev, weighted_mean};

/// Errors raised when a distribution is evaluated outside its domain.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DistributionError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

pub(crate) fn check_rate(lambda: f64) -> Result<(), DistributionError> {
    if !lambda.is_finite() || lambda < 0.0 {
        return Err(DistributionError::InvalidParameter(format!(
            "Poisson rate must be finite and >= 0, got {}",
            lambda
        )));
    }
    Ok(())
}
