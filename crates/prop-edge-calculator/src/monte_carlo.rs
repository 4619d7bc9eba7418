//! Monte-Carlo estimators for the simulated stat families.
//!
//! Trials are split into fixed-size chunks that run in parallel on rayon.
//! Each chunk owns a `StdRng` seeded from the caller's RNG, so a seeded
//! caller gets the same answer regardless of thread scheduling.

use distributions::{bootstrap_sum, mean, population_std_dev, sample_poisson, DistributionError};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

const TRIALS_PER_CHUNK: usize = 1_000;

fn chunk_plan<R: Rng + ?Sized>(trials: usize, rng: &mut R) -> Vec<(u64, usize)> {
    let mut plan = Vec::with_capacity(trials / TRIALS_PER_CHUNK + 1);
    let mut remaining = trials;
    while remaining > 0 {
        let size = remaining.min(TRIALS_PER_CHUNK);
        plan.push((rng.gen::<u64>(), size));
        remaining -= size;
    }
    plan
}

/// Fraction of trials in which the sum of independent Poisson draws, one
/// per rate in `lambdas`, reaches `line`.
pub fn compound_poisson_over<R: Rng + ?Sized>(
    lambdas: &[f64],
    line: f64,
    trials: usize,
    rng: &mut R,
) -> Result<f64, DistributionError> {
    if trials == 0 {
        return Err(DistributionError::InvalidParameter(
            "Monte-Carlo needs at least one trial".to_string(),
        ));
    }

    let hits: usize = chunk_plan(trials, rng)
        .into_par_iter()
        .map(|(seed, size)| -> Result<usize, DistributionError> {
            let mut chunk_rng = StdRng::seed_from_u64(seed);
            let mut hits = 0_usize;
            for _ in 0..size {
                let mut total = 0_u64;
                for &lambda in lambdas {
                    total += sample_poisson(lambda, &mut chunk_rng)?;
                }
                if total as f64 >= line {
                    hits += 1;
                }
            }
            Ok(hits)
        })
        .collect::<Result<Vec<usize>, DistributionError>>()?
        .into_iter()
        .sum();

    Ok(hits as f64 / trials as f64)
}

/// Distribution of bootstrap totals
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BootstrapSummary {
    pub over_probability: f64,
    pub mean: f64,
    pub std_dev: f64,
}

/// Resamples `draws` values per trial from `samples` and summarises how
/// often the total reaches `line`. `None` when there is nothing to resample.
pub fn bootstrap_over<R: Rng + ?Sized>(
    samples: &[f64],
    draws: usize,
    line: f64,
    trials: usize,
    rng: &mut R,
) -> Option<BootstrapSummary> {
    if samples.is_empty() || trials == 0 {
        return None;
    }

    let totals: Vec<f64> = chunk_plan(trials, rng)
        .into_par_iter()
        .flat_map_iter(|(seed, size)| {
            let mut chunk_rng = StdRng::seed_from_u64(seed);
            (0..size)
                .map(|_| bootstrap_sum(samples, draws, &mut chunk_rng).unwrap_or(0.0))
                .collect::<Vec<f64>>()
        })
        .collect();

    let hits = totals.iter().filter(|total| **total >= line).count();

    Some(BootstrapSummary {
        over_probability: hits as f64 / totals.len() as f64,
        mean: mean(&totals)?,
        std_dev: population_std_dev(&totals)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use distributions::poisson_cdf;

    #[test]
    fn test_compound_matches_poisson_sum() {
        // Sum of independent Poissons is Poisson(9 + 11)
        let exact = 1.0 - poisson_cdf(21, 20.0).unwrap();
        for seed in [1_u64, 2, 3, 4, 5] {
            let mut rng = StdRng::seed_from_u64(seed);
            let estimate = compound_poisson_over(&[9.0, 11.0], 22.0, 50_000, &mut rng).unwrap();
            assert!(
                (estimate - exact).abs() < 0.02,
                "seed {} estimate {} exact {}",
                seed,
                estimate,
                exact
            );
        }
    }

    #[test]
    fn test_compound_is_reproducible_from_seed() {
        let mut a = StdRng::seed_from_u64(99);
        let mut b = StdRng::seed_from_u64(99);
        let first = compound_poisson_over(&[9.0, 11.0], 22.0, 10_000, &mut a).unwrap();
        let second = compound_poisson_over(&[9.0, 11.0], 22.0, 10_000, &mut b).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_compound_rejects_zero_trials() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(compound_poisson_over(&[1.0], 1.0, 0, &mut rng).is_err());
    }

    #[test]
    fn test_bootstrap_constant_samples() {
        let mut rng = StdRng::seed_from_u64(5);
        let summary = bootstrap_over(&[4.0, 4.0, 4.0], 3, 12.0, 2_500, &mut rng).unwrap();
        assert_eq!(summary.over_probability, 1.0);
        assert!((summary.mean - 12.0).abs() < 1e-9);
        assert!(summary.std_dev.abs() < 1e-9);
    }

    #[test]
    fn test_bootstrap_empty_samples() {
        let mut rng = StdRng::seed_from_u64(5);
        assert!(bootstrap_over(&[], 3, 12.0, 100, &mut rng).is_none());
    }
}
