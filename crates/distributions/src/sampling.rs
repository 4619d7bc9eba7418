//! Random draws. Every sampler takes the caller's RNG so simulations can be
//! replayed from a seed.

use rand::Rng;

use crate::{check_rate, DistributionError};

/// Largest rate handed to a single Knuth draw; `e^-30` is still far from
/// underflow and keeps the expected loop length short.
const KNUTH_CHUNK: f64 = 30.0;

/// One draw from `Poisson(lambda)` using Knuth's product-of-uniforms method.
///
/// Rates above [`KNUTH_CHUNK`] are split into chunks whose independent draws
/// are summed, which leaves the distribution unchanged.
pub fn sample_poisson<R: Rng + ?Sized>(lambda: f64, rng: &mut R) -> Result<u64, DistributionError> {
    check_rate(lambda)?;

    let mut remaining = lambda;
    let mut total = 0_u64;
    while remaining > 0.0 {
        let step = remaining.min(KNUTH_CHUNK);
        total += knuth_draw(step, rng);
        remaining -= step;
    }
    Ok(total)
}

fn knuth_draw<R: Rng + ?Sized>(lambda: f64, rng: &mut R) -> u64 {
    let limit = (-lambda).exp();
    let mut k = 0_u64;
    let mut p = 1.0_f64;
    loop {
        k += 1;
        p *= rng.gen::<f64>();
        if p <= limit {
            return k - 1;
        }
    }
}

/// Sum of `draws` values resampled with replacement from `samples`.
pub fn bootstrap_sum<R: Rng + ?Sized>(samples: &[f64], draws: usize, rng: &mut R) -> Option<f64> {
    if samples.is_empty() {
        return None;
    }
    let total = (0..draws)
        .map(|_| samples[rng.gen_range(0..samples.len())])
        .sum();
    Some(total)
}
