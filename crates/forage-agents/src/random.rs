//! Seedable randomness for every stochastic decision in a run.
//!
//! A single [`SimRng`] is created from the configured seed and threaded by
//! `&mut` through founder placement, movement, reproduction, and sampling.
//! The helpers here accept any [`Rng`] so tests can substitute a cheaper
//! generator.

use std::f64::consts::TAU;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Poisson};

use crate::config::TraitRange;
use crate::error::AgentError;

/// Generator used by the simulation.
pub type SimRng = StdRng;

/// Lower bound (inclusive) of the reproductive age, in ticks.
pub const REPRODUCTIVE_AGE_MIN: u32 = 336;

/// Upper bound (exclusive) of the reproductive age, in ticks.
pub const REPRODUCTIVE_AGE_MAX: u32 = 504;

/// Build the simulation generator from a seed.
pub fn seeded(seed: u64) -> SimRng {
    StdRng::seed_from_u64(seed)
}

/// Draw from a Poisson distribution with the given mean.
///
/// A mean of zero or below yields 0 without consuming randomness. Samples
/// beyond `u32::MAX` saturate.
///
/// # Errors
///
/// Returns [`AgentError::Distribution`] if the mean is not finite or too
/// large for the sampler.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn poisson(rng: &mut impl Rng, mean: f64) -> Result<u32, AgentError> {
    if mean.is_nan() {
        return Err(AgentError::Distribution {
            reason: String::from("poisson mean is NaN"),
        });
    }
    if mean <= 0.0 {
        return Ok(0);
    }
    let dist = Poisson::new(mean).map_err(|e| AgentError::Distribution {
        reason: format!("poisson mean {mean}: {e}"),
    })?;
    let sample: f64 = dist.sample(rng);
    Ok(sample as u32)
}

/// Uniform heading in `[0, 2*pi)`.
pub fn heading(rng: &mut impl Rng) -> f64 {
    rng.random_range(0.0..TAU)
}

/// Uniform value in `[range.min, range.max]`.
///
/// A degenerate range returns its lower bound without consuming randomness.
pub fn uniform_in(rng: &mut impl Rng, range: TraitRange) -> f64 {
    if range.min < range.max {
        rng.random_range(range.min..=range.max)
    } else {
        range.min
    }
}

/// Uniform turning perturbation in `[-diversion, diversion]`.
pub fn turn(rng: &mut impl Rng, diversion: f64) -> f64 {
    if diversion > 0.0 {
        rng.random_range(-diversion..=diversion)
    } else {
        0.0
    }
}

/// Bernoulli trial that succeeds with probability `p`.
pub fn chance(rng: &mut impl Rng, p: f64) -> bool {
    rng.random::<f64>() < p
}

/// Age at which a newborn becomes reproductive.
pub fn reproductive_age(rng: &mut impl Rng) -> u32 {
    rng.random_range(REPRODUCTIVE_AGE_MIN..REPRODUCTIVE_AGE_MAX)
}
