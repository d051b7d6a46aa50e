//! Random sampling routines for network construction: per-person vulnerability multipliers and
//! power-law degree draws. These are written to be generic over the random source, which is
//! threaded in explicitly so every draw is reproducible from a single seed.

use rand::Rng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

use crate::error::EpinetError;

/// Mean of the vulnerability distribution. A vulnerability of 1.0 represents the population
/// average.
pub const VULNERABILITY_MEAN: f64 = 1.0;
/// Standard deviation of the vulnerability distribution, based on U.S. national percentages of
/// elderly and immunocompromised individuals.
pub const VULNERABILITY_SD: f64 = 0.556;
/// A vulnerability multiplier at or below zero makes no sense, so draws are floored here.
pub const VULNERABILITY_FLOOR: f64 = 0.1;

/// Convergence threshold for the Newton iteration. Degree outputs are integers, so an extreme
/// degree of accuracy is unnecessary.
const CONVERGENCE_DELTA: f64 = 0.0001;
/// Iteration bound for a single Newton solve. Non-convergence within this bound is treated as a
/// failed attempt, not an infinite loop.
const MAX_NEWTON_ITERATIONS: usize = 10_000;
/// Number of fresh uniform draws to try before giving up on the degree sampler entirely.
const MAX_SAMPLE_ATTEMPTS: usize = 8;

/// Shape parameters of the power-law degree distribution
/// `p_k = C·k^(-alpha)·exp(-k/kappa)` (Meyers et al.).
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DegreeDistribution {
    pub alpha: f64,
    pub kappa: f64,
    pub scale: f64,
}

impl DegreeDistribution {
    /// # Errors
    ///
    /// Returns an `EpinetError` if any shape parameter is not strictly positive.
    pub fn new(alpha: f64, kappa: f64, scale: f64) -> Result<Self, EpinetError> {
        let distribution = DegreeDistribution {
            alpha,
            kappa,
            scale,
        };
        distribution.validate()?;
        Ok(distribution)
    }

    /// # Errors
    ///
    /// Returns an `EpinetError` if any shape parameter is not strictly positive.
    pub fn validate(&self) -> Result<(), EpinetError> {
        // NaN fails both orderings, so it needs its own check.
        let nonpositive = |x: f64| x <= 0.0 || x.is_nan();
        if nonpositive(self.alpha) || nonpositive(self.kappa) || nonpositive(self.scale) {
            return Err(EpinetError::EpinetError(format!(
                "degree distribution parameters must be positive (alpha={}, kappa={}, scale={})",
                self.alpha, self.kappa, self.scale
            )));
        }
        Ok(())
    }
}

/// Draws one vulnerability multiplier from Normal(`VULNERABILITY_MEAN`, `VULNERABILITY_SD`),
/// floored at `VULNERABILITY_FLOOR`.
pub fn sample_vulnerability<R: Rng>(rng: &mut R) -> f64 {
    let normal = Normal::new(VULNERABILITY_MEAN, VULNERABILITY_SD).unwrap();
    let v: f64 = normal.sample(rng);
    v.max(VULNERABILITY_FLOOR)
}

/// Draws one degree from the power-law distribution, clamped to `max_degree`.
///
/// The density equation `p_k = C·k^(-alpha)·exp(-k/kappa)` with `p_k = u` is transcendental in
/// `k`, so it is solved numerically via Newton's method on the equivalent form
/// `f(k) = alpha·kappa·ln(k) + k - kappa·ln(C/u) = 0`. An attempt that diverges (or wanders into
/// `k ≤ 0`, where `ln(k)` is undefined) is retried with a fresh uniform draw.
///
/// # Errors
///
/// Returns an `EpinetError` if no attempt converges within `MAX_SAMPLE_ATTEMPTS` fresh draws.
/// With valid shape parameters this indicates a defect, not a recoverable condition.
pub fn sample_power_law_degree<R: Rng>(
    rng: &mut R,
    distribution: &DegreeDistribution,
    max_degree: usize,
) -> Result<usize, EpinetError> {
    for _ in 0..MAX_SAMPLE_ATTEMPTS {
        // Uniform over (0, 1); u = 0 would put ln(C/u) at infinity.
        let u = loop {
            let u: f64 = rng.random();
            if u > 0.0 {
                break u;
            }
        };

        if let Some(degree) = newton_degree(distribution, u) {
            return Ok(degree.min(max_degree));
        }
    }

    Err(EpinetError::EpinetError(format!(
        "degree sampling failed to converge after {MAX_SAMPLE_ATTEMPTS} attempts \
         (alpha={}, kappa={}, scale={})",
        distribution.alpha, distribution.kappa, distribution.scale
    )))
}

/// One Newton solve of `f(k) = alpha·kappa·ln(k) + k - kappa·ln(C/u) = 0`, starting from
/// `k₀ = 1.0` with derivative `f'(k) = (alpha·kappa + k)/k`. Returns the root rounded to the
/// nearest non-negative integer, or `None` if the iteration diverges.
fn newton_degree(distribution: &DegreeDistribution, u: f64) -> Option<usize> {
    let DegreeDistribution {
        alpha,
        kappa,
        scale,
    } = *distribution;
    let target = kappa * (scale / u).ln();

    let mut k = 1.0_f64;
    for _ in 0..MAX_NEWTON_ITERATIONS {
        if k <= 0.0 {
            return None;
        }
        let fk = alpha * kappa * k.ln() + k - target;
        let dfk = (alpha * kappa + k) / k;
        let next = k - fk / dfk;
        if (next - k).abs() <= CONVERGENCE_DELTA {
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            return Some(next.round().max(0.0) as usize);
        }
        k = next;
    }

    None
}
