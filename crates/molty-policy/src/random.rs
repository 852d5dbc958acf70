//! Injectable randomness for the policy.
//!
//! Two branches of the cascade are random: the explore roll and the flee
//! direction. Routing both through [`RandomSource`] keeps the engine a
//! pure function of its inputs and lets tests pin the outcome.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// A source of the two random choices the policy makes.
pub trait RandomSource {
    /// Return `true` with the given probability.
    ///
    /// Probabilities outside `0.0..=1.0` are clamped; NaN never succeeds.
    fn chance(&mut self, probability: f64) -> bool;

    /// Pick an index in `0..len` uniformly, or `None` when `len == 0`.
    fn pick(&mut self, len: usize) -> Option<usize>;
}

/// [`RandomSource`] backed by any [`rand::Rng`].
#[derive(Debug, Clone)]
pub struct RngSource<R> {
    rng: R,
}

impl<R: Rng> RngSource<R> {
    /// Wrap an existing generator.
    pub const fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RngSource<StdRng> {
    /// Deterministic source for reproducible runs.
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    /// Source seeded from the operating system.
    pub fn from_os() -> Self {
        Self::new(StdRng::from_os_rng())
    }
}

impl<R: Rng> RandomSource for RngSource<R> {
    fn chance(&mut self, probability: f64) -> bool {
        if probability.is_nan() || probability <= 0.0 {
            return false;
        }
        if probability >= 1.0 {
            return true;
        }
        self.rng.random_bool(probability)
    }

    fn pick(&mut self, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        Some(self.rng.random_range(0..len))
    }
}

/// Scripted [`RandomSource`] returning fixed answers.
///
/// `pick` is clamped to the last valid index.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FixedRandom {
    /// Answer for every [`RandomSource::chance`] call.
    pub chance: bool,
    /// Index for every [`RandomSource::pick`] call.
    pub pick: usize,
}

impl FixedRandom {
    /// A source that never rolls a success and always picks index 0.
    pub const fn never() -> Self {
        Self {
            chance: false,
            pick: 0,
        }
    }

    /// A source that always rolls a success and picks `pick`.
    pub const fn always(pick: usize) -> Self {
        Self { chance: true, pick }
    }
}

impl RandomSource for FixedRandom {
    fn chance(&mut self, _probability: f64) -> bool {
        self.chance
    }

    fn pick(&mut self, len: usize) -> Option<usize> {
        len.checked_sub(1).map(|last| self.pick.min(last))
    }
}
