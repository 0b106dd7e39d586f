//! Random sources for fault injection.

use std::sync::{Mutex, PoisonError};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of uniform samples in `[0, 1)`.
pub trait RandomSource: Send + Sync {
    fn next_unit(&self) -> f64;
}

/// Thread-local RNG. Used when no seed is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn next_unit(&self) -> f64 {
        rand::thread_rng().gen::<f64>()
    }
}

/// Deterministic RNG for reproducible runs.
#[derive(Debug)]
pub struct SeededRandom {
    rng: Mutex<StdRng>,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl RandomSource for SeededRandom {
    fn next_unit(&self) -> f64 {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        rng.gen::<f64>()
    }
}

/// Always returns the same sample.
///
/// `FixedRandom::new(0.0)` takes every failure branch with a non-zero rate and
/// the minimum delay; values close to 1 take the success branch and the
/// maximum delay.
#[derive(Debug, Clone, Copy)]
pub struct FixedRandom(f64);

impl FixedRandom {
    /// Values are clamped into `[0, 1)`.
    pub fn new(value: f64) -> Self {
        let value = if value.is_finite() { value } else { 0.0 };
        Self(value.clamp(0.0, 1.0 - f64::EPSILON))
    }
}

impl RandomSource for FixedRandom {
    fn next_unit(&self) -> f64 {
        self.0
    }
}
