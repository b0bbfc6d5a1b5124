//! The process-wide random generator.

use std::sync::{Mutex, PoisonError};

use rand::rngs::{OsRng, StdRng};
use rand::{Rng, SeedableRng};

use crate::error::{CoreError, Result};

/// A seedable random source shared by every handler in the process.
///
/// All sampling goes through one internal PRNG behind a mutex, and every
/// draw advances a position counter, so the order of draws is well defined
/// relative to lock acquisition. Seeding is either explicit (deterministic
/// replay) or derived from the platform entropy source.
pub struct Generator {
    seed: u64,
    inner: Mutex<Inner>,
}

struct Inner {
    rng: StdRng,
    position: u64,
}

impl Generator {
    /// Create a generator seeded from the platform entropy source.
    pub fn from_entropy() -> Self {
        Self::from_seed(OsRng.gen())
    }

    /// Create a generator with an explicit seed.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            seed,
            inner: Mutex::new(Inner {
                rng: StdRng::seed_from_u64(seed),
                position: 0,
            }),
        }
    }

    /// The seed this generator was constructed with.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Number of samples drawn so far.
    pub fn position(&self) -> u64 {
        self.lock().position
    }

    /// Draw and drop `n` samples.
    pub fn discard(&self, n: u64) {
        let mut inner = self.lock();
        for _ in 0..n {
            let _: u64 = inner.rng.gen();
        }
        inner.position += n;
    }

    /// Uniform integer in the inclusive range `[low, high]`.
    pub fn uniform_integer(&self, low: u64, high: u64) -> Result<u64> {
        if low > high {
            return Err(CoreError::BadValues);
        }
        let mut inner = self.lock();
        inner.position += 1;
        Ok(inner.rng.gen_range(low..=high))
    }

    /// Uniform real in the half-open range `[low, high)`.
    pub fn uniform_real(&self, low: f64, high: f64) -> Result<f64> {
        if !(low <= high) || !low.is_finite() || !high.is_finite() {
            return Err(CoreError::BadValues);
        }
        let mut inner = self.lock();
        inner.position += 1;
        if low == high {
            return Ok(low);
        }
        Ok(inner.rng.gen_range(low..high))
    }

    /// Index into `weights` drawn with probability proportional to each
    /// weight.
    pub fn weighted_integer(&self, weights: &[f64]) -> Result<u64> {
        if weights.is_empty() {
            return Err(CoreError::ZeroLength);
        }
        let total: f64 = weights.iter().sum();
        if !total.is_finite() || total <= 0.0 || weights.iter().any(|w| *w < 0.0) {
            return Err(CoreError::BadValues);
        }
        let mut sample = self.uniform_real(0.0, total)?;
        for (index, weight) in weights.iter().enumerate() {
            if sample < *weight {
                return Ok(index as u64);
            }
            sample -= weight;
        }
        Err(CoreError::Internal("unreachable code reached"))
    }

    /// One fair coin flip.
    pub fn bit(&self) -> bool {
        let mut inner = self.lock();
        inner.position += 1;
        inner.rng.gen()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
