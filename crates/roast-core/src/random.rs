//! Injectable randomness.
//!
//! Every random choice in the domain (canned line picks, task picks, the
//! task trigger gate) draws from a [`RandomSource`], so tests can pin the
//! outcome with a seed or a scripted sequence.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;

/// A source of uniform random draws.
///
/// Receivers are `&self` so a single source can be shared behind an `Arc`.
pub trait RandomSource: Send + Sync {
    /// A uniform draw from `[0, 1)`.
    fn next_f64(&self) -> f64;

    /// A uniform index in `0..len`. `len` must be non-zero.
    fn pick_index(&self, len: usize) -> usize;

    /// Bernoulli trial with success probability `p` (clamped to `[0, 1]`).
    fn chance(&self, p: f64) -> bool {
        self.next_f64() < p.clamp(0.0, 1.0)
    }
}

/// Picks one element uniformly. Returns `None` for an empty slice.
pub fn choose<'a, T>(rng: &dyn RandomSource, items: &'a [T]) -> Option<&'a T> {
    if items.is_empty() {
        None
    } else {
        items.get(rng.pick_index(items.len()))
    }
}

/// [`RandomSource`] backed by `rand`'s `StdRng`.
pub struct StdRandom {
    rng: Mutex<StdRng>,
}

impl StdRandom {
    /// Seeded from OS entropy.
    pub fn from_entropy() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Deterministic source for reproducible runs and tests.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl RandomSource for StdRandom {
    fn next_f64(&self) -> f64 {
        match self.rng.lock() {
            Ok(mut rng) => rng.r#gen::<f64>(),
            Err(poisoned) => poisoned.into_inner().r#gen::<f64>(),
        }
    }

    fn pick_index(&self, len: usize) -> usize {
        match self.rng.lock() {
            Ok(mut rng) => rng.gen_range(0..len),
            Err(poisoned) => poisoned.into_inner().gen_range(0..len),
        }
    }
}

/// Replays a fixed script of draws, cycling when exhausted.
///
/// `next_f64` returns the scripted value; `pick_index` maps it onto
/// `0..len`, so `0.0` always picks the first element.
pub struct ScriptedRandom {
    script: Vec<f64>,
    cursor: Mutex<usize>,
}

impl ScriptedRandom {
    pub fn new(script: Vec<f64>) -> Self {
        Self {
            script,
            cursor: Mutex::new(0),
        }
    }

    /// Always draws `value`.
    pub fn constant(value: f64) -> Self {
        Self::new(vec![value])
    }

    fn next_value(&self) -> f64 {
        if self.script.is_empty() {
            return 0.0;
        }
        let mut cursor = match self.cursor.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let value = self.script[*cursor % self.script.len()];
        *cursor += 1;
        value
    }
}

impl RandomSource for ScriptedRandom {
    fn next_f64(&self) -> f64 {
        self.next_value()
    }

    fn pick_index(&self, len: usize) -> usize {
        let scaled = (self.next_value().clamp(0.0, 0.999_999) * len as f64) as usize;
        scaled.min(len.saturating_sub(1))
    }
}
