//! Index pickers used by shuffle mode

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of shuffle indices
///
/// Injected into the playlist so tests can substitute a deterministic
/// sequence for the random generator.
pub trait IndexPicker {
    /// Pick an index in `[0, len)`. Callers never pass `len == 0`.
    fn pick(&mut self, len: usize) -> usize;
}

/// Uniformly random picker backed by a seedable RNG
#[derive(Debug)]
pub struct RandomPicker {
    rng: StdRng,
}

impl RandomPicker {
    /// Create a picker seeded from the operating system
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Create a reproducible picker
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomPicker {
    fn default() -> Self {
        Self::new()
    }
}

impl IndexPicker for RandomPicker {
    fn pick(&mut self, len: usize) -> usize {
        self.rng.random_range(0..len)
    }
}

/// Picker that replays a fixed script of indices, wrapping around
///
/// Each scripted value is reduced modulo the playlist length so the
/// result is always in range.
#[derive(Debug, Clone)]
pub struct SequencePicker {
    script: Vec<usize>,
    next: usize,
}

impl SequencePicker {
    pub fn new(script: Vec<usize>) -> Self {
        Self { script, next: 0 }
    }
}

impl IndexPicker for SequencePicker {
    fn pick(&mut self, len: usize) -> usize {
        if self.script.is_empty() {
            return 0;
        }
        let value = self.script[self.next % self.script.len()];
        self.next += 1;
        value % len
    }
}
