//! Injectable random sources for reply selection and simulated latency.

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of uniform random indices.
pub trait RandomSource: Send + Sync {
    /// Return an index uniformly drawn from `0..upper`. Callers never pass zero.
    fn next_index(&self, upper: usize) -> usize;
}

/// Thread-local RNG; the default for interactive sessions.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn next_index(&self, upper: usize) -> usize {
        rand::rng().random_range(0..upper)
    }
}

/// Seeded RNG producing a reproducible sequence.
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
    fn next_index(&self, upper: usize) -> usize {
        self.rng.lock().random_range(0..upper)
    }
}

#[cfg(test)]
mod tests {
    use super::{RandomSource, SeededRandom, ThreadRandom};
    use pretty_assertions::assert_eq;

    #[test]
    fn seeded_random_is_reproducible() {
        let a = SeededRandom::new(42);
        let b = SeededRandom::new(42);
        let first: Vec<usize> = (0..16).map(|_| a.next_index(10)).collect();
        let second: Vec<usize> = (0..16).map(|_| b.next_index(10)).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn indices_stay_in_bounds() {
        let random = ThreadRandom;
        for upper in 1..20 {
            assert!(random.next_index(upper) < upper);
        }
        assert_eq!(random.next_index(1), 0);
    }
}
