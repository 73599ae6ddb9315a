//! Simulated reply latency.

use crate::random::RandomSource;
use kozi_config::LatencyConfig;
use std::time::Duration;

/// Delay drawn uniformly from `[min, max)` before each reply.
///
/// When `min == max` the delay is fixed at `min`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Latency {
    min_ms: u64,
    max_ms: u64,
}

impl Latency {
    /// Build a latency window; bounds are swapped if given inverted.
    pub fn new(min_ms: u64, max_ms: u64) -> Self {
        Self {
            min_ms: min_ms.min(max_ms),
            max_ms: max_ms.max(min_ms),
        }
    }

    /// No delay at all.
    pub fn none() -> Self {
        Self::new(0, 0)
    }

    /// Draw a delay from the window.
    pub fn sample(&self, random: &dyn RandomSource) -> Duration {
        let span = self.max_ms - self.min_ms;
        let offset = if span == 0 {
            0
        } else {
            let span = usize::try_from(span).unwrap_or(usize::MAX);
            random.next_index(span) as u64
        };
        Duration::from_millis(self.min_ms + offset)
    }
}

impl Default for Latency {
    fn default() -> Self {
        LatencyConfig::default().into()
    }
}

impl From<LatencyConfig> for Latency {
    fn from(config: LatencyConfig) -> Self {
        Self::new(config.min_ms, config.max_ms)
    }
}
