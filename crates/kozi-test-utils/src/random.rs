use kozi_core::RandomSource;
use parking_lot::Mutex;

/// Replays a fixed sequence of draws, cycling when exhausted.
///
/// Each draw is reduced modulo the requested upper bound.
#[derive(Debug)]
pub struct SequenceRandom {
    values: Vec<usize>,
    cursor: Mutex<usize>,
}

impl SequenceRandom {
    pub fn new(values: impl Into<Vec<usize>>) -> Self {
        Self {
            values: values.into(),
            cursor: Mutex::new(0),
        }
    }

    /// Always draw the same value.
    pub fn constant(value: usize) -> Self {
        Self::new(vec![value])
    }

    /// Number of draws made so far.
    pub fn draws(&self) -> usize {
        *self.cursor.lock()
    }
}

impl RandomSource for SequenceRandom {
    fn next_index(&self, upper: usize) -> usize {
        let mut cursor = self.cursor.lock();
        let value = if self.values.is_empty() {
            0
        } else {
            self.values[*cursor % self.values.len()]
        };
        *cursor += 1;
        value % upper.max(1)
    }
}
