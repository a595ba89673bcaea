//! Test RNG — deterministic `DeterministicRng` implementations for tests.

use std::collections::VecDeque;

use valentine_core::rng::DeterministicRng;

/// A no-op RNG that always returns `min` for `next_u32_range` and `0.0` for
/// `next_f64`. Every probability check therefore succeeds.
#[derive(Debug)]
pub struct MockRng;

impl DeterministicRng for MockRng {
    fn next_u32_range(&mut self, min: u32, _max: u32) -> u32 {
        min
    }

    fn next_f64(&mut self) -> f64 {
        0.0
    }
}

/// An RNG that replays predetermined integers and floats. Once a queue is
/// exhausted it falls back to `min` / `0.999`, so probability checks fail
/// and integer draws are neutral.
#[derive(Debug, Default)]
pub struct SequenceRng {
    ints: VecDeque<u32>,
    floats: VecDeque<f64>,
}

impl SequenceRng {
    /// Create a new `SequenceRng` that replays the given integers.
    #[must_use]
    pub fn new(values: Vec<u32>) -> Self {
        Self {
            ints: values.into(),
            floats: VecDeque::new(),
        }
    }

    /// Queue floats to replay from `next_f64`.
    #[must_use]
    pub fn with_floats(mut self, floats: Vec<f64>) -> Self {
        self.floats = floats.into();
        self
    }

    /// Number of queued values not yet consumed, integers plus floats.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.ints.len() + self.floats.len()
    }
}

impl DeterministicRng for SequenceRng {
    fn next_u32_range(&mut self, min: u32, _max: u32) -> u32 {
        self.ints.pop_front().unwrap_or(min)
    }

    fn next_f64(&mut self) -> f64 {
        self.floats.pop_front().unwrap_or(0.999)
    }
}
