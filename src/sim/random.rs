//! Uniform random sources
//!
//! The simulation draws every random value through [`RandomSource`] so a session
//! can be replayed from a seed, or scripted outright in tests.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// A uniform generator over `[0, 1)`
pub trait RandomSource {
    /// Next value in `[0, 1)`
    fn next_unit(&mut self) -> f32;

    /// Value in `[min, max)`
    fn range(&mut self, min: f32, max: f32) -> f32 {
        min + self.next_unit() * (max - min)
    }

    /// True with the given probability
    fn chance(&mut self, probability: f32) -> bool {
        self.next_unit() < probability
    }
}

/// PCG32-backed source, reproducible from its seed
#[derive(Debug, Clone)]
pub struct SeededRandom {
    seed: u64,
    rng: Pcg32,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl RandomSource for SeededRandom {
    fn next_unit(&mut self) -> f32 {
        self.rng.random::<f32>()
    }
}

/// Replays a fixed list of values, wrapping around at the end
#[derive(Debug, Clone)]
pub struct ScriptedRandom {
    values: Vec<f32>,
    cursor: usize,
}

impl ScriptedRandom {
    /// Values outside `[0, 1)` are clamped into it. An empty script always yields 0.
    pub fn new(values: &[f32]) -> Self {
        let values = values
            .iter()
            .map(|&v| v.clamp(0.0, 1.0 - f32::EPSILON))
            .collect();
        Self { values, cursor: 0 }
    }

    /// Number of values drawn so far
    pub fn draws(&self) -> usize {
        self.cursor
    }
}

impl RandomSource for ScriptedRandom {
    fn next_unit(&mut self) -> f32 {
        if self.values.is_empty() {
            return 0.0;
        }
        let value = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        value
    }
}
