use rand::rngs::{StdRng, ThreadRng};
use rand::{Rng, SeedableRng};

/// Full width of the jitter band; samples fall in `[-SPAN / 2, SPAN / 2]`.
pub const JITTER_SPAN: f64 = 0.01;

/// Source of the per-step perturbation added to the drift.
pub trait JitterSource {
    fn next_jitter(&mut self) -> f64;
}

/// Uniform jitter drawn from a `rand` generator.
pub struct RandomJitter<R> {
    rng: R,
}

impl<R: Rng> RandomJitter<R> {
    pub fn new(rng: R) -> Self {
        RandomJitter { rng }
    }
}

impl RandomJitter<ThreadRng> {
    pub fn from_thread() -> Self {
        RandomJitter::new(rand::rng())
    }
}

impl RandomJitter<StdRng> {
    pub fn seeded(seed: u64) -> Self {
        RandomJitter::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> JitterSource for RandomJitter<R> {
    fn next_jitter(&mut self) -> f64 {
        (self.rng.random::<f64>() - 0.5) * JITTER_SPAN
    }
}

/// Replays a fixed list of jitter values, cycling when exhausted.
pub struct FixedJitter {
    values: Vec<f64>,
    cursor: usize,
}

impl FixedJitter {
    pub fn new(values: Vec<f64>) -> Self {
        FixedJitter { values, cursor: 0 }
    }
}

impl JitterSource for FixedJitter {
    fn next_jitter(&mut self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let value = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        value
    }
}

pub struct NoJitter;

impl JitterSource for NoJitter {
    fn next_jitter(&mut self) -> f64 {
        0.0
    }
}
