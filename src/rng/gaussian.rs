//! Normally distributed offsets via the Marsaglia polar transform.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Stateful generator of normally distributed samples.
///
/// Each polar transform consumes two uniform draws and yields two independent
/// standard normals; the second one is cached and returned by the next call.
#[derive(Debug, Clone)]
pub struct GaussianSource {
    rng: ChaCha8Rng,
    spare: Option<f32>,
    samples_drawn: u64,
}

impl GaussianSource {
    /// Creates a source whose stream is fully determined by `seed`.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            spare: None,
            samples_drawn: 0,
        }
    }

    /// Draws one sample centered on `mean`.
    ///
    /// The standard normal is scaled by `variance` directly, so `variance` acts
    /// as the spread of the returned value.
    pub fn sample(&mut self, mean: f32, variance: f32) -> f32 {
        self.samples_drawn += 1;
        let z = match self.spare.take() {
            Some(z) => z,
            None => {
                let (first, second) = self.polar_pair();
                self.spare = Some(second);
                first
            }
        };
        z * variance + mean
    }

    /// Number of times [`sample`](Self::sample) has been called.
    pub fn samples_drawn(&self) -> u64 {
        self.samples_drawn
    }

    fn polar_pair(&mut self) -> (f32, f32) {
        loop {
            let v1 = 2.0 * self.rng.random::<f32>() - 1.0;
            let v2 = 2.0 * self.rng.random::<f32>() - 1.0;
            let s = v1 * v1 + v2 * v2;
            if s >= 1.0 || s == 0.0 {
                continue;
            }
            let factor = (-2.0 * s.ln() / s).sqrt();
            return (v1 * factor, v2 * factor);
        }
    }
}
