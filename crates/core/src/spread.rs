//! Random draws that drive heat propagation
//!
//! Each processed cell asks the sampler for three values, always in the same
//! order: decay, then lateral jitter, then rise. Keeping the order fixed
//! makes a seeded run replay exactly.

use crate::config::FireConfig;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of per-cell propagation draws.
pub trait SpreadSampler {
    /// Intensity lost on the way up, `0` or `1`.
    fn decay(&mut self) -> u8;

    /// Lateral drift before wind is applied, in columns.
    fn jitter(&mut self) -> isize;

    /// Rows climbed, `1` or `2`.
    fn rise(&mut self) -> usize;

    /// Per-tick wind gust in `[-amplitude, amplitude]`. Called at most once per tick.
    fn gust(&mut self, amplitude: f64) -> f64;

    /// Uniform value in `[0, 1)` for everything else (spark spawning and drift).
    fn unit(&mut self) -> f64;
}

/// [`SpreadSampler`] backed by a real RNG and the probabilities in [`FireConfig`].
#[derive(Debug, Clone)]
pub struct StochasticSampler<R: Rng = StdRng> {
    rng: R,
    decay_chance: f64,
    max_jitter: i16,
    tall_flame_chance: f64,
}

impl StochasticSampler<StdRng> {
    /// Sampler seeded from `config.seed`, or from the OS when unset.
    pub fn from_config(config: &FireConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self::new(rng, config)
    }
}

impl<R: Rng> StochasticSampler<R> {
    /// Wrap an existing RNG.
    pub fn new(rng: R, config: &FireConfig) -> Self {
        Self {
            rng,
            decay_chance: config.decay_chance,
            max_jitter: i16::from(config.max_jitter),
            tall_flame_chance: config.tall_flame_chance,
        }
    }
}

impl<R: Rng> SpreadSampler for StochasticSampler<R> {
    #[inline]
    fn decay(&mut self) -> u8 {
        u8::from(self.rng.random_bool(self.decay_chance))
    }

    #[inline]
    fn jitter(&mut self) -> isize {
        isize::from(self.rng.random_range(-self.max_jitter..=self.max_jitter))
    }

    #[inline]
    fn rise(&mut self) -> usize {
        if self.rng.random_bool(self.tall_flame_chance) {
            2
        } else {
            1
        }
    }

    fn gust(&mut self, amplitude: f64) -> f64 {
        if amplitude > 0.0 {
            self.rng.random_range(-amplitude..=amplitude)
        } else {
            0.0
        }
    }

    fn unit(&mut self) -> f64 {
        self.rng.random::<f64>()
    }
}
