//! Simulation tuning parameters
//!
//! Everything that shapes the look of the fire lives here so it can be
//! loaded from a TOML file. Unset fields fall back to [`FireConfig::default`].

use crate::error::{FireError, FireResult};
use crate::palette::{FireType, Rgb};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Tuning parameters for [`crate::FireSimulation`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FireConfig {
    /// Time accumulator advance per tick. Controls how fast the wind wanders.
    pub time_step: f64,

    /// Multiplier applied to the accumulator before sampling noise.
    pub noise_frequency: f64,

    /// Scale from noise value to wind offset in columns (`round(noise * strength)`).
    pub wind_strength: f64,

    /// Amplitude of extra uniform per-tick wind jitter added to the noise value.
    /// Zero disables the draw entirely.
    pub wind_gust: f64,

    /// Probability that a propagated cell loses one intensity level.
    pub decay_chance: f64,

    /// Maximum lateral jitter in columns; jitter is uniform in `-max_jitter..=max_jitter`.
    pub max_jitter: u8,

    /// Probability that heat rises two rows instead of one.
    pub tall_flame_chance: f64,

    /// Colour family.
    pub fire_type: FireType,

    /// Replaces palette entry 0 when set.
    pub background: Option<Rgb>,

    /// Seed for the propagation RNG. `None` seeds from the OS.
    pub seed: Option<u64>,

    /// Seed for the wind noise table. `None` uses the reference permutation.
    pub noise_seed: Option<u64>,

    /// Drifting spark settings.
    pub sparks: SparkConfig,
}

impl Default for FireConfig {
    fn default() -> Self {
        Self {
            time_step: 0.01,
            noise_frequency: 1.0,
            wind_strength: 2.0,
            wind_gust: 0.0,
            decay_chance: 0.5,
            max_jitter: 1,
            tall_flame_chance: 0.3,
            fire_type: FireType::Original,
            background: None,
            seed: None,
            noise_seed: None,
            sparks: SparkConfig::default(),
        }
    }
}

impl FireConfig {
    /// Config with a fixed propagation seed, for reproducible runs.
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }

    /// Check every parameter is within its valid range.
    pub fn validate(&self) -> FireResult<()> {
        let result = self.check_ranges();
        if let Err(err) = &result {
            debug!("Rejected fire config: {err}");
        }
        result
    }

    fn check_ranges(&self) -> FireResult<()> {
        check_non_negative("time_step", self.time_step)?;
        check_non_negative("noise_frequency", self.noise_frequency)?;
        check_non_negative("wind_strength", self.wind_strength)?;
        check_non_negative("wind_gust", self.wind_gust)?;
        check_chance("decay_chance", self.decay_chance)?;
        check_chance("tall_flame_chance", self.tall_flame_chance)?;
        self.sparks.validate()
    }
}

/// Settings for sparks that break off the fire and drift upwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SparkConfig {
    /// Per-tick probability of spawning a spark. Zero disables sparks.
    pub spawn_chance: f64,

    /// Upper bound on live sparks.
    pub max_sparks: usize,
}

impl Default for SparkConfig {
    fn default() -> Self {
        Self {
            spawn_chance: 0.0,
            max_sparks: 256,
        }
    }
}

impl SparkConfig {
    /// Sparks at the rate of the classic wallpaper (15% per tick).
    pub fn enabled() -> Self {
        Self {
            spawn_chance: 0.15,
            ..Self::default()
        }
    }

    /// Whether sparks can ever spawn.
    pub fn is_enabled(&self) -> bool {
        self.spawn_chance > 0.0 && self.max_sparks > 0
    }

    fn validate(&self) -> FireResult<()> {
        check_chance("sparks.spawn_chance", self.spawn_chance)
    }
}

fn check_chance(field: &'static str, value: f64) -> FireResult<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(FireError::chance_out_of_range(field, value))
    }
}

fn check_non_negative(field: &'static str, value: f64) -> FireResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(FireError::not_non_negative(field, value))
    }
}
