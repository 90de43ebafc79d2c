//! Drifting sparks
//!
//! Sparks break off near the base of the fire, climb one row per tick with a
//! little lateral wobble, and stamp a fading intensity into the grid as they
//! go. They never touch the source row.

use crate::config::SparkConfig;
use crate::palette::FireType;
use crate::spread::SpreadSampler;

/// A single rising spark.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Spark {
    pub x: usize,
    pub y: usize,
    /// Remaining ticks before the spark burns out.
    pub life: u8,
    /// Palette level at full life.
    pub level: u8,
}

impl Spark {
    /// Intensity stamped this tick: `level` scaled by remaining life, at least 1.
    pub fn brightness(&self, max_level: u8) -> u8 {
        let faded = (f32::from(self.life) / 30.0 * f32::from(self.level)) as u8;
        faded.clamp(1, max_level.max(1))
    }
}

/// Uniform integer in `lo..hi` from a unit draw.
fn pick(sampler: &mut impl SpreadSampler, lo: usize, hi: usize) -> usize {
    let span = hi.saturating_sub(lo).max(1);
    lo + ((sampler.unit() * span as f64) as usize).min(span - 1)
}

/// Fraction of the palette, as a level.
fn frac(palette_len: usize, f: f32) -> u8 {
    (palette_len as f32 * f) as u8
}

/// Choose starting level and lifetime for a new spark of `fire_type`.
fn spark_profile(
    fire_type: FireType,
    palette_len: usize,
    sampler: &mut impl SpreadSampler,
) -> (u8, u8) {
    let top = (palette_len - 1) as u8;
    let (level, life_range) = match fire_type {
        FireType::Original | FireType::WhiteHot | FireType::White => (top, (10, 30)),
        FireType::Blue | FireType::Ice => (frac(palette_len, 0.7), (14, 32)),
        FireType::Green | FireType::Toxic => (frac(palette_len, 0.6), (12, 28)),
        FireType::Purple => (frac(palette_len, 0.8), (12, 28)),
        FireType::ChemicalFire => (frac(palette_len, 0.7), (10, 30)),
        FireType::Rainbow | FireType::Candy => {
            (pick(sampler, palette_len / 2, palette_len) as u8, (10, 30))
        }
        FireType::FireAndIce | FireType::Cyberpunk => {
            let hot = sampler.unit() < 0.5;
            let level = frac(palette_len, if hot { 0.85 } else { 0.15 });
            let life = match (fire_type, hot) {
                (FireType::FireAndIce, false) => (14, 32),
                _ => (10, 28),
            };
            (level, life)
        }
        FireType::Aurora => (
            pick(sampler, palette_len / 4, palette_len * 3 / 4) as u8,
            (16, 36),
        ),
        FireType::Plasma => {
            let level = if sampler.unit() < 0.3 {
                top
            } else {
                pick(sampler, palette_len / 3, palette_len) as u8
            };
            (level, (10, 28))
        }
        FireType::Void => {
            let level = if sampler.unit() < 0.8 {
                0
            } else {
                frac(palette_len, 0.4)
            };
            (level, (18, 36))
        }
    };
    let life = pick(sampler, life_range.0, life_range.1) as u8;
    (level.min(top), life)
}

/// The live spark population of one simulation.
#[derive(Debug, Clone, Default)]
pub struct SparkField {
    sparks: Vec<Spark>,
}

impl SparkField {
    pub fn new() -> Self {
        Self::default()
    }

    /// Currently live sparks.
    pub fn sparks(&self) -> &[Spark] {
        &self.sparks
    }

    pub fn len(&self) -> usize {
        self.sparks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sparks.is_empty()
    }

    pub fn clear(&mut self) {
        self.sparks.clear();
    }

    /// Maybe spawn one spark at row `height - 2`.
    pub fn maybe_spawn(
        &mut self,
        config: &SparkConfig,
        fire_type: FireType,
        palette_len: usize,
        (width, height): (usize, usize),
        sampler: &mut impl SpreadSampler,
    ) {
        if !config.is_enabled() || height < 2 || self.sparks.len() >= config.max_sparks {
            return;
        }
        if sampler.unit() >= config.spawn_chance {
            return;
        }
        let x = pick(sampler, 0, width);
        let (level, life) = spark_profile(fire_type, palette_len, sampler);
        self.sparks.push(Spark {
            x,
            y: height - 2,
            life,
            level,
        });
    }

    /// Stamp every spark into `grid`, then move it up one row.
    ///
    /// Sparks that run out of life or reach row 0 are removed.
    pub fn advance(
        &mut self,
        grid: &mut [u8],
        width: usize,
        max_level: u8,
        sampler: &mut impl SpreadSampler,
    ) {
        self.sparks.retain_mut(|spark| {
            if spark.life == 0 || spark.y == 0 {
                return false;
            }
            if let Some(cell) = grid.get_mut(spark.y * width + spark.x) {
                *cell = spark.brightness(max_level);
            }
            let dx = pick(sampler, 0, 3) as isize - 1;
            spark.x = (spark.x as isize + dx).clamp(0, width as isize - 1) as usize;
            spark.y -= 1;
            spark.life -= 1;
            true
        });
    }
}
