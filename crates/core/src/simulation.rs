//! Fire propagation automaton
//!
//! The grid is a flat row-major buffer of intensity levels (`y * width + x`).
//! The bottom row is the heat source and stays pinned; every other row is
//! fed each tick by cells below it, which copy their heat one or two rows up
//! with a random lateral drift, a shared wind bias and an occasional loss of
//! one level.
//!
//! # Update order
//!
//! Sources are read from the previous tick's grid and writes land in a
//! second buffer that starts as a copy of it; the buffers swap at the end of
//! the tick. Reads therefore never see same-tick writes. When two sources hit
//! the same destination in one tick the later one in scan order (bottom row
//! first, left to right) wins.

use crate::config::FireConfig;
use crate::error::{FireError, FireResult};
use crate::noise::NoiseGenerator;
use crate::palette::{FireType, Palette};
use crate::spark::{Spark, SparkField};
use crate::spread::{SpreadSampler, StochasticSampler};
use tracing::{info, trace};

/// Lowest row that is still processed as a source. Rows above it only receive heat.
const FIRST_SOURCE_ROW: usize = 2;

/// Doom-style fire simulation.
///
/// Owns the intensity grid, the palette and all tick state. Created once with
/// fixed dimensions and advanced with [`FireSimulation::tick`]; read the grid
/// between ticks.
#[derive(Debug, Clone)]
pub struct FireSimulation<S: SpreadSampler = StochasticSampler> {
    width: usize,
    height: usize,

    /// Current intensities, row-major.
    grid: Vec<u8>,
    /// Write target during a tick, swapped with `grid` at the end.
    back: Vec<u8>,

    palette: Palette,
    noise: NoiseGenerator,
    config: FireConfig,
    sampler: S,
    sparks: SparkField,

    /// Time accumulator fed to the wind noise.
    time: f64,
    /// Wind offset (columns) used by the most recent tick.
    wind: isize,
    ticks: u64,
}

impl FireSimulation {
    /// Create a simulation with default tuning.
    pub fn new(width: usize, height: usize) -> FireResult<Self> {
        Self::with_config(width, height, FireConfig::default())
    }

    /// Create a simulation with custom tuning. Randomness is seeded from
    /// `config.seed`, or from the OS when unset.
    pub fn with_config(width: usize, height: usize, config: FireConfig) -> FireResult<Self> {
        let sampler = StochasticSampler::from_config(&config);
        Self::with_sampler(width, height, config, sampler)
    }
}

impl<S: SpreadSampler> FireSimulation<S> {
    /// Create a simulation drawing its randomness from `sampler`.
    ///
    /// Fails if either dimension is zero or the config is out of range.
    pub fn with_sampler(
        width: usize,
        height: usize,
        config: FireConfig,
        sampler: S,
    ) -> FireResult<Self> {
        if width == 0 || height == 0 {
            return Err(FireError::InvalidDimensions { width, height });
        }
        config.validate()?;

        let noise = match config.noise_seed {
            Some(seed) => NoiseGenerator::with_seed(seed),
            None => NoiseGenerator::new(),
        };
        let palette = Palette::new(config.fire_type, config.background);
        let size = width * height;

        let mut sim = Self {
            width,
            height,
            grid: vec![0; size],
            back: vec![0; size],
            palette,
            noise,
            config,
            sampler,
            sparks: SparkField::new(),
            time: 0.0,
            wind: 0,
            ticks: 0,
        };
        sim.ignite_source_row();

        info!(
            "Fire simulation initialized: {}x{} grid, fire_type={}, seed={:?}",
            width, height, sim.config.fire_type, sim.config.seed
        );
        Ok(sim)
    }

    /// Advance the automaton by one tick.
    pub fn tick(&mut self) {
        self.time += self.config.time_step;
        self.ticks += 1;
        self.wind = self.sample_wind();

        self.propagate();

        if self.config.sparks.is_enabled() {
            self.sparks.maybe_spawn(
                &self.config.sparks,
                self.config.fire_type,
                self.palette.len(),
                (self.width, self.height),
                &mut self.sampler,
            );
            let max_level = self.palette.max_level();
            self.sparks
                .advance(&mut self.grid, self.width, max_level, &mut self.sampler);
        }

        self.palette.animate(self.time as f32);

        trace!(
            "Fire tick {}: t={:.3}, wind={}, sparks={}",
            self.ticks,
            self.time,
            self.wind,
            self.sparks.len()
        );
    }

    /// Clear the grid back to its freshly initialized state.
    ///
    /// The source row is re-ignited, sparks are dropped and the time
    /// accumulator restarts at zero. The sampler keeps its state.
    pub fn reset(&mut self) {
        self.grid.fill(0);
        self.back.fill(0);
        self.sparks.clear();
        self.time = 0.0;
        self.wind = 0;
        self.ticks = 0;
        self.palette = Palette::new(self.config.fire_type, self.config.background);
        self.ignite_source_row();
        info!("Fire simulation reset");
    }

    /// Wind offset in columns: `round((noise + gust) * wind_strength)`.
    fn sample_wind(&mut self) -> isize {
        let noise = self.noise.sample(self.time * self.config.noise_frequency);
        let gust = self.sampler.gust(self.config.wind_gust);
        ((noise + gust) * self.config.wind_strength).round() as isize
    }

    /// Copy heat upwards from every source row into the back buffer, then swap.
    fn propagate(&mut self) {
        let (width, height) = (self.width, self.height);
        let wind = self.wind;
        let Self {
            grid,
            back,
            sampler,
            ..
        } = self;

        back.copy_from_slice(grid);

        for y in (FIRST_SOURCE_ROW..height).rev() {
            let row = y * width;
            for x in 0..width {
                // Draw order is fixed: decay, jitter, rise
                let decay = sampler.decay();
                let dx = sampler.jitter() + wind;
                let rise = sampler.rise();

                let dst_x = x as isize + dx;
                if dst_x < 0 || dst_x >= width as isize || rise > y {
                    continue;
                }
                let dst = (y - rise) * width + dst_x as usize;
                back[dst] = grid[row + x].saturating_sub(decay);
            }
        }

        std::mem::swap(grid, back);
    }

    /// Pin the bottom row at full heat (random hot levels for `Candy`).
    fn ignite_source_row(&mut self) {
        let max_level = self.palette.max_level();
        let start = (self.height - 1) * self.width;
        for x in 0..self.width {
            let level = if self.config.fire_type == FireType::Candy {
                let lo = self.palette.len() / 2;
                let span = self.palette.len() - lo;
                let offset = ((self.sampler.unit() * span as f64) as usize).min(span - 1);
                (lo + offset) as u8
            } else {
                max_level
            };
            self.grid[start + x] = level;
        }
        self.back[start..].copy_from_slice(&self.grid[start..]);
    }

    // ====== Accessors ======

    /// Grid width in cells.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Grid height in cells.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Intensity grid, row-major (`y * width + x`).
    pub fn grid(&self) -> &[u8] {
        &self.grid
    }

    /// One row of the grid, `None` outside the grid.
    pub fn row(&self, y: usize) -> Option<&[u8]> {
        if y < self.height {
            Some(&self.grid[y * self.width..(y + 1) * self.width])
        } else {
            None
        }
    }

    /// Intensity at `(x, y)`, `None` outside the grid.
    pub fn cell(&self, x: usize, y: usize) -> Option<u8> {
        if x < self.width && y < self.height {
            Some(self.grid[y * self.width + x])
        } else {
            None
        }
    }

    /// Current palette.
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn fire_type(&self) -> FireType {
        self.config.fire_type
    }

    pub fn config(&self) -> &FireConfig {
        &self.config
    }

    /// Wind offset applied during the last tick.
    pub fn wind(&self) -> isize {
        self.wind
    }

    /// Time accumulator.
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Number of ticks since creation or the last reset.
    pub fn tick_count(&self) -> u64 {
        self.ticks
    }

    pub fn sparks(&self) -> &[Spark] {
        self.sparks.sparks()
    }

    /// Mutable access to the sampler (e.g. to script draws in tests).
    pub fn sampler_mut(&mut self) -> &mut S {
        &mut self.sampler
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::{MAX_INTENSITY, PALETTE_SIZE};

    /// Sampler that always returns the minimum draw.
    #[derive(Debug, Default)]
    struct Calm;

    impl SpreadSampler for Calm {
        fn decay(&mut self) -> u8 {
            0
        }
        fn jitter(&mut self) -> isize {
            0
        }
        fn rise(&mut self) -> usize {
            1
        }
        fn gust(&mut self, _amplitude: f64) -> f64 {
            0.0
        }
        fn unit(&mut self) -> f64 {
            0.0
        }
    }

    fn still_air() -> FireConfig {
        FireConfig {
            wind_strength: 0.0,
            ..FireConfig::default()
        }
    }

    #[test]
    fn rejects_empty_dimensions() {
        assert_eq!(
            FireSimulation::new(0, 10).unwrap_err(),
            FireError::InvalidDimensions {
                width: 0,
                height: 10
            }
        );
        assert!(FireSimulation::new(10, 0).is_err());
    }

    #[test]
    fn rejects_invalid_config() {
        let config = FireConfig {
            decay_chance: 2.0,
            ..FireConfig::default()
        };
        assert!(matches!(
            FireSimulation::with_config(4, 4, config),
            Err(FireError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn initial_grid_is_cold_except_source_row() {
        let sim = FireSimulation::new(7, 5).unwrap();
        assert_eq!(sim.grid().len(), 35);
        for y in 0..5 {
            for x in 0..7 {
                let expected = if y == 4 { MAX_INTENSITY } else { 0 };
                assert_eq!(sim.cell(x, y), Some(expected), "cell ({x}, {y})");
            }
        }
        assert_eq!(sim.palette().len(), PALETTE_SIZE);
    }

    fn row_of<S: SpreadSampler>(sim: &FireSimulation<S>, y: usize) -> Vec<u8> {
        sim.row(y).unwrap().to_vec()
    }

    #[test]
    fn calm_tick_lifts_source_row_one_level() {
        let mut sim = FireSimulation::with_sampler(4, 4, still_air(), Calm).unwrap();
        sim.tick();

        assert_eq!(sim.wind(), 0);
        assert_eq!(row_of(&sim, 3), [MAX_INTENSITY; 4]);
        assert_eq!(row_of(&sim, 2), [MAX_INTENSITY; 4]);
        // Row 1 was fed from row 2's pre-tick (cold) values
        assert_eq!(row_of(&sim, 1), [0; 4]);
        assert_eq!(row_of(&sim, 0), [0; 4]);

        sim.tick();
        assert_eq!(row_of(&sim, 1), [MAX_INTENSITY; 4]);

        // Row 1 is never a source, so a one-row rise cannot reach row 0
        for _ in 0..5 {
            sim.tick();
        }
        assert_eq!(row_of(&sim, 0), [0; 4]);
    }

    /// Sampler that always climbs two rows without decay or drift.
    struct Tall;

    impl SpreadSampler for Tall {
        fn decay(&mut self) -> u8 {
            0
        }
        fn jitter(&mut self) -> isize {
            0
        }
        fn rise(&mut self) -> usize {
            2
        }
        fn gust(&mut self, _amplitude: f64) -> f64 {
            0.0
        }
        fn unit(&mut self) -> f64 {
            0.0
        }
    }

    #[test]
    fn two_row_rise_from_row_two_reaches_top() {
        let mut sim = FireSimulation::with_sampler(4, 5, still_air(), Tall).unwrap();
        sim.tick();
        assert_eq!(row_of(&sim, 2), [MAX_INTENSITY; 4]);
        assert_eq!(row_of(&sim, 0), [0; 4]);

        sim.tick();
        assert_eq!(row_of(&sim, 0), [MAX_INTENSITY; 4]);
        // Row 3 is never lit, so it keeps writing cold into row 1
        assert_eq!(row_of(&sim, 1), [0; 4]);
        assert_eq!(row_of(&sim, 3), [0; 4]);
    }

    /// Sampler that plays back a fixed tape of draws and records which kind was asked for.
    struct Scripted {
        tape: std::collections::VecDeque<i64>,
        calls: Vec<&'static str>,
    }

    impl Scripted {
        /// One `(decay, jitter, rise)` triple per processed cell, in scan order.
        fn new(cells: &[(i64, i64, i64)]) -> Self {
            Self {
                tape: cells.iter().flat_map(|&(d, j, r)| [d, j, r]).collect(),
                calls: Vec::new(),
            }
        }

        fn pop(&mut self, kind: &'static str) -> i64 {
            self.calls.push(kind);
            self.tape.pop_front().expect("tape exhausted")
        }
    }

    impl SpreadSampler for Scripted {
        fn decay(&mut self) -> u8 {
            u8::try_from(self.pop("decay")).unwrap()
        }
        fn jitter(&mut self) -> isize {
            isize::try_from(self.pop("jitter")).unwrap()
        }
        fn rise(&mut self) -> usize {
            usize::try_from(self.pop("rise")).unwrap()
        }
        fn gust(&mut self, _amplitude: f64) -> f64 {
            0.0
        }
        fn unit(&mut self) -> f64 {
            0.0
        }
    }

    #[test]
    fn scripted_draws_land_in_exact_cells() {
        let script = Scripted::new(&[
            // Row 3 (source row), left to right
            (1, 1, 2),  // (1, 1) <- 35
            (0, 0, 1),  // (1, 2) <- 36
            (1, -1, 1), // (1, 2) <- 35, overwrites the previous write
            // Row 2 reads its pre-tick (cold) values
            (0, -1, 1), // x = -1, dropped
            (0, 0, 2),  // (1, 0) <- 0
            (0, 5, 1),  // x = 7, dropped
        ]);
        let mut sim = FireSimulation::with_sampler(3, 4, still_air(), script).unwrap();
        sim.tick();

        assert_eq!(row_of(&sim, 0), [0, 0, 0]);
        assert_eq!(row_of(&sim, 1), [0, MAX_INTENSITY - 1, 0]);
        assert_eq!(row_of(&sim, 2), [0, MAX_INTENSITY - 1, 0]);
        assert_eq!(row_of(&sim, 3), [MAX_INTENSITY; 3]);

        let sampler = sim.sampler_mut();
        assert!(sampler.tape.is_empty(), "every draw consumed");
        let expected: Vec<&str> = ["decay", "jitter", "rise"].repeat(6);
        assert_eq!(sampler.calls, expected);
    }

    /// Sampler that pushes everything one column right and two rows up.
    struct RightTall;

    impl SpreadSampler for RightTall {
        fn decay(&mut self) -> u8 {
            1
        }
        fn jitter(&mut self) -> isize {
            1
        }
        fn rise(&mut self) -> usize {
            2
        }
        fn gust(&mut self, _amplitude: f64) -> f64 {
            0.0
        }
        fn unit(&mut self) -> f64 {
            0.0
        }
    }

    #[test]
    fn drift_beyond_edges_is_dropped() {
        let mut sim = FireSimulation::with_sampler(3, 4, still_air(), RightTall).unwrap();
        sim.tick();
        // Row 3 feeds row 1 shifted right, losing one level; column 0 gets nothing
        assert_eq!(row_of(&sim, 1), [0, MAX_INTENSITY - 1, MAX_INTENSITY - 1]);
        assert_eq!(row_of(&sim, 2), [0, 0, 0]);
        assert_eq!(row_of(&sim, 3), [MAX_INTENSITY; 3]);
    }

    #[test]
    fn short_grids_only_hold_the_source() {
        for height in 1..=2 {
            let mut sim = FireSimulation::with_sampler(3, height, still_air(), Calm).unwrap();
            for _ in 0..5 {
                sim.tick();
            }
            assert_eq!(row_of(&sim, height - 1), [MAX_INTENSITY; 3]);
            if height == 2 {
                assert_eq!(row_of(&sim, 0), [0; 3]);
            }
        }
    }

    #[test]
    fn time_advances_by_step() {
        let mut sim = FireSimulation::with_config(8, 8, FireConfig::seeded(1)).unwrap();
        for _ in 0..10 {
            sim.tick();
        }
        assert_eq!(sim.tick_count(), 10);
        approx::assert_relative_eq!(sim.time(), 0.1, epsilon = 1e-12);
    }

    #[test]
    fn wind_follows_noise() {
        let config = FireConfig {
            seed: Some(5),
            time_step: 0.5,
            ..FireConfig::default()
        };
        let mut sim = FireSimulation::with_config(8, 8, config).unwrap();
        sim.tick();
        // round(sample(0.5) * 2) = round(3.5)
        assert_eq!(sim.wind(), 4);
        sim.tick();
        assert_eq!(sim.wind(), 0, "integer times sample to zero");
    }

    #[test]
    fn reset_restores_initial_state() {
        let mut sim = FireSimulation::with_config(6, 6, FireConfig::seeded(9)).unwrap();
        let fresh = sim.grid().to_vec();
        for _ in 0..20 {
            sim.tick();
        }
        assert_ne!(sim.grid(), fresh.as_slice());
        sim.reset();
        assert_eq!(sim.grid(), fresh.as_slice());
        assert_eq!(sim.tick_count(), 0);
        assert_eq!(sim.time(), 0.0);
    }

    #[test]
    fn candy_source_row_is_hot_but_varied() {
        let config = FireConfig {
            fire_type: FireType::Candy,
            seed: Some(3),
            ..FireConfig::default()
        };
        let mut sim = FireSimulation::with_config(64, 8, config).unwrap();
        let source = row_of(&sim, 7);
        let lo = (PALETTE_SIZE / 2) as u8;
        assert!(source.iter().all(|v| (lo..=MAX_INTENSITY).contains(v)));
        for _ in 0..10 {
            sim.tick();
        }
        assert_eq!(row_of(&sim, 7), source);
    }

    #[test]
    fn out_of_range_cell_is_none() {
        let sim = FireSimulation::new(3, 3).unwrap();
        assert_eq!(sim.cell(3, 0), None);
        assert_eq!(sim.cell(0, 3), None);
        assert_eq!(sim.row(3), None);
        assert_eq!(sim.row(2).map(<[u8]>::len), Some(3));
    }
}
