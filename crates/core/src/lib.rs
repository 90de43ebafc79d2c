//! Doom Fire Simulation Core Library
//!
//! The classic demoscene fire effect as a small, deterministic-when-seeded
//! simulation engine. A grid of intensity levels is fed from a permanently
//! hot bottom row; each tick heat climbs one or two rows with random lateral
//! drift, a shared wind bias and occasional cooling. Intensities index into a
//! 37-entry colour palette.
//!
//! ## Components
//!
//! - [`NoiseGenerator`]: smooth 1D gradient noise driving the wind
//! - [`FireSimulation`]: owns grid, palette and tick state
//! - [`Palette`] / [`FireType`]: intensity-to-colour tables
//! - [`render_rgb`]: grid to packed RGB8 pixels for a display layer
//!
//! ```rust
//! use doom_fire_core::{FireConfig, FireSimulation};
//!
//! let mut fire = FireSimulation::with_config(80, 50, FireConfig::seeded(7)).unwrap();
//! fire.tick();
//! assert_eq!(fire.grid().len(), 80 * 50);
//! ```

pub mod config;
pub mod error;
pub mod noise;
pub mod palette;
pub mod render;
pub mod simulation;
pub mod spark;
pub mod spread;

pub use config::{FireConfig, SparkConfig};
pub use error::{FireError, FireResult};
pub use noise::NoiseGenerator;
pub use palette::{FireType, Palette, Rgb, UnknownFireType, MAX_INTENSITY, PALETTE_SIZE};
pub use render::{render_grid_rgb, render_rgb, BYTES_PER_PIXEL};
pub use simulation::FireSimulation;
pub use spark::Spark;
pub use spread::{SpreadSampler, StochasticSampler};
