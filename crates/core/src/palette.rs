//! Intensity-to-colour palettes
//!
//! Every fire family maps the 37 intensity levels `0..=36` to RGB. Level 0 is
//! the cold background, level 36 the hottest colour. Only indexability is
//! required; most families happen to be monotone gradients.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A packed 8-bit RGB triple.
pub type Rgb = [u8; 3];

/// Number of palette entries (intensity levels `0..=MAX_INTENSITY`).
pub const PALETTE_SIZE: usize = 37;

/// Hottest intensity level, held by the source row.
pub const MAX_INTENSITY: u8 = (PALETTE_SIZE - 1) as u8;

/// Colour family of the fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FireType {
    /// Black to red to yellow, the classic look.
    #[default]
    Original,
    Blue,
    Rainbow,
    Green,
    Purple,
    /// Greyscale.
    White,
    /// Original gradient blended towards white at the top.
    WhiteHot,
    Ice,
    Toxic,
    FireAndIce,
    ChemicalFire,
    Cyberpunk,
    /// Palette drifts over time, see [`FireType::is_animated`].
    Aurora,
    Plasma,
    Void,
    /// Source row is seeded with random hot levels instead of the maximum.
    Candy,
}

impl FireType {
    /// All fire types in declaration order.
    pub const ALL: [FireType; 16] = [
        FireType::Original,
        FireType::Blue,
        FireType::Rainbow,
        FireType::Green,
        FireType::Purple,
        FireType::White,
        FireType::WhiteHot,
        FireType::Ice,
        FireType::Toxic,
        FireType::FireAndIce,
        FireType::ChemicalFire,
        FireType::Cyberpunk,
        FireType::Aurora,
        FireType::Plasma,
        FireType::Void,
        FireType::Candy,
    ];

    /// Pick a fire type uniformly at random.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }

    /// Whether the palette must be regenerated every tick.
    pub const fn is_animated(self) -> bool {
        matches!(self, FireType::Aurora)
    }

    /// Display name, matching the enum variant.
    pub const fn name(self) -> &'static str {
        match self {
            FireType::Original => "Original",
            FireType::Blue => "Blue",
            FireType::Rainbow => "Rainbow",
            FireType::Green => "Green",
            FireType::Purple => "Purple",
            FireType::White => "White",
            FireType::WhiteHot => "WhiteHot",
            FireType::Ice => "Ice",
            FireType::Toxic => "Toxic",
            FireType::FireAndIce => "FireAndIce",
            FireType::ChemicalFire => "ChemicalFire",
            FireType::Cyberpunk => "Cyberpunk",
            FireType::Aurora => "Aurora",
            FireType::Plasma => "Plasma",
            FireType::Void => "Void",
            FireType::Candy => "Candy",
        }
    }
}

impl fmt::Display for FireType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a fire type name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown fire type '{0}'")]
pub struct UnknownFireType(pub String);

impl FromStr for FireType {
    type Err = UnknownFireType;

    /// Case-insensitive; dashes and underscores are ignored (`"white-hot"` works).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted: String = s
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect::<String>()
            .to_lowercase();
        Self::ALL
            .into_iter()
            .find(|t| t.name().to_lowercase() == wanted)
            .ok_or_else(|| UnknownFireType(s.to_string()))
    }
}

/// Colour lookup table indexed by intensity level.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    fire_type: FireType,
    background: Option<Rgb>,
    colors: Vec<Rgb>,
}

impl Palette {
    /// Build the palette for `fire_type`, replacing entry 0 with `background` if given.
    pub fn new(fire_type: FireType, background: Option<Rgb>) -> Self {
        Self::with_phase(fire_type, background, 0.0)
    }

    /// Build the palette at animation `phase` (only [`FireType::Aurora`] uses it).
    pub fn with_phase(fire_type: FireType, background: Option<Rgb>, phase: f32) -> Self {
        let mut colors = generate_colors(fire_type, phase);
        if let (Some(bg), Some(first)) = (background, colors.first_mut()) {
            *first = bg;
        }
        Self {
            fire_type,
            background,
            colors,
        }
    }

    /// Rebuild colours for a new animation phase. No-op for static families.
    pub fn animate(&mut self, phase: f32) {
        if self.fire_type.is_animated() {
            *self = Self::with_phase(self.fire_type, self.background, phase);
        }
    }

    /// Colour family this palette was built for.
    pub fn fire_type(&self) -> FireType {
        self.fire_type
    }

    /// All colours, coldest first.
    pub fn colors(&self) -> &[Rgb] {
        &self.colors
    }

    /// Colour for an intensity level. Levels above the maximum clamp to the hottest colour.
    #[inline]
    pub fn color(&self, level: u8) -> Rgb {
        let idx = usize::from(level).min(self.colors.len() - 1);
        self.colors[idx]
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Always false; palettes have [`PALETTE_SIZE`] entries.
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Hottest level (`len() - 1`).
    pub fn max_level(&self) -> u8 {
        (self.colors.len() - 1) as u8
    }
}

impl std::ops::Index<usize> for Palette {
    type Output = Rgb;

    fn index(&self, index: usize) -> &Rgb {
        &self.colors[index]
    }
}

/// Build the raw colour table for a family.
fn generate_colors(fire_type: FireType, phase: f32) -> Vec<Rgb> {
    let steps = (PALETTE_SIZE - 1) as f32;
    (0..PALETTE_SIZE)
        .map(|i| color_at(fire_type, i as f32 / steps, phase))
        .collect()
}

/// `0.5 + 0.5 * sin(x)`, a sine wave remapped to `[0, 1]`.
#[inline]
fn wave(x: f32) -> f32 {
    0.5 + 0.5 * x.sin()
}

/// Colour for normalised intensity `t` in `[0, 1]`.
fn color_at(fire_type: FireType, t: f32, phase: f32) -> Rgb {
    match fire_type {
        FireType::Original => original(t),
        FireType::WhiteHot => {
            // Original gradient blended towards white as t rises
            let [r, g, _] = original(t);
            let r = (1.0 - t) * f32::from(r) + t * 255.0;
            let g = (1.0 - t) * f32::from(g) + t * 255.0;
            [r as u8, g as u8, (t * 255.0) as u8]
        }
        FireType::White => {
            let v = (255.0 * t.sqrt()).min(255.0) as u8;
            [v, v, v]
        }
        FireType::Blue => {
            let b = (255.0 * t.sqrt()).min(255.0) as u8;
            let g = (128.0 * t.powi(2)).min(128.0) as u8;
            [0, g, b]
        }
        FireType::Green => {
            let g = (255.0 * t.sqrt()).min(255.0) as u8;
            let b = (128.0 * t.powi(2)).min(128.0) as u8;
            [0, g, b]
        }
        FireType::Purple => {
            let r = (128.0 * t.sqrt()).min(128.0) as u8;
            let b = (255.0 * t.powi(2)).min(255.0) as u8;
            [r, 0, b]
        }
        FireType::Ice => {
            let r = (180.0 * t.powi(3)).min(180.0) as u8;
            let g = (220.0 * t.powi(2)).min(220.0) as u8;
            let b = (200.0 + 55.0 * t).min(255.0) as u8;
            [r, g, b]
        }
        FireType::Toxic => {
            let r = (128.0 * t.powi(2)).min(128.0) as u8;
            let g = (255.0 * t.sqrt()).min(255.0) as u8;
            let b = (64.0 * (1.0 - t)).max(0.0) as u8;
            [r, g, b]
        }
        FireType::FireAndIce => {
            let r = (255.0 * t.powf(1.2) + 60.0 * t).min(255.0) as u8;
            let g = (80.0 * t + 60.0 * (1.0 - t)).min(140.0) as u8;
            let b = (255.0 * (1.0 - t) + 20.0 * t).min(255.0) as u8;
            [r, g, b]
        }
        FireType::ChemicalFire => {
            let g = (80.0 * (1.0 - t) + 120.0 * t).min(200.0) as u8;
            if t < 0.3 {
                let r = (180.0 + 75.0 * t / 0.3) as u8;
                let b = (120.0 + 135.0 * (0.3 - t) / 0.3) as u8;
                [r, g, b]
            } else {
                let r = (255.0 * t).min(255.0) as u8;
                let b = (180.0 * (1.0 - t).powi(2)).min(180.0) as u8;
                [r, g, b]
            }
        }
        FireType::Cyberpunk => {
            let r = (255.0 * wave(t * 2.0)).min(255.0) as u8;
            let b = (255.0 * wave(t * 2.0 + 2.0)).min(255.0) as u8;
            [r, 0, b]
        }
        FireType::Candy => {
            let r = (255.0 * wave(t * 3.0)).min(255.0) as u8;
            let g = (255.0 * wave(t * 3.0 + 2.0)).min(255.0) as u8;
            let b = (255.0 * wave(t * 3.0 + 4.0)).min(255.0) as u8;
            [r, g, b]
        }
        FireType::Rainbow => {
            let r = (200.0 * wave(t * 8.0) + 55.0).min(255.0) as u8;
            let g = (200.0 * wave(t * 8.0 + 2.0) + 55.0).min(255.0) as u8;
            let b = (200.0 * wave(t * 8.0 + 4.0) + 55.0).min(255.0) as u8;
            [r, g, b]
        }
        FireType::Aurora => {
            let r = (60.0 * wave(t * 6.0 + 1.0 + phase)).max(0.0) as u8;
            let g = (180.0 * wave(t * 2.5 + 2.0 + phase * 0.7) + 60.0).min(255.0) as u8;
            let b = (200.0 * (0.5 + 0.5 * (t * 3.5 + 4.0 + phase * 1.3).cos())).min(255.0) as u8;
            [r, g, b]
        }
        FireType::Plasma => {
            if t < 0.08 {
                [0, 0, 0]
            } else if (t * 8.0).sin().abs() > 0.85 || (t * 4.0).cos().abs() > 0.95 {
                [255, 255, 255]
            } else {
                let r = (180.0 * wave(t * 6.0)).min(255.0) as u8;
                let g = (80.0 * (0.5 + 0.5 * (t * 4.0 + 1.0).cos())).min(255.0) as u8;
                let b = (200.0 + 55.0 * wave(t * 8.0)).min(255.0) as u8;
                [r, g, b]
            }
        }
        FireType::Void => {
            let r = (10.0 * (1.0 - t)).max(0.0) as u8;
            let b = (40.0 + 80.0 * t.powi(2)).min(120.0) as u8;
            [r, r, b]
        }
    }
}

/// Classic gradient: red rises fast (`sqrt`), green slowly (cube), no blue.
#[inline]
fn original(t: f32) -> Rgb {
    let r = (255.0 * t.sqrt()).floor().min(255.0) as u8;
    let g = (255.0 * t.powi(3)).floor().min(255.0) as u8;
    [r, g, 0]
}
