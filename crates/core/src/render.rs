//! Grid to RGB conversion
//!
//! Produces a packed RGB8 buffer (`[r, g, b, r, g, b, ...]`, row-major) that
//! any image or display layer can consume. Rows are filled in parallel.

use crate::palette::Palette;
use crate::simulation::FireSimulation;
use crate::spread::SpreadSampler;
use rayon::prelude::*;

/// Bytes per output pixel.
pub const BYTES_PER_PIXEL: usize = 3;

/// Render the simulation's current grid, upscaled by `scale` (nearest neighbour).
///
/// The output is `(width * scale) x (height * scale)` pixels. A `scale` of 0
/// is treated as 1.
pub fn render_rgb<S: SpreadSampler>(sim: &FireSimulation<S>, scale: usize) -> Vec<u8> {
    render_grid_rgb(sim.grid(), sim.width(), sim.palette(), scale)
}

/// Render an arbitrary intensity grid through `palette`.
///
/// `grid.len()` must be a multiple of `width`.
pub fn render_grid_rgb(grid: &[u8], width: usize, palette: &Palette, scale: usize) -> Vec<u8> {
    if width == 0 || grid.is_empty() {
        return Vec::new();
    }
    let scale = scale.max(1);
    let height = grid.len() / width;
    let out_width = width * scale;
    let row_bytes = out_width * BYTES_PER_PIXEL;
    let mut pixels = vec![0u8; row_bytes * height * scale];

    pixels
        .par_chunks_mut(row_bytes)
        .enumerate()
        .for_each(|(out_y, row)| {
            let src = &grid[(out_y / scale) * width..(out_y / scale + 1) * width];
            for (px, out) in row.chunks_exact_mut(BYTES_PER_PIXEL).enumerate() {
                out.copy_from_slice(&palette.color(src[px / scale]));
            }
        });

    pixels
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::{FireType, MAX_INTENSITY};

    #[test]
    fn fresh_simulation_renders_hot_bottom_row() {
        let sim = FireSimulation::new(3, 2).unwrap();
        let pixels = render_rgb(&sim, 1);
        assert_eq!(pixels.len(), 3 * 2 * BYTES_PER_PIXEL);
        let hot = sim.palette()[usize::from(MAX_INTENSITY)];
        let cold = sim.palette()[0];
        assert_eq!(&pixels[..3], &cold);
        assert_eq!(&pixels[9..12], &hot);
        assert_eq!(&pixels[15..18], &hot);
    }

    #[test]
    fn scaling_repeats_cells() {
        let palette = Palette::new(FireType::Original, None);
        let grid = [0, MAX_INTENSITY];
        let pixels = render_grid_rgb(&grid, 2, &palette, 2);
        // 4x2 output pixels
        assert_eq!(pixels.len(), 4 * 2 * BYTES_PER_PIXEL);
        let cold = palette[0];
        let hot = palette[usize::from(MAX_INTENSITY)];
        for row in pixels.chunks_exact(4 * BYTES_PER_PIXEL) {
            assert_eq!(&row[0..3], &cold);
            assert_eq!(&row[3..6], &cold);
            assert_eq!(&row[6..9], &hot);
            assert_eq!(&row[9..12], &hot);
        }
    }

    #[test]
    fn zero_scale_acts_as_one() {
        let palette = Palette::new(FireType::Blue, None);
        let grid = [5u8; 6];
        assert_eq!(
            render_grid_rgb(&grid, 3, &palette, 0),
            render_grid_rgb(&grid, 3, &palette, 1)
        );
    }
}
