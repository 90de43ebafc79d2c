//! One-dimensional gradient noise for wind.
//!
//! Produces a smooth, deterministic pseudo-random signal from a scalar
//! coordinate. The simulation samples it once per tick with its time
//! accumulator to get a slowly wandering horizontal wind bias.
//!
//! # Implementation
//!
//! Classic Perlin gradient noise reduced to one dimension. Each integer
//! lattice point hashes through a permutation table to a gradient of
//! magnitude 1-8 with random sign, and the two contributions around the
//! sample point are blended with the quintic fade curve
//! `6t^5 - 15t^4 + 10t^3`. The fade has zero first and second derivative at
//! the lattice points, so the signal is C2 continuous across cell borders.
//!
//! # References
//!
//! - Perlin, K. (2002). Improving noise. ACM Transactions on Graphics, 21(3), 681-682.

/// Permutation table size (must be power of 2).
const PERM_SIZE: usize = 256;

/// Ken Perlin's reference permutation of `0..=255`.
const REFERENCE_PERMUTATION: [u8; PERM_SIZE] = [
    151, 160, 137, 91, 90, 15, 131, 13, 201, 95, 96, 53, 194, 233, 7, 225, 140, 36, 103, 30, 69,
    142, 8, 99, 37, 240, 21, 10, 23, 190, 6, 148, 247, 120, 234, 75, 0, 26, 197, 62, 94, 252, 219,
    203, 117, 35, 11, 32, 57, 177, 33, 88, 237, 149, 56, 87, 174, 20, 125, 136, 171, 168, 68, 175,
    74, 165, 71, 134, 139, 48, 27, 166, 77, 146, 158, 231, 83, 111, 229, 122, 60, 211, 133, 230,
    220, 105, 92, 41, 55, 46, 245, 40, 244, 102, 143, 54, 65, 25, 63, 161, 1, 216, 80, 73, 209, 76,
    132, 187, 208, 89, 18, 169, 200, 196, 135, 130, 116, 188, 159, 86, 164, 100, 109, 198, 173,
    186, 3, 64, 52, 217, 226, 250, 124, 123, 5, 202, 38, 147, 118, 126, 255, 82, 85, 212, 207, 206,
    59, 227, 47, 16, 58, 17, 182, 189, 28, 42, 223, 183, 170, 213, 119, 248, 152, 2, 44, 154, 163,
    70, 221, 153, 101, 155, 167, 43, 172, 9, 129, 22, 39, 253, 19, 98, 108, 110, 79, 113, 224, 232,
    178, 185, 112, 104, 218, 246, 97, 228, 251, 34, 242, 193, 238, 210, 144, 12, 191, 179, 162,
    241, 81, 51, 145, 235, 249, 14, 239, 107, 49, 192, 214, 31, 181, 199, 106, 157, 184, 84, 204,
    176, 115, 121, 50, 45, 127, 4, 150, 254, 138, 236, 205, 93, 222, 114, 67, 29, 24, 72, 243, 141,
    128, 195, 78, 66, 215, 61, 156, 180,
];

/// Smooth 1D gradient noise generator.
///
/// Deterministic for a given permutation table: the same input always maps
/// to the same output. Output magnitude is bounded by 8 (the largest
/// gradient); with the reference table it peaks at 4.
#[derive(Clone, Debug)]
pub struct NoiseGenerator {
    /// Seed used to shuffle the table, `None` for the reference permutation.
    seed: Option<u64>,

    /// Permutation table, doubled so that `perm[i + 1]` is valid for every `i < 256`.
    perm: Vec<u8>,
}

impl Default for NoiseGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl NoiseGenerator {
    /// Create a generator backed by Ken Perlin's reference permutation.
    #[must_use]
    pub fn new() -> Self {
        Self {
            seed: None,
            perm: Self::doubled(&REFERENCE_PERMUTATION),
        }
    }

    /// Create a generator with a permutation shuffled from `seed`.
    ///
    /// Different seeds give unrelated wind patterns; the same seed always
    /// gives the same table.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            perm: Self::generate_permutation(seed),
        }
    }

    /// Seed of the permutation table, if it was shuffled.
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Generate permutation table from seed.
    ///
    /// Fisher-Yates shuffle driven by a MINSTD linear congruential generator.
    fn generate_permutation(seed: u64) -> Vec<u8> {
        let mut perm: Vec<u8> = (0..=255).collect();

        // MINSTD gets stuck at zero, so nudge the state off it
        let mut rng_state = seed % 2_147_483_647;
        if rng_state == 0 {
            rng_state = 1;
        }
        for i in (1..PERM_SIZE).rev() {
            rng_state = rng_state.wrapping_mul(48_271) % 2_147_483_647;
            let j = (rng_state as usize) % (i + 1);
            perm.swap(i, j);
        }

        Self::doubled(&perm)
    }

    /// Double the permutation table to avoid modulo operations at the wrap point.
    fn doubled(perm: &[u8]) -> Vec<u8> {
        let mut doubled = Vec::with_capacity(perm.len() * 2);
        doubled.extend_from_slice(perm);
        doubled.extend_from_slice(perm);
        doubled
    }

    /// Sample noise at `x`.
    ///
    /// Integer inputs always return `0.0` (both gradients are evaluated at
    /// distance zero or weighted out). The signal repeats every 256 units.
    #[must_use]
    pub fn sample(&self, x: f64) -> f64 {
        let floor = x.floor();
        let xi = (floor as i64 & 0xFF) as usize;
        let xf = x - floor;

        let u = Self::fade(xf);

        let grad_a = Self::grad(self.perm[xi], xf);
        let grad_b = Self::grad(self.perm[xi + 1], xf - 1.0);

        Self::lerp(grad_a, grad_b, u)
    }

    /// Gradient contribution for a hashed lattice point.
    ///
    /// Bits 0-2 select a magnitude of 1-8, bit 3 flips the sign.
    #[inline]
    fn grad(hash: u8, x: f64) -> f64 {
        let h = hash & 0x0F;
        let magnitude = f64::from(1 + (h & 0x07));
        if h & 0x08 == 0 {
            magnitude * x
        } else {
            -magnitude * x
        }
    }

    /// Improved smoothstep function (Perlin's improved noise).
    ///
    /// Uses 6t^5 - 15t^4 + 10t^3 for C2 continuity.
    #[inline]
    fn fade(t: f64) -> f64 {
        t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
    }

    /// Linear interpolation.
    #[inline]
    fn lerp(a: f64, b: f64, t: f64) -> f64 {
        a + t * (b - a)
    }
}
