//! # Perlin Noise Field
//!
//! Classic corner-gradient Perlin over the integer lattice, computed in
//! exact rational arithmetic.
//!
//! ## Why not an off-the-shelf noise crate?
//!
//! - Gradients come from the keyed field hash, so a proving circuit can
//!   recompute any sample
//! - Floating-point noise diverges across platforms; every client must agree
//!   on a coordinate's space type bit-for-bit
//! - The octave blend `[2, 1, 1] / 4` is the game's signature terrain
//!   texture, not a generic fractal sum
//!
//! ## Determinism Guarantee
//!
//! Given the same [`PerlinConfig`], a sample at a coordinate is identical on
//! any platform, any time. Floats appear only in the final return value.

use std::collections::HashMap;

use num_bigint::BigInt;
use num_traits::ToPrimitive;
use serde::{Deserialize, Serialize};
use umbra_core::{MimcHasher, Rational, WorldCoords};

/// Upper bound of the rescaled noise range `[0, MAX_PERLIN_VALUE]`.
pub const MAX_PERLIN_VALUE: u32 = 32;

/// Octaves blended per sample, at `scale`, `2 * scale`, `4 * scale`.
const OCTAVES: usize = 3;

/// Denominator of the gradient vector coordinates.
const GRADIENT_PRECISION: i64 = 1000;

/// The 16 unit gradient vectors, evenly spaced around the circle at
/// 1000-denominator precision. Index comes from the hash channel's `rand16`.
const GRADIENT_VECTORS: [(i64, i64); 16] = [
    (1000, 0),
    (924, 383),
    (707, 707),
    (383, 924),
    (0, 1000),
    (-383, 924),
    (-707, 707),
    (-924, 383),
    (-1000, 0),
    (-924, -383),
    (-707, -707),
    (-383, -924),
    (0, -1000),
    (383, -924),
    (707, -707),
    (924, -383),
];

/// One independently-keyed noise channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PerlinConfig {
    /// Hash channel key.
    pub key: u64,
    /// Grid cell size of the first octave; a power of two.
    pub scale: u32,
    /// Fold the field across the x-axis (`y -> |y|`).
    pub mirror_x: bool,
    /// Fold the field across the y-axis (`x -> |x|`).
    pub mirror_y: bool,
    /// Floor the rescaled value before the final offset.
    pub floor: bool,
}

/// Sign quadrant of a sample point. Mirrored axes need quadrant-specific
/// gradient flips, so cached gradients are partitioned by it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
struct Quadrant {
    neg_x: bool,
    neg_y: bool,
}

impl Quadrant {
    fn of(coords: WorldCoords) -> Self {
        Self {
            neg_x: coords.x < 0,
            neg_y: coords.y < 0,
        }
    }
}

/// Cache key for one grid corner's gradient at one octave.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
struct GradientKey {
    quadrant: Quadrant,
    corner: WorldCoords,
    scale: i64,
}

/// A single noise channel with its worker-local gradient cache.
///
/// The cache is unbounded for the process lifetime; distinct grid corners
/// visited are bounded by the total area ever scanned, divided by the cell
/// size. It is a context object owned by its scanner, never a global, so
/// independent universes and tests cannot cross-contaminate.
pub struct PerlinField {
    config: PerlinConfig,
    hasher: MimcHasher,
    cache: HashMap<GradientKey, (Rational, Rational)>,
}

impl PerlinField {
    /// Creates a noise channel.
    ///
    /// # Panics
    ///
    /// Panics if the configured scale is not a power of two.
    #[must_use]
    pub fn new(config: PerlinConfig) -> Self {
        assert!(
            config.scale.is_power_of_two(),
            "perlin scale must be a power of two"
        );
        Self {
            config,
            hasher: MimcHasher::new(config.key),
            cache: HashMap::new(),
        }
    }

    /// The channel's configuration.
    #[must_use]
    pub const fn config(&self) -> PerlinConfig {
        self.config
    }

    /// Cached gradient count; grows with the area ever sampled.
    #[must_use]
    pub fn cached_gradients(&self) -> usize {
        self.cache.len()
    }

    /// Samples the channel at a coordinate, honoring the configured floor
    /// flag. The returned float is display-grade only; it must never feed a
    /// consensus decision.
    #[must_use]
    pub fn sample(&mut self, coords: WorldCoords) -> f64 {
        self.sample_rational(coords, self.config.floor).to_f64()
    }

    /// Unfloored sample, used for the chunk-center subdivision signal.
    #[must_use]
    pub fn sample_unfloored(&mut self, coords: WorldCoords) -> f64 {
        self.sample_rational(coords, false).to_f64()
    }

    /// Floored sample as the exact integer in `[0, MAX_PERLIN_VALUE]`.
    #[must_use]
    pub fn sample_floored(&mut self, coords: WorldCoords) -> u32 {
        self.sample_rational(coords, true)
            .floor()
            .to_u32()
            .expect("floored perlin lies in [0, 32]")
    }

    /// Exact-rational sample: three octaves blended `[2, 1, 1] / 4`, then
    /// rescaled from roughly `[-1, 1]` into `[0, MAX_PERLIN_VALUE]`.
    fn sample_rational(&mut self, coords: WorldCoords, floor: bool) -> Rational {
        let quadrant = Quadrant::of(coords);
        let base_scale = i64::from(self.config.scale);

        let mut octave_values = Vec::with_capacity(OCTAVES);
        for octave in 0..OCTAVES {
            octave_values.push(self.value_at(coords, quadrant, base_scale << octave));
        }

        // Octave 0 counted twice: the game's signature blend.
        let blended = &(&(&octave_values[0] + &octave_values[0]) + &octave_values[1])
            + &octave_values[2];
        let combined = &blended / &Rational::from_integer(4);

        let half = Rational::from_integer(i64::from(MAX_PERLIN_VALUE / 2));
        let mut value = &combined * &half;
        if floor {
            value = Rational::from_bigint(value.floor());
        }
        &value + &half
    }

    /// One octave: bilinear falloff over the four corner gradients of the
    /// surrounding grid cell.
    fn value_at(&mut self, coords: WorldCoords, quadrant: Quadrant, scale: i64) -> Rational {
        let scale_r = Rational::from_integer(scale);
        let px = Rational::from_integer(coords.x);
        let py = Rational::from_integer(coords.y);

        // Snap with the exact non-negative remainder; native `%` disagrees
        // with the grid at negative coordinates.
        let bottom_left = WorldCoords::new(
            coords.x - rational_to_i64(&px.real_mod(&scale_r)),
            coords.y - rational_to_i64(&py.real_mod(&scale_r)),
        );

        let one = Rational::one();
        let mut total = Rational::zero();
        for (step_x, step_y) in [(0, 0), (1, 0), (0, 1), (1, 1)] {
            let corner = WorldCoords::new(
                bottom_left.x + step_x * scale,
                bottom_left.y + step_y * scale,
            );
            let (grad_x, grad_y) = self.gradient_at(quadrant, corner, scale);

            // Distance from corner to point, in unit-cell coordinates.
            let dx = &(&px - &Rational::from_integer(corner.x)) / &scale_r;
            let dy = &(&py - &Rational::from_integer(corner.y)) / &scale_r;

            let weight = &(&one - &dx.abs()) * &(&one - &dy.abs());
            let dot = &(&dx * &grad_x) + &(&dy * &grad_y);
            total = &total + &(&weight * &dot);
        }
        total
    }

    /// Pseudo-random unit gradient for a grid corner.
    ///
    /// The hash sees the mirror-folded corner so opposite quadrants share
    /// gradients; the quadrant-specific axis flip is applied after the cache
    /// lookup.
    fn gradient_at(
        &mut self,
        quadrant: Quadrant,
        corner: WorldCoords,
        scale: i64,
    ) -> (Rational, Rational) {
        let key = GradientKey {
            quadrant,
            corner,
            scale,
        };
        let config = self.config;
        let hasher = &self.hasher;
        let (base_x, base_y) = self.cache.entry(key).or_insert_with(|| {
            let folded_x = if config.mirror_y { corner.x.abs() } else { corner.x };
            let folded_y = if config.mirror_x { corner.y.abs() } else { corner.y };
            let index = hasher.rand16(&[folded_x, folded_y, scale]);
            let (vx, vy) = GRADIENT_VECTORS[index];
            (
                Rational::new(BigInt::from(vx), BigInt::from(GRADIENT_PRECISION)),
                Rational::new(BigInt::from(vy), BigInt::from(GRADIENT_PRECISION)),
            )
        });

        let mut grad_x = base_x.clone();
        let mut grad_y = base_y.clone();
        if config.mirror_y && quadrant.neg_x {
            grad_x = -grad_x;
        }
        if config.mirror_x && quadrant.neg_y {
            grad_y = -grad_y;
        }
        (grad_x, grad_y)
    }
}

/// Narrows an integer-valued rational back to `i64`.
fn rational_to_i64(value: &Rational) -> i64 {
    value.floor().to_i64().expect("grid offset fits i64")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(key: u64) -> PerlinConfig {
        PerlinConfig {
            key,
            scale: 16,
            mirror_x: false,
            mirror_y: false,
            floor: true,
        }
    }

    #[test]
    fn test_sample_is_deterministic_across_instances() {
        let mut a = PerlinField::new(config(2));
        let mut b = PerlinField::new(config(2));
        for &(x, y) in &[(0, 0), (17, -3), (-100, 55), (-1, -1)] {
            let coords = WorldCoords::new(x, y);
            assert_eq!(a.sample_floored(coords), b.sample_floored(coords));
            assert!((a.sample_unfloored(coords) - b.sample_unfloored(coords)).abs() == 0.0);
        }
    }

    #[test]
    fn test_range_covers_signed_quadrants() {
        let mut field = PerlinField::new(config(5));
        for x in -20i64..20 {
            let coords = WorldCoords::new(x * 3, -x * 7 + 1);
            let v = field.sample_floored(coords);
            assert!(v <= MAX_PERLIN_VALUE, "floored {v} out of range at {coords}");
            let raw = field.sample_unfloored(coords);
            assert!(
                (0.0..=f64::from(MAX_PERLIN_VALUE)).contains(&raw),
                "unfloored {raw} out of range at {coords}"
            );
        }
    }

    #[test]
    fn test_mirror_x_reflects_across_x_axis() {
        let mut field = PerlinField::new(PerlinConfig {
            mirror_x: true,
            ..config(7)
        });
        for &(x, y) in &[(5, 9), (-31, 14), (48, 16), (0, 1), (12, 0)] {
            let a = field.sample_floored(WorldCoords::new(x, y));
            let b = field.sample_floored(WorldCoords::new(x, -y));
            assert_eq!(a, b, "mirror_x asymmetry at ({x}, {y})");
            let ra = field.sample_unfloored(WorldCoords::new(x, y));
            let rb = field.sample_unfloored(WorldCoords::new(x, -y));
            assert!(ra == rb, "mirror_x raw asymmetry at ({x}, {y})");
        }
    }

    #[test]
    fn test_mirror_y_reflects_across_y_axis() {
        let mut field = PerlinField::new(PerlinConfig {
            mirror_y: true,
            ..config(7)
        });
        for &(x, y) in &[(5, 9), (14, -31), (16, 48), (1, 0), (32, 5)] {
            let a = field.sample_floored(WorldCoords::new(x, y));
            let b = field.sample_floored(WorldCoords::new(-x, y));
            assert_eq!(a, b, "mirror_y asymmetry at ({x}, {y})");
        }
    }

    #[test]
    fn test_both_mirrors_reflect_all_quadrants() {
        let mut field = PerlinField::new(PerlinConfig {
            mirror_x: true,
            mirror_y: true,
            ..config(9)
        });
        let reference = field.sample_floored(WorldCoords::new(21, 13));
        for &(x, y) in &[(-21, 13), (21, -13), (-21, -13)] {
            assert_eq!(field.sample_floored(WorldCoords::new(x, y)), reference);
        }
    }

    #[test]
    fn test_floor_config_yields_integer_samples() {
        let mut floored = PerlinField::new(config(3));
        let coords = WorldCoords::new(7, -9);
        let v = floored.sample(coords);
        assert!((v - v.trunc()).abs() < f64::EPSILON);
        assert!((v - f64::from(floored.sample_floored(coords))).abs() < f64::EPSILON);
    }

    #[test]
    fn test_gradient_cache_grows_and_hits() {
        let mut field = PerlinField::new(config(4));
        let _ = field.sample_floored(WorldCoords::new(3, 3));
        let after_first = field.cached_gradients();
        assert!(after_first > 0);
        // Same cell: second sample must not add corners.
        let _ = field.sample_floored(WorldCoords::new(4, 4));
        assert_eq!(field.cached_gradients(), after_first);
    }

    #[test]
    #[should_panic(expected = "power of two")]
    fn test_non_power_of_two_scale_panics() {
        let _ = PerlinField::new(PerlinConfig {
            scale: 12,
            ..config(1)
        });
    }

    #[test]
    fn test_gradient_vectors_are_unit_length() {
        for (x, y) in GRADIENT_VECTORS {
            let len2 = x * x + y * y;
            // 1000^2, within rounding of the 1/1000 lattice.
            assert!((999_000..=1_001_000).contains(&len2), "({x}, {y}) not unit");
        }
    }
}
