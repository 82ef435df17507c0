//! World data model shared between the scanner, the miner and downstream
//! game-state consumers.
//!
//! These are the canonical representations used in the worker protocol.

use std::fmt;

use num_bigint::BigUint;
use serde::{Deserialize, Serialize};

use crate::hash::FIELD_PRIME;

/// A point on the infinite integer lattice. No bounds; magnitudes up to 10^6
/// are routine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WorldCoords {
    /// X coordinate.
    pub x: i64,
    /// Y coordinate.
    pub y: i64,
}

impl WorldCoords {
    /// Creates a new coordinate pair.
    #[inline]
    #[must_use]
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for WorldCoords {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// An axis-aligned square footprint on the lattice.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rectangle {
    /// Bottom-left corner (inclusive).
    pub bottom_left: WorldCoords,
    /// Side length; strictly positive.
    pub side_length: i64,
}

impl Rectangle {
    /// Creates a footprint.
    ///
    /// # Panics
    ///
    /// Panics if `side_length` is not strictly positive.
    #[must_use]
    pub fn new(bottom_left: WorldCoords, side_length: i64) -> Self {
        assert!(side_length > 0, "footprint side length must be positive");
        Self {
            bottom_left,
            side_length,
        }
    }

    /// Number of lattice points covered.
    #[inline]
    #[must_use]
    pub const fn area(&self) -> i64 {
        self.side_length * self.side_length
    }

    /// The footprint's center point (rounded down for odd side lengths).
    #[inline]
    #[must_use]
    pub const fn center(&self) -> WorldCoords {
        WorldCoords::new(
            self.bottom_left.x + self.side_length / 2,
            self.bottom_left.y + self.side_length / 2,
        )
    }

    /// Whether the footprint covers the given point.
    #[inline]
    #[must_use]
    pub const fn contains(&self, coords: WorldCoords) -> bool {
        coords.x >= self.bottom_left.x
            && coords.x < self.bottom_left.x + self.side_length
            && coords.y >= self.bottom_left.y
            && coords.y < self.bottom_left.y + self.side_length
    }
}

/// The canonical hash-derived identity of a coordinate: a field element in
/// `[0, P)`, rendered as fixed-width hex for external use.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LocationId(BigUint);

impl LocationId {
    /// Wraps a hash output.
    ///
    /// # Panics
    ///
    /// Panics in debug builds if the value is not a field element; hash
    /// outputs are reduced by construction, so a violation is a programmer
    /// error upstream.
    #[must_use]
    pub fn new(value: BigUint) -> Self {
        debug_assert!(value < *FIELD_PRIME, "location id must be a field element");
        Self(value)
    }

    /// The underlying field element.
    #[must_use]
    pub fn as_biguint(&self) -> &BigUint {
        &self.0
    }

    /// Fixed-width lowercase hex rendering, 64 digits.
    #[must_use]
    pub fn to_hex(&self) -> String {
        format!("{:064x}", self.0)
    }
}

impl fmt::Display for LocationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:064x}", self.0)
    }
}

/// Result of locating and classifying one coordinate.
///
/// Pure function of coordinates and keys: re-derivation from the same inputs
/// always reproduces identical field values.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WorldLocation {
    /// Hash identity; the planet's primary key.
    pub hash: LocationId,
    /// Lattice position.
    pub coords: WorldCoords,
    /// Floored space-type noise channel, in `[0, 32]`.
    pub perlin: u32,
    /// Floored biome-base noise channel, in `[0, 32]`.
    pub biomebase: u32,
}

/// Output of one chunk scan.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    /// The scanned footprint.
    pub chunk_footprint: Rectangle,
    /// Planets discovered inside the footprint (this worker's stripe only).
    pub planet_locations: Vec<WorldLocation>,
    /// Unfloored space-type sample at the footprint center. Callers use it
    /// to decide whether the chunk straddles a space-type boundary and
    /// should be subdivided.
    pub perlin: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rectangle_center_and_area() {
        let fp = Rectangle::new(WorldCoords::new(-50, -50), 100);
        assert_eq!(fp.center(), WorldCoords::new(0, 0));
        assert_eq!(fp.area(), 10_000);

        let odd = Rectangle::new(WorldCoords::new(0, 0), 5);
        assert_eq!(odd.center(), WorldCoords::new(2, 2));
    }

    #[test]
    fn test_rectangle_contains_half_open() {
        let fp = Rectangle::new(WorldCoords::new(0, 0), 4);
        assert!(fp.contains(WorldCoords::new(0, 0)));
        assert!(fp.contains(WorldCoords::new(3, 3)));
        assert!(!fp.contains(WorldCoords::new(4, 0)));
        assert!(!fp.contains(WorldCoords::new(-1, 2)));
    }

    #[test]
    #[should_panic(expected = "side length must be positive")]
    fn test_degenerate_footprint_panics() {
        let _ = Rectangle::new(WorldCoords::new(0, 0), 0);
    }

    #[test]
    fn test_location_id_hex_is_fixed_width() {
        let id = LocationId::new(BigUint::from(0xabcu32));
        let hex = id.to_hex();
        assert_eq!(hex.len(), 64);
        assert!(hex.ends_with("abc"));
        assert!(hex.starts_with("000"));
        assert_eq!(hex, id.to_string());
    }

    #[test]
    fn test_world_location_round_trips_through_serde() {
        let loc = WorldLocation {
            hash: LocationId::new(BigUint::from(42u8)),
            coords: WorldCoords::new(-3, 7),
            perlin: 16,
            biomebase: 20,
        };
        let json = serde_json::to_string(&loc).expect("serializes");
        let back: WorldLocation = serde_json::from_str(&json).expect("deserializes");
        assert_eq!(loc, back);
    }
}
