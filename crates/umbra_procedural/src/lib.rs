//! # UMBRA Procedural Generation
//!
//! Deterministic universe generation over an infinite integer lattice.
//!
//! ## Design Principles
//!
//! 1. **Bit-exact**: the same keys produce the same universe on every
//!    client, always; there is no floating point before the final display
//!    conversion
//! 2. **Partitionable**: any footprint splits across workers by striping,
//!    with zero coordination
//! 3. **Canonical**: repeated or overlapping discovery converges on one
//!    record per coordinate
//!
//! ## Core Components
//!
//! - [`PerlinField`]: exact-rational corner-gradient noise channel
//! - [`ChunkScanner`]: one unit of parallel exploration work
//! - [`LocationRegistry`]: canonicalized discovered-planet records
//!
//! ## Example
//!
//! ```rust,ignore
//! use umbra_core::{ChunkScanRequest, Rectangle, WorldCoords};
//! use umbra_procedural::ChunkScanner;
//!
//! let mut scanner = ChunkScanner::new();
//! let chunk = scanner.scan(&request);
//! for planet in &chunk.planet_locations {
//!     println!("{} at {}", planet.hash, planet.coords);
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod perlin;
pub mod registry;
pub mod scanner;

pub use perlin::{PerlinConfig, PerlinField, MAX_PERLIN_VALUE};
pub use registry::{LocationRecord, LocationRegistry, LocationUpdate};
pub use scanner::ChunkScanner;
