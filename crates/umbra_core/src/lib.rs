//! # UMBRA Core
//!
//! Deterministic arithmetic and the shared data model for the UMBRA
//! universe engine.
//!
//! ## Design Principles
//!
//! 1. **Bit-exact**: outputs must match on every client and inside the
//!    proving circuit, so there is no floating point before the final
//!    display conversion
//! 2. **Pure**: every function here is a pure function of its inputs; no
//!    hidden state, no I/O
//! 3. **Serializable**: everything that crosses the worker boundary derives
//!    serde
//!
//! ## Core Components
//!
//! - [`Rational`]: exact big-integer fraction arithmetic
//! - [`MimcHasher`]: keyed hash over the proving circuit's prime field
//! - [`world`]: coordinates, footprints, locations, chunks
//! - [`protocol`]: scan request/response types

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod hash;
pub mod protocol;
pub mod rational;
pub mod rng;
pub mod world;

pub use hash::{to_field_element, MimcHasher, FIELD_PRIME};
pub use protocol::{ChunkScanRequest, ChunkScanResponse};
pub use rational::Rational;
pub use rng::XorShift64;
pub use world::{Chunk, LocationId, Rectangle, WorldCoords, WorldLocation};
