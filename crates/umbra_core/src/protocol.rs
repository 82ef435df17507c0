//! Miner worker protocol.
//!
//! These types cross a message-passing boundary (worker threads here, web
//! workers in the browser build), so everything is serde-serializable and
//! carries no shared state. Responses may arrive in any order; callers match
//! on `job_id`.

use serde::{Deserialize, Serialize};

use crate::world::{Chunk, Rectangle};

/// One unit of scan work, dispatched to a single worker.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkScanRequest {
    /// Region of the lattice to scan.
    pub chunk_footprint: Rectangle,
    /// This worker's stripe index, in `[0, total_workers)`.
    pub worker_index: u32,
    /// Number of workers splitting this footprint.
    pub total_workers: u32,
    /// Planet density divisor; a coordinate is a planet iff its existence
    /// hash is below `P / planet_rarity`.
    pub planet_rarity: u32,
    /// Caller-chosen correlation id, echoed in the response.
    pub job_id: u64,
    /// Bypass the field hash with the cheap deterministic mock generator.
    pub use_mock_hash: bool,
    /// Key for the planet-existence hash channel.
    pub planet_hash_key: u64,
    /// Key for the space-type noise channel.
    pub space_type_key: u64,
    /// Key for the biome-base noise channel.
    pub biomebase_key: u64,
    /// Perlin grid cell size; a power of two.
    pub perlin_length_scale: u32,
    /// Fold the noise field across the x-axis.
    pub perlin_mirror_x: bool,
    /// Fold the noise field across the y-axis.
    pub perlin_mirror_y: bool,
}

impl ChunkScanRequest {
    /// Fails fast on malformed parameters.
    ///
    /// Silent coercion could desynchronize clients that must agree
    /// bit-for-bit, so violations are programmer errors, not recoverable
    /// conditions.
    ///
    /// # Panics
    ///
    /// Panics on a non-positive footprint, zero workers, an out-of-range
    /// worker index, zero rarity, or a non-power-of-two length scale.
    pub fn validate(&self) {
        assert!(
            self.chunk_footprint.side_length > 0,
            "footprint side length must be positive"
        );
        assert!(self.total_workers > 0, "total_workers must be positive");
        assert!(
            self.worker_index < self.total_workers,
            "worker_index {} out of range for {} workers",
            self.worker_index,
            self.total_workers
        );
        assert!(self.planet_rarity > 0, "planet_rarity must be positive");
        assert!(
            self.perlin_length_scale.is_power_of_two(),
            "perlin_length_scale must be a power of two"
        );
    }
}

/// Result of one scan, tagged with the request's `job_id`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChunkScanResponse {
    /// The scanned chunk.
    pub chunk: Chunk,
    /// Echo of the request's correlation id.
    pub job_id: u64,
}
