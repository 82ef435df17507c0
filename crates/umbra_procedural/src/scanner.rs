//! # Chunk Scanner
//!
//! One unit of parallel exploration work: hash every lattice point in a
//! footprint, keep the ones under the rarity threshold, classify them with
//! the two noise channels.
//!
//! ## Striping
//!
//! A footprint can be split across workers with zero coordination: every
//! point gets a running counter value, and a worker only processes points
//! where `count % total_workers == worker_index`. The union of all stripes
//! is exactly the single-worker scan.
//!
//! ## Failure semantics
//!
//! Total over well-formed inputs; no I/O. Malformed requests panic via
//! [`ChunkScanRequest::validate`].

use std::collections::HashMap;

use num_bigint::BigUint;
use tracing::{debug, trace};
use umbra_core::rng::mix;
use umbra_core::{
    Chunk, ChunkScanRequest, LocationId, MimcHasher, WorldCoords, WorldLocation, XorShift64,
    FIELD_PRIME,
};

use crate::perlin::{PerlinConfig, PerlinField, MAX_PERLIN_VALUE};

/// Seed tag for the mock universe, mixed with the footprint parameters.
const MOCK_SEED_TAG: u64 = 0x4D4F_434B_5343_414E;

/// Scans footprints against the keyed hash and the noise channels.
///
/// Owns the gradient caches for every channel configuration it has seen, so
/// a long-lived scanner (one per worker thread) amortizes gradient hashing
/// across chunks. Scanners share nothing; clones of the universe keys given
/// to different scanners produce identical results.
#[derive(Default)]
pub struct ChunkScanner {
    fields: HashMap<PerlinConfig, PerlinField>,
}

impl ChunkScanner {
    /// Creates a scanner with empty caches.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn field_mut(&mut self, config: PerlinConfig) -> &mut PerlinField {
        self.fields
            .entry(config)
            .or_insert_with(|| PerlinField::new(config))
    }

    /// Scans this worker's stripe of the footprint.
    ///
    /// # Panics
    ///
    /// Panics on malformed requests; see [`ChunkScanRequest::validate`].
    pub fn scan(&mut self, request: &ChunkScanRequest) -> Chunk {
        request.validate();
        if request.use_mock_hash {
            return self.scan_mock(request);
        }

        let hasher = MimcHasher::new(request.planet_hash_key);
        // Exact big-integer comparison; the rarity decision never sees a float.
        let threshold = &*FIELD_PRIME / BigUint::from(request.planet_rarity);

        let space_config = PerlinConfig {
            key: request.space_type_key,
            scale: request.perlin_length_scale,
            mirror_x: request.perlin_mirror_x,
            mirror_y: request.perlin_mirror_y,
            floor: true,
        };
        let biome_config = PerlinConfig {
            key: request.biomebase_key,
            ..space_config
        };

        let footprint = request.chunk_footprint;
        let stripe = u64::from(request.worker_index);
        let workers = u64::from(request.total_workers);

        let mut planet_locations = Vec::new();
        let mut count: u64 = 0;
        for y in footprint.bottom_left.y..footprint.bottom_left.y + footprint.side_length {
            for x in footprint.bottom_left.x..footprint.bottom_left.x + footprint.side_length {
                if count % workers == stripe {
                    let hash = hasher.hash(&[x, y]);
                    if hash < threshold {
                        let coords = WorldCoords::new(x, y);
                        let perlin = self.field_mut(space_config).sample_floored(coords);
                        let biomebase = self.field_mut(biome_config).sample_floored(coords);
                        trace!(%coords, perlin, biomebase, "planet found");
                        planet_locations.push(WorldLocation {
                            hash: LocationId::new(hash),
                            coords,
                            perlin,
                            biomebase,
                        });
                    }
                }
                count += 1;
            }
        }

        let center_perlin = self
            .field_mut(space_config)
            .sample_unfloored(footprint.center());

        debug!(
            job_id = request.job_id,
            planets = planet_locations.len(),
            side = footprint.side_length,
            "chunk scan complete"
        );
        Chunk {
            chunk_footprint: footprint,
            planet_locations,
            perlin: center_perlin,
        }
    }

    /// Cheap deterministic scan for offline and sandbox testing.
    ///
    /// Bypasses the field hash entirely. Only worker 0 produces planets:
    /// the footprint's cells are shuffled by a seeded Fisher-Yates pass and
    /// the first `area / rarity` become planets, with ids drawn below the
    /// rarity threshold so downstream filters still hold.
    #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
    fn scan_mock(&mut self, request: &ChunkScanRequest) -> Chunk {
        let footprint = request.chunk_footprint;
        let seed = mix(
            mix(
                mix(
                    mix(MOCK_SEED_TAG, footprint.bottom_left.x as u64),
                    footprint.bottom_left.y as u64,
                ),
                footprint.side_length as u64,
            ),
            u64::from(request.planet_rarity),
        );
        let mut rng = XorShift64::new(seed);

        // Drawn first so every worker reports the same center sample.
        let center_perlin =
            rng.next_below(u64::from(MAX_PERLIN_VALUE) * 100) as f64 / 100.0;

        if request.worker_index != 0 {
            return Chunk {
                chunk_footprint: footprint,
                planet_locations: Vec::new(),
                perlin: center_perlin,
            };
        }

        let mut cells: Vec<WorldCoords> = Vec::with_capacity(footprint.area() as usize);
        for y in footprint.bottom_left.y..footprint.bottom_left.y + footprint.side_length {
            for x in footprint.bottom_left.x..footprint.bottom_left.x + footprint.side_length {
                cells.push(WorldCoords::new(x, y));
            }
        }
        for i in (1..cells.len()).rev() {
            let j = rng.next_below(i as u64 + 1) as usize;
            cells.swap(i, j);
        }

        let threshold = &*FIELD_PRIME / BigUint::from(request.planet_rarity);
        let planet_count = (footprint.area() as u64 / u64::from(request.planet_rarity)) as usize;
        let planet_locations = cells
            .into_iter()
            .take(planet_count)
            .map(|coords| {
                let mut bytes = [0u8; 32];
                for word in 0..4 {
                    bytes[word * 8..word * 8 + 8]
                        .copy_from_slice(&rng.next_u64().to_le_bytes());
                }
                let hash = BigUint::from_bytes_le(&bytes) % &threshold;
                WorldLocation {
                    hash: LocationId::new(hash),
                    coords,
                    perlin: rng.next_below(u64::from(MAX_PERLIN_VALUE) + 1) as u32,
                    biomebase: rng.next_below(u64::from(MAX_PERLIN_VALUE) + 1) as u32,
                }
            })
            .collect();

        debug!(job_id = request.job_id, "mock chunk scan complete");
        Chunk {
            chunk_footprint: footprint,
            planet_locations,
            perlin: center_perlin,
        }
    }
}
