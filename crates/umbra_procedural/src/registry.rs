//! # Location Registry
//!
//! Canonicalizing store for discovered planets: at most one record per
//! [`LocationId`], enriched by merging, never replaced.
//!
//! Overlapping scans and repeated discoveries all funnel into the same
//! record, so downstream layers never see divergent copies of one
//! coordinate. Records live for the process lifetime; nothing is deleted.
//!
//! Single-writer contract: the orchestrating caller merges results after a
//! scan returns. Concurrent writers must add their own mutual exclusion.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use umbra_core::{LocationId, WorldLocation};

/// One canonical record, the merge of everything ever set for its id.
///
/// The core location fields are immutable once set; attached metadata grows
/// additively through [`LocationRegistry::set`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LocationRecord {
    /// The discovered location. Immutable after the first merge that sets it.
    pub location: Option<WorldLocation>,
    /// Whether the player has interacted with this location.
    pub touched: Option<bool>,
    /// Reference to an attached game entity, assigned by a downstream layer.
    pub entity: Option<u64>,
}

/// Partial fields for one merge call. `None` fields are left untouched.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LocationUpdate {
    /// Core location fields; ignored after first set.
    pub location: Option<WorldLocation>,
    /// Touched flag.
    pub touched: Option<bool>,
    /// Attached game entity reference.
    pub entity: Option<u64>,
}

impl LocationUpdate {
    /// Update carrying only the core location fields.
    #[must_use]
    pub fn from_location(location: WorldLocation) -> Self {
        Self {
            location: Some(location),
            ..Self::default()
        }
    }
}

/// Process-scoped map from hash identity to canonical record.
#[derive(Debug, Default)]
pub struct LocationRegistry {
    records: HashMap<LocationId, LocationRecord>,
}

impl LocationRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up the record for an id.
    #[must_use]
    pub fn get(&self, id: &LocationId) -> Option<&LocationRecord> {
        self.records.get(id)
    }

    /// Merges the provided fields into the record for `id`, creating it if
    /// absent. Previously-set fields absent from `update` are preserved.
    ///
    /// The core location fields are write-once: a later `location` value is
    /// ignored. Re-deriving a location from the same coordinates and keys
    /// always reproduces identical values, so a conflicting second write can
    /// only come from a bug upstream; debug builds assert on it.
    pub fn set(&mut self, id: LocationId, update: LocationUpdate) {
        let record = self.records.entry(id).or_default();
        match (&record.location, update.location) {
            (None, Some(location)) => record.location = Some(location),
            (Some(existing), Some(incoming)) => {
                debug_assert_eq!(
                    *existing, incoming,
                    "conflicting core fields for one location id"
                );
            }
            _ => {}
        }
        if let Some(touched) = update.touched {
            record.touched = Some(touched);
        }
        if let Some(entity) = update.entity {
            record.entity = Some(entity);
        }
    }

    /// Number of canonical records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the registry holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterates over all records.
    pub fn iter(&self) -> impl Iterator<Item = (&LocationId, &LocationRecord)> {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use num_bigint::BigUint;
    use umbra_core::WorldCoords;

    use super::*;

    fn id(v: u32) -> LocationId {
        LocationId::new(BigUint::from(v))
    }

    fn location(v: u32) -> WorldLocation {
        WorldLocation {
            hash: id(v),
            coords: WorldCoords::new(i64::from(v), -1),
            perlin: 14,
            biomebase: 22,
        }
    }

    #[test]
    fn test_merge_accumulates_fields() {
        let mut registry = LocationRegistry::new();
        registry.set(id(1), LocationUpdate::from_location(location(1)));
        registry.set(
            id(1),
            LocationUpdate {
                touched: Some(true),
                ..LocationUpdate::default()
            },
        );
        registry.set(
            id(1),
            LocationUpdate {
                entity: Some(77),
                ..LocationUpdate::default()
            },
        );

        let record = registry.get(&id(1)).expect("record exists");
        assert_eq!(record.location, Some(location(1)));
        assert_eq!(record.touched, Some(true));
        assert_eq!(record.entity, Some(77));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_merge_is_idempotent() {
        let mut registry = LocationRegistry::new();
        let update = LocationUpdate::from_location(location(2));
        registry.set(id(2), update.clone());
        let once = registry.get(&id(2)).cloned();
        registry.set(id(2), update);
        assert_eq!(registry.get(&id(2)).cloned(), once);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_core_fields_survive_metadata_merges() {
        let mut registry = LocationRegistry::new();
        registry.set(id(3), LocationUpdate::from_location(location(3)));
        registry.set(
            id(3),
            LocationUpdate {
                touched: Some(false),
                entity: Some(5),
                ..LocationUpdate::default()
            },
        );
        let record = registry.get(&id(3)).expect("record exists");
        assert_eq!(record.location, Some(location(3)));
    }

    #[test]
    fn test_metadata_can_arrive_before_location() {
        let mut registry = LocationRegistry::new();
        registry.set(
            id(4),
            LocationUpdate {
                touched: Some(true),
                ..LocationUpdate::default()
            },
        );
        registry.set(id(4), LocationUpdate::from_location(location(4)));
        let record = registry.get(&id(4)).expect("record exists");
        assert_eq!(record.touched, Some(true));
        assert_eq!(record.location, Some(location(4)));
    }

    #[test]
    fn test_distinct_ids_stay_distinct() {
        let mut registry = LocationRegistry::new();
        registry.set(id(5), LocationUpdate::from_location(location(5)));
        registry.set(id(6), LocationUpdate::from_location(location(6)));
        assert_eq!(registry.len(), 2);
        assert!(registry.get(&id(7)).is_none());
    }
}
