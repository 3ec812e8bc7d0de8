//! Spatial index from chunks to the structures touching them

use ahash::AHashMap;
use std::sync::{Mutex, PoisonError};

use super::structure::SharedStructure;
use crate::core::types::{ChunkCoordinate, StructureId};

const SHARD_COUNT: usize = 16;

type Shard = AHashMap<ChunkCoordinate, AHashMap<StructureId, CacheEntry>>;

/// A structure registered against a chunk
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub structure: SharedStructure,
    /// Part of a branch structure rather than a standalone placeholder
    pub is_branch_member: bool,
}

/// Chunk -> structures index, safe for concurrent registration.
///
/// Chunks are spread over independently locked shards so workers placing
/// into different areas rarely contend. Entries are only ever added.
pub struct StructureCache {
    shards: [Mutex<Shard>; SHARD_COUNT],
}

impl StructureCache {
    pub fn new() -> Self {
        Self {
            shards: std::array::from_fn(|_| Mutex::new(AHashMap::new())),
        }
    }

    #[inline]
    fn shard(&self, chunk: ChunkCoordinate) -> &Mutex<Shard> {
        let hash = (chunk.x as u32).wrapping_mul(0x9E37_79B9) ^ (chunk.z as u32);
        &self.shards[hash as usize % SHARD_COUNT]
    }

    /// Register a structure against a chunk.
    ///
    /// Returns false when the pair was already registered, in which case
    /// the cache is left unchanged.
    pub fn register(
        &self,
        chunk: ChunkCoordinate,
        structure: &SharedStructure,
        is_branch_member: bool,
    ) -> bool {
        let mut shard = self
            .shard(chunk)
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let entries = shard.entry(chunk).or_default();
        if entries.contains_key(&structure.id()) {
            return false;
        }
        entries.insert(
            structure.id(),
            CacheEntry {
                structure: structure.clone(),
                is_branch_member,
            },
        );
        true
    }

    /// Structures registered against a chunk
    pub fn structures_in(&self, chunk: ChunkCoordinate) -> Vec<CacheEntry> {
        self.shard(chunk)
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&chunk)
            .map(|entries| entries.values().cloned().collect())
            .unwrap_or_default()
    }

    /// Number of chunks with at least one structure
    pub fn chunk_count(&self) -> usize {
        self.shards
            .iter()
            .map(|s| s.lock().unwrap_or_else(PoisonError::into_inner).len())
            .sum()
    }

    /// Total number of (chunk, structure) registrations
    pub fn entry_count(&self) -> usize {
        self.shards
            .iter()
            .map(|s| {
                s.lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .values()
                    .map(|entries| entries.len())
                    .sum::<usize>()
            })
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entry_count() == 0
    }
}

impl Default for StructureCache {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for StructureCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StructureCache")
            .field("chunks", &self.chunk_count())
            .field("entries", &self.entry_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objects::rotation::Rotation;
    use crate::structures::structure::{CustomStructure, StructureCoordinate};
    use rayon::prelude::*;
    use std::sync::Arc;

    fn structure() -> SharedStructure {
        CustomStructure::placeholder(StructureCoordinate {
            preset_name: "default".to_string(),
            object_name: "well".to_string(),
            rotation: Rotation::North,
            x: 0,
            y: 0,
            z: 0,
        })
    }

    #[test]
    fn test_register_is_idempotent() {
        let cache = StructureCache::new();
        let s = structure();
        let chunk = ChunkCoordinate::new(3, 4);

        assert!(cache.register(chunk, &s, false));
        assert!(!cache.register(chunk, &s, false));
        assert!(!cache.register(chunk, &s, true));

        let entries = cache.structures_in(chunk);
        assert_eq!(entries.len(), 1);
        assert!(!entries[0].is_branch_member);
    }

    #[test]
    fn test_distinct_structures_share_chunk() {
        let cache = StructureCache::new();
        let chunk = ChunkCoordinate::new(0, 0);

        cache.register(chunk, &structure(), false);
        cache.register(chunk, &structure(), true);

        assert_eq!(cache.structures_in(chunk).len(), 2);
        assert_eq!(cache.chunk_count(), 1);
        assert!(cache.structures_in(ChunkCoordinate::new(1, 0)).is_empty());
    }

    #[test]
    fn test_concurrent_registration() {
        let cache = StructureCache::new();
        let shared = structure();

        (0..64).into_par_iter().for_each(|i| {
            let own = structure();
            for cx in 0..8 {
                let chunk = ChunkCoordinate::new(cx, i % 4);
                cache.register(chunk, &own, false);
                cache.register(chunk, &shared, true);
            }
        });

        // 64 own structures over 8 chunks each, plus the shared one once per chunk
        assert_eq!(cache.chunk_count(), 32);
        assert_eq!(cache.entry_count(), 64 * 8 + 32);
        assert_eq!(Arc::strong_count(&shared), 33);
    }
}
