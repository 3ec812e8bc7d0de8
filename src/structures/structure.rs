//! Placed structures and the relocated data they own

use rand::Rng;
use std::sync::{Arc, Mutex, PoisonError};

use crate::core::types::{BlockPos, ChunkCoordinate, StructureId, CHUNK_SIZE};
use crate::objects::functions::{AmbientEffect, Marker, SpawnPoint};
use crate::objects::rotation::Rotation;

/// Where and how a structure starts
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StructureCoordinate {
    pub preset_name: String,
    pub object_name: String,
    pub rotation: Rotation,
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl StructureCoordinate {
    /// Random start inside a chunk at a height in `min_y..=max_y`
    pub fn roll<R: Rng + ?Sized>(
        preset_name: &str,
        object_name: &str,
        rotation: Rotation,
        min_y: i32,
        max_y: i32,
        chunk: ChunkCoordinate,
        rng: &mut R,
    ) -> Self {
        let y = if min_y >= max_y {
            min_y
        } else {
            rng.gen_range(min_y..=max_y)
        };
        Self {
            preset_name: preset_name.to_string(),
            object_name: object_name.to_string(),
            rotation,
            x: chunk.block_x() + CHUNK_SIZE / 2 + rng.gen_range(0..CHUNK_SIZE),
            // z window starts one block before the chunk centre; existing
            // worlds depend on this
            z: chunk.block_z() + CHUNK_SIZE / 2 - 1 + rng.gen_range(0..CHUNK_SIZE),
            y,
        }
    }

    pub fn position(&self) -> BlockPos {
        BlockPos::new(self.x, self.y, self.z)
    }

    pub fn chunk(&self) -> ChunkCoordinate {
        ChunkCoordinate::from_block_coords(self.x, self.z)
    }
}

/// Relocated data accumulated by all pieces of a structure
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StructureFunctions {
    pub markers: Vec<Marker>,
    pub spawn_points: Vec<SpawnPoint>,
    pub ambient_effects: Vec<AmbientEffect>,
}

impl StructureFunctions {
    pub fn is_empty(&self) -> bool {
        self.markers.is_empty() && self.spawn_points.is_empty() && self.ambient_effects.is_empty()
    }

    pub fn append(&mut self, other: StructureFunctions) {
        self.markers.extend(other.markers);
        self.spawn_points.extend(other.spawn_points);
        self.ambient_effects.extend(other.ambient_effects);
    }
}

/// A placed structure: either a branch-built composite or a placeholder
/// that wraps one standalone object so its data still has an owner.
#[derive(Debug)]
pub struct CustomStructure {
    id: StructureId,
    start: StructureCoordinate,
    placeholder: bool,
    functions: Mutex<StructureFunctions>,
}

/// Structures are shared between the cache and their builders
pub type SharedStructure = Arc<CustomStructure>;

impl CustomStructure {
    /// Root of a branch structure
    pub fn composite(start: StructureCoordinate) -> SharedStructure {
        Arc::new(Self {
            id: StructureId::new(),
            start,
            placeholder: false,
            functions: Mutex::new(StructureFunctions::default()),
        })
    }

    /// Owner for a single object placed outside any branch structure
    pub fn placeholder(start: StructureCoordinate) -> SharedStructure {
        Arc::new(Self {
            id: StructureId::new(),
            start,
            placeholder: true,
            functions: Mutex::new(StructureFunctions::default()),
        })
    }

    pub fn id(&self) -> StructureId {
        self.id
    }

    pub fn start(&self) -> &StructureCoordinate {
        &self.start
    }

    pub fn is_placeholder(&self) -> bool {
        self.placeholder
    }

    /// Add relocated data from one placed piece
    pub fn add_functions(&self, functions: StructureFunctions) {
        self.functions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .append(functions);
    }

    /// Copy of everything accumulated so far
    pub fn functions(&self) -> StructureFunctions {
        self.functions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}
