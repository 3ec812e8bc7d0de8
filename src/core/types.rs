//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Width of a chunk along both horizontal axes (blocks)
pub const CHUNK_SIZE: i32 = 16;

/// Absolute block position in the world
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl BlockPos {
    pub fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Position shifted by a relative offset
    #[inline]
    pub fn offset(&self, dx: i32, dy: i32, dz: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            z: self.z + dz,
        }
    }

    /// Same column, different height
    #[inline]
    pub fn with_y(&self, y: i32) -> Self {
        Self { y, ..*self }
    }

    pub fn chunk(&self) -> ChunkCoordinate {
        ChunkCoordinate::from_block_coords(self.x, self.z)
    }
}

impl std::fmt::Display for BlockPos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// Horizontal 16x16 column of the world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChunkCoordinate {
    pub x: i32,
    pub z: i32,
}

impl ChunkCoordinate {
    pub fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Chunk containing the given block column (floors toward negative infinity)
    #[inline]
    pub fn from_block_coords(block_x: i32, block_z: i32) -> Self {
        Self {
            x: block_x.div_euclid(CHUNK_SIZE),
            z: block_z.div_euclid(CHUNK_SIZE),
        }
    }

    pub fn block_x(&self) -> i32 {
        self.x * CHUNK_SIZE
    }

    pub fn block_z(&self) -> i32 {
        self.z * CHUNK_SIZE
    }

    /// Block x of the chunk centre, where the population window starts
    pub fn block_x_center(&self) -> i32 {
        self.block_x() + CHUNK_SIZE / 2
    }

    /// Block z of the chunk centre, where the population window starts
    pub fn block_z_center(&self) -> i32 {
        self.block_z() + CHUNK_SIZE / 2
    }
}

/// The window of blocks a population step may read and write.
///
/// Populating chunk (cx, cz) touches the square that starts at the chunk
/// centre and spans `window` blocks on both axes, which lands inside the 2x2
/// chunks whose generation is guaranteed when the step runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PopulatingArea {
    pub chunk: ChunkCoordinate,
    pub window: i32,
}

impl PopulatingArea {
    pub fn new(chunk: ChunkCoordinate) -> Self {
        Self {
            chunk,
            window: crate::core::config::config().population_window,
        }
    }

    pub fn with_window(chunk: ChunkCoordinate, window: i32) -> Self {
        Self { chunk, window }
    }

    #[inline]
    pub fn contains(&self, block_x: i32, block_z: i32) -> bool {
        let min_x = self.chunk.block_x_center();
        let min_z = self.chunk.block_z_center();
        block_x >= min_x
            && block_x < min_x + self.window
            && block_z >= min_z
            && block_z < min_z + self.window
    }
}

/// Unique identifier for placed structures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StructureId(pub Uuid);

impl StructureId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for StructureId {
    fn default() -> Self {
        Self::new()
    }
}
