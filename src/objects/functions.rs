//! Object functions: blocks, branches and attached data streams.
//!
//! Every function carries an offset relative to the object origin. Rotation
//! turns only that offset; every other field is copied verbatim. Relocation
//! produces a new copy whose offset is an absolute world position.

use serde::{Deserialize, Serialize};

use super::rotation::{rotate_xz, Rotate, Rotation};
use crate::core::types::{BlockPos, ChunkCoordinate};
use crate::world::Material;

/// Copy of a function moved from object-local to world coordinates
pub trait Relocate {
    fn relocated(&self, origin: BlockPos) -> Self;
}

/// Absolute or relative position of a function
pub trait Positioned {
    fn position(&self) -> BlockPos;

    fn chunk(&self) -> ChunkCoordinate {
        self.position().chunk()
    }
}

macro_rules! positioned {
    ($($ty:ty),*) => {
        $(
            impl Positioned for $ty {
                fn position(&self) -> BlockPos {
                    BlockPos::new(self.x, self.y, self.z)
                }
            }

            impl Rotate for $ty {
                fn rotate(&self) -> Self {
                    let (x, z) = rotate_xz(self.x, self.z);
                    Self { x, z, ..self.clone() }
                }
            }

            impl Relocate for $ty {
                fn relocated(&self, origin: BlockPos) -> Self {
                    Self {
                        x: origin.x + self.x,
                        y: origin.y + self.y,
                        z: origin.z + self.z,
                        ..self.clone()
                    }
                }
            }
        )*
    };
}

positioned!(BlockFunction, Marker, SpawnPoint, AmbientEffect, EntityFunction);

/// A single block of the object
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockFunction {
    pub x: i32,
    pub y: i32,
    pub z: i32,
    pub material: Material,
    /// Extra block data (tile entity payload, NBT file name, ...)
    #[serde(default)]
    pub metadata: Option<String>,
}

impl BlockFunction {
    pub fn new(x: i32, y: i32, z: i32, material: impl Into<Material>) -> Self {
        Self {
            x,
            y,
            z,
            material: material.into(),
            metadata: None,
        }
    }
}

/// Marker left for other mods to pick up
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub x: i32,
    pub y: i32,
    pub z: i32,
    pub mod_id: String,
    #[serde(default)]
    pub mod_data: String,
}

/// Optional velocity on each axis; unset axes keep the host default
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Velocity {
    #[serde(default)]
    pub x: Option<f64>,
    #[serde(default)]
    pub y: Option<f64>,
    #[serde(default)]
    pub z: Option<f64>,
}

/// Mob spawn point that keeps spawning after generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpawnPoint {
    pub x: i32,
    pub y: i32,
    pub z: i32,
    pub mob_name: String,
    #[serde(default)]
    pub nbt_file_name: Option<String>,
    #[serde(default = "default_one")]
    pub group_size: u32,
    /// Seconds between spawn attempts
    #[serde(default = "default_interval")]
    pub interval: u32,
    /// Percent chance per attempt
    #[serde(default = "default_chance")]
    pub spawn_chance: u32,
    #[serde(default = "default_one")]
    pub max_count: u32,
    /// Seconds before spawned mobs despawn, 0 for never
    #[serde(default)]
    pub despawn_time: u32,
    #[serde(default)]
    pub velocity: Velocity,
    #[serde(default)]
    pub yaw: f32,
    #[serde(default)]
    pub pitch: f32,
}

/// Ambient particle emitter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmbientEffect {
    pub x: i32,
    pub y: i32,
    pub z: i32,
    pub particle_name: String,
    /// Seconds between emissions
    #[serde(default = "default_particle_interval")]
    pub interval: f64,
    #[serde(default)]
    pub velocity: Velocity,
}

/// Entity spawned once when the object is placed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityFunction {
    pub x: i32,
    pub y: i32,
    pub z: i32,
    pub name: String,
    #[serde(default)]
    pub resource_location: Option<String>,
    #[serde(default = "default_one")]
    pub group_size: u32,
    #[serde(default)]
    pub name_tag_or_nbt_file: Option<String>,
    #[serde(default)]
    pub nbt: Option<String>,
    /// Facing in quarter turns
    #[serde(default)]
    pub facing: u8,
}

fn default_one() -> u32 {
    1
}

fn default_interval() -> u32 {
    20
}

fn default_chance() -> u32 {
    100
}

fn default_particle_interval() -> f64 {
    1.0
}

/// One candidate object a branch may place
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BranchPossibility {
    pub object: String,
    #[serde(default)]
    pub rotation: Rotation,
    /// Percent chance this candidate is picked
    #[serde(default = "default_branch_chance")]
    pub chance: f64,
}

fn default_branch_chance() -> f64 {
    100.0
}

/// Attachment point where a composite structure continues with more objects
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Branch {
    pub x: i32,
    pub y: i32,
    pub z: i32,
    #[serde(default)]
    pub possibilities: Vec<BranchPossibility>,
    /// Overrides the object's max branch depth for this branch
    #[serde(default)]
    pub max_depth: Option<u32>,
}

impl Rotate for Branch {
    fn rotate(&self) -> Self {
        let (x, z) = rotate_xz(self.x, self.z);
        Self {
            x,
            z,
            possibilities: self
                .possibilities
                .iter()
                .map(|p| BranchPossibility {
                    rotation: p.rotation.next(),
                    ..p.clone()
                })
                .collect(),
            ..self.clone()
        }
    }
}

/// Inclusive-size box around an object's blocks, relative to its origin
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_x: i32,
    pub min_y: i32,
    pub min_z: i32,
    pub width: i32,
    pub height: i32,
    pub depth: i32,
}

impl BoundingBox {
    /// Smallest box covering every block; empty box at origin for no blocks
    pub fn from_blocks(blocks: &[BlockFunction]) -> Self {
        let Some(first) = blocks.first() else {
            return Self::default();
        };
        let (mut min, mut max) = ((first.x, first.y, first.z), (first.x, first.y, first.z));
        for b in blocks {
            min = (min.0.min(b.x), min.1.min(b.y), min.2.min(b.z));
            max = (max.0.max(b.x), max.1.max(b.y), max.2.max(b.z));
        }
        Self {
            min_x: min.0,
            min_y: min.1,
            min_z: min.2,
            width: max.0 - min.0 + 1,
            height: max.1 - min.1 + 1,
            depth: max.2 - min.2 + 1,
        }
    }

    pub fn contains(&self, x: i32, y: i32, z: i32) -> bool {
        x >= self.min_x
            && x < self.min_x + self.width
            && y >= self.min_y
            && y < self.min_y + self.height
            && z >= self.min_z
            && z < self.min_z + self.depth
    }
}

impl Rotate for BoundingBox {
    fn rotate(&self) -> Self {
        // x' = z, z' = -x: the new x span is the old z span and the new z
        // span is the negated old x span.
        Self {
            min_x: self.min_z,
            min_z: -(self.min_x + self.width - 1),
            width: self.depth,
            depth: self.width,
            ..*self
        }
    }
}
