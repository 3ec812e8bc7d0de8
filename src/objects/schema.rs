//! Object settings types for TOML deserialization.
//!
//! Settings are the raw, north-facing form of an object as authored. They
//! are turned into an immutable `ObjectDefinition` (with all four rotations
//! precomputed) once, when the object is enabled.

use serde::{Deserialize, Serialize};

use super::checks::SpawnCheck;
use super::functions::{AmbientEffect, BlockFunction, Branch, EntityFunction, Marker, SpawnPoint};
use crate::world::Material;

/// How the vertical position of an object is chosen
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SpawnHeight {
    /// Uniformly random between min and max height
    RandomY,
    /// On top of the highest non-air block of the column
    #[default]
    HighestBlock,
    /// On top of the highest solid block of the column
    HighestSolidBlock,
}

impl SpawnHeight {
    /// Height policy used when this object is a piece of a branch structure
    pub fn to_structure_part_spawn_height(self) -> StructurePartSpawnHeight {
        match self {
            SpawnHeight::RandomY => StructurePartSpawnHeight::Original,
            SpawnHeight::HighestBlock => StructurePartSpawnHeight::Highest,
            SpawnHeight::HighestSolidBlock => StructurePartSpawnHeight::HighestSolid,
        }
    }
}

/// Height policy for the pieces of a branch structure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StructurePartSpawnHeight {
    /// Keep the height the parent piece dictates
    Original,
    Highest,
    HighestSolid,
}

/// What happens to blocks whose target is not a source block
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OutsideSourceBlock {
    /// Such blocks are never written
    DontPlace,
    /// Such blocks are written like any other
    #[default]
    PlaceAnyway,
}

/// Direction in which the outermost layer of an object is extended
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExtrudeMode {
    #[default]
    None,
    /// Extend the lowest layer downward
    BottomDown,
    /// Extend the highest layer upward
    TopUp,
}

/// Complete object settings as stored in a TOML file
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ObjectSettings {
    #[serde(default)]
    pub meta: ObjectMeta,
    /// Mods that must be present for this object to be used
    #[serde(default)]
    pub required_mods: Vec<String>,
    #[serde(default)]
    pub placement: PlacementSettings,
    #[serde(default)]
    pub blocks: Vec<BlockFunction>,
    #[serde(default)]
    pub checks: Vec<SpawnCheck>,
    #[serde(default)]
    pub branches: Vec<Branch>,
    #[serde(default)]
    pub markers: Vec<Marker>,
    #[serde(default)]
    pub spawn_points: Vec<SpawnPoint>,
    #[serde(default)]
    pub ambient_effects: Vec<AmbientEffect>,
    #[serde(default)]
    pub entities: Vec<EntityFunction>,
}

/// Descriptive metadata
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ObjectMeta {
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub description: String,
}

/// Scalar placement policy
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PlacementSettings {
    /// May be used as a tree (sapling growth, tree resources)
    pub tree: bool,
    pub rotate_randomly: bool,
    /// Overwrite existing non-air blocks when placing
    pub replace_blocks: bool,
    /// Spawn attempts per chunk
    pub frequency: u32,
    /// Percent chance per attempt
    pub rarity: f64,
    pub min_height: i32,
    pub max_height: i32,
    pub spawn_height: SpawnHeight,
    pub spawn_height_offset: i32,
    pub spawn_height_variance: i32,
    pub source_blocks: Vec<Material>,
    pub max_percentage_outside_source_block: u32,
    pub outside_source_block: OutsideSourceBlock,
    pub extrude_mode: ExtrudeMode,
    pub extrude_through_blocks: Vec<Material>,
    /// Material written by extrusion; the extruded block's own when unset
    pub extrude_filler: Option<Material>,
    pub max_branch_depth: u32,
}

impl Default for PlacementSettings {
    fn default() -> Self {
        Self {
            tree: true,
            rotate_randomly: false,
            replace_blocks: true,
            frequency: 1,
            rarity: 100.0,
            min_height: 0,
            max_height: 256,
            spawn_height: SpawnHeight::HighestBlock,
            spawn_height_offset: 0,
            spawn_height_variance: 0,
            source_blocks: vec![Material::AIR],
            max_percentage_outside_source_block: 100,
            outside_source_block: OutsideSourceBlock::PlaceAnyway,
            extrude_mode: ExtrudeMode::None,
            extrude_through_blocks: vec![Material::AIR],
            extrude_filler: None,
            max_branch_depth: 10,
        }
    }
}
