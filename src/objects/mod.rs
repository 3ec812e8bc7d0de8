//! Custom objects: definitions, their on-disk schema and spawn entry points
//!
//! An object is loaded lazily from its definition file. Once loaded it is
//! immutable and can be spawned any number of times through the
//! `CustomObject` entry points, which all funnel into the staged placement
//! pipeline in `crate::placement`.

pub mod bo3;
pub mod checks;
pub mod definition;
pub mod functions;
pub mod loader;
pub mod registry;
pub mod rotation;
pub mod schema;

pub use bo3::{Bo3Object, LoadState};
pub use definition::{ObjectDefinition, OrientedGeometry};
pub use loader::{ConfigError, DefinitionLoader, TomlDefinitionLoader};
pub use registry::ObjectRegistry;
pub use rotation::Rotation;

use crate::core::types::ChunkCoordinate;
use crate::placement::{PlacementContext, PlacementOutcome, PlacementRequest};
use crate::structures::{SharedStructure, StructureCoordinate};
use crate::world::ModLoadedChecker;
use functions::{BoundingBox, Branch};
use rand::RngCore;
use schema::StructurePartSpawnHeight;

/// Spawn entry points every placeable object offers
pub trait CustomObject {
    fn name(&self) -> &str;

    /// Load the definition if that has not been attempted yet.
    /// Returns whether the object is usable.
    fn on_enable(&mut self, loader: &dyn DefinitionLoader) -> bool;

    /// Whether the object is loaded and every mod it requires is present
    fn load_checks(&self, mods: &dyn ModLoadedChecker) -> bool;

    fn can_spawn_as_tree(&self) -> bool;
    fn can_rotate_randomly(&self) -> bool;
    fn do_replace_blocks(&self) -> bool;

    /// Grow the object from a sapling at the exact position
    fn spawn_from_sapling(
        &self,
        ctx: &mut PlacementContext<'_>,
        rotation: Rotation,
        x: i32,
        y: i32,
        z: i32,
    ) -> bool;

    /// Place the object at the exact position without any validation
    /// beyond the world's vertical bounds
    fn spawn_forced(
        &self,
        ctx: &mut PlacementContext<'_>,
        rotation: Rotation,
        x: i32,
        y: i32,
        z: i32,
    ) -> bool;

    /// Population pass for one chunk: `frequency` trials, each succeeding
    /// with `rarity` percent. Returns whether anything spawned.
    fn process(&self, ctx: &mut PlacementContext<'_>, chunk: ChunkCoordinate) -> bool;

    /// Single population-time placement as a tree. `None` bounds fall back
    /// to the object's own height range.
    fn spawn_as_tree(
        &self,
        ctx: &mut PlacementContext<'_>,
        x: i32,
        z: i32,
        min_y: Option<i32>,
        max_y: Option<i32>,
        chunk: ChunkCoordinate,
    ) -> bool;
}

/// Objects that can act as pieces of branch-built structures
pub trait StructuredCustomObject: CustomObject {
    /// Run the full placement pipeline at a resolved location
    fn try_spawn_at(
        &self,
        structure: Option<&SharedStructure>,
        request: &PlacementRequest,
        ctx: &mut PlacementContext<'_>,
    ) -> PlacementOutcome;

    fn branches(&self, rotation: Rotation) -> &[Branch];

    fn bounding_box(&self, rotation: Rotation) -> Option<BoundingBox>;

    fn max_branch_depth(&self) -> u32;

    fn structure_part_spawn_height(&self) -> StructurePartSpawnHeight;

    /// Roll a start coordinate for a structure rooted in `chunk`
    fn make_structure_coordinate(
        &self,
        preset_name: &str,
        rng: &mut dyn RngCore,
        chunk: ChunkCoordinate,
    ) -> Option<StructureCoordinate>;
}
