//! World access surface consumed by the placement pipeline

pub mod material;
pub mod memory;

pub use material::Material;
pub use memory::MemoryWorld;

use crate::core::types::{BlockPos, PopulatingArea};
use crate::objects::functions::EntityFunction;

/// Read/write access to the world region being generated.
///
/// Every query that takes an `area` is constrained to it: positions outside
/// the populating area read as `None` and writes there are ignored. `None`
/// for `area` means the caller vouches for the whole world being loaded.
pub trait WorldGenRegion {
    /// Name of the preset (world type) this region belongs to
    fn preset_name(&self) -> &str;

    /// Material at an absolute position, `None` when it cannot be read
    fn material(&self, pos: BlockPos, area: Option<&PopulatingArea>) -> Option<Material>;

    /// Write a block. With `replace_blocks` false an existing non-air
    /// block is left in place.
    fn set_block(
        &mut self,
        pos: BlockPos,
        material: &Material,
        metadata: Option<&str>,
        area: Option<&PopulatingArea>,
        replace_blocks: bool,
    );

    /// Y just above the highest non-air block of the column
    fn highest_block_above_y_at(&self, x: i32, z: i32, area: Option<&PopulatingArea>)
        -> Option<i32>;

    /// Y just above the highest solid block of the column
    fn block_above_solid_height(&self, x: i32, z: i32, area: Option<&PopulatingArea>)
        -> Option<i32>;

    /// Hand an entity over to the world
    fn spawn_entity(&mut self, entity: EntityFunction, area: Option<&PopulatingArea>);
}

/// Reports which mods are present in the running host
pub trait ModLoadedChecker {
    fn is_mod_loaded(&self, mod_name: &str) -> bool;
}

/// Checker for a host without mods
#[derive(Debug, Clone, Copy, Default)]
pub struct NoMods;

impl ModLoadedChecker for NoMods {
    fn is_mod_loaded(&self, _mod_name: &str) -> bool {
        false
    }
}

impl<F: Fn(&str) -> bool> ModLoadedChecker for F {
    fn is_mod_loaded(&self, mod_name: &str) -> bool {
        self(mod_name)
    }
}
