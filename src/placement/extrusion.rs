//! Extrusion of an object's outer layer through loose material
//!
//! Objects placed on uneven ground can leave their bottom layer floating.
//! With `BottomDown`, each column of the lowest layer is extended downward
//! through any extrude-through material until something else (or the world
//! floor) is reached; `TopUp` does the same upward from the highest layer.

use ahash::AHashSet;

use crate::core::config::config;
use crate::core::types::{BlockPos, PopulatingArea};
use crate::objects::functions::BlockFunction;
use crate::objects::schema::ExtrudeMode;
use crate::world::{Material, WorldGenRegion};

/// Collects the outermost layer of scheduled blocks and extends it
#[derive(Debug)]
pub struct ExtrusionHelper<'a> {
    mode: ExtrudeMode,
    through: &'a AHashSet<Material>,
    filler: Option<&'a Material>,
    edge_y: Option<i32>,
    edge: Vec<&'a BlockFunction>,
}

impl<'a> ExtrusionHelper<'a> {
    pub fn new(
        mode: ExtrudeMode,
        through: &'a AHashSet<Material>,
        filler: Option<&'a Material>,
    ) -> Self {
        Self {
            mode,
            through,
            filler,
            edge_y: None,
            edge: Vec::new(),
        }
    }

    /// Track a scheduled block if it lies on the extruded layer
    pub fn add_block(&mut self, block: &'a BlockFunction) {
        let further = match (self.mode, self.edge_y) {
            (ExtrudeMode::None, _) => return,
            (_, None) => true,
            (ExtrudeMode::BottomDown, Some(y)) => block.y < y,
            (ExtrudeMode::TopUp, Some(y)) => block.y > y,
        };
        if further {
            self.edge_y = Some(block.y);
            self.edge.clear();
        }
        if self.edge_y == Some(block.y) {
            self.edge.push(block);
        }
    }

    /// Fill each tracked column outward. Returns the number of cells written.
    pub fn extrude(
        &self,
        world: &mut dyn WorldGenRegion,
        origin: BlockPos,
        area: Option<&PopulatingArea>,
        replace_blocks: bool,
    ) -> usize {
        let step = match self.mode {
            ExtrudeMode::None => return 0,
            ExtrudeMode::BottomDown => -1,
            ExtrudeMode::TopUp => 1,
        };
        let cfg = config();
        let mut written = 0;

        for block in &self.edge {
            let material = self.filler.unwrap_or(&block.material);
            let mut pos = origin.offset(block.x, block.y + step, block.z);
            while cfg.in_vertical_bounds(pos.y) {
                let through = world
                    .material(pos, area)
                    .map_or(false, |m| self.through.contains(&m));
                if !through {
                    break;
                }
                world.set_block(pos, material, block.metadata.as_deref(), area, replace_blocks);
                written += 1;
                pos = pos.with_y(pos.y + step);
            }
        }

        written
    }
}
