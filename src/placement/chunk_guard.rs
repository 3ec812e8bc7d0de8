//! Guard against touching chunks outside the populating area
//!
//! Blocks are grouped by chunk and each distinct chunk is verified once:
//! because the populating area is an axis-aligned rectangle, checking the
//! extreme columns of the object inside a chunk covers every block there.

use ahash::AHashMap;

use super::AbortReason;
use crate::core::types::{BlockPos, ChunkCoordinate, PopulatingArea};
use crate::objects::functions::BlockFunction;

/// Horizontal extent of the object's blocks within one chunk
#[derive(Debug, Clone, Copy)]
struct Footprint {
    min_x: i32,
    max_x: i32,
    min_z: i32,
    max_z: i32,
}

impl Footprint {
    fn new(x: i32, z: i32) -> Self {
        Self {
            min_x: x,
            max_x: x,
            min_z: z,
            max_z: z,
        }
    }

    fn include(&mut self, x: i32, z: i32) {
        self.min_x = self.min_x.min(x);
        self.max_x = self.max_x.max(x);
        self.min_z = self.min_z.min(z);
        self.max_z = self.max_z.max(z);
    }

    fn inside(&self, area: &PopulatingArea) -> bool {
        area.contains(self.min_x, self.min_z) && area.contains(self.max_x, self.max_z)
    }
}

/// Verify every chunk the blocks touch lies inside the populating area.
///
/// Without an area the caller vouches for the world being loaded and the
/// guard passes. The reported chunk is the lowest failing one, so the
/// outcome does not depend on block order.
pub fn verify(
    blocks: &[BlockFunction],
    origin: BlockPos,
    area: Option<&PopulatingArea>,
) -> Result<(), AbortReason> {
    let Some(area) = area else {
        return Ok(());
    };

    let mut footprints: AHashMap<ChunkCoordinate, Footprint> = AHashMap::new();
    for block in blocks {
        let x = origin.x + block.x;
        let z = origin.z + block.z;
        footprints
            .entry(ChunkCoordinate::from_block_coords(x, z))
            .and_modify(|f| f.include(x, z))
            .or_insert_with(|| Footprint::new(x, z));
    }

    match footprints
        .iter()
        .filter(|(_, f)| !f.inside(area))
        .map(|(chunk, _)| *chunk)
        .min()
    {
        Some(chunk) => Err(AbortReason::ChunkNotLoaded { chunk }),
        None => Ok(()),
    }
}
