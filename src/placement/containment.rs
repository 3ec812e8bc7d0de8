//! Source block containment
//!
//! Objects such as cave structures declare the material they should be
//! embedded in. Blocks landing elsewhere are "outside" and are limited to a
//! percentage of the object.
//!
//! Outside blocks are counted whenever the policy is `DontPlace` or the
//! tolerance is below 100%; once the count exceeds the allowance the whole
//! placement is abandoned. A counted block is written under `PlaceAnyway`
//! and skipped under `DontPlace`. With a 100% tolerance under `PlaceAnyway`
//! nothing is counted and every block is written.

use ahash::AHashSet;

use super::AbortReason;
use crate::core::types::{BlockPos, PopulatingArea};
use crate::objects::functions::BlockFunction;
use crate::objects::schema::OutsideSourceBlock;
use crate::world::{Material, WorldGenRegion};

/// Largest number of outside blocks allowed: `ceil(total * percentage / 100)`
pub fn max_allowed_outside(total: usize, percentage: u32) -> usize {
    (total * percentage as usize).div_ceil(100)
}

/// Containment rules of one object
#[derive(Debug, Clone, Copy)]
pub struct ContainmentPolicy<'a> {
    pub source_blocks: &'a AHashSet<Material>,
    pub max_percentage_outside: u32,
    pub outside_source_block: OutsideSourceBlock,
}

impl<'a> ContainmentPolicy<'a> {
    /// Whether outside blocks are counted against the allowance
    pub fn counts_outside(&self) -> bool {
        self.outside_source_block == OutsideSourceBlock::DontPlace
            || self.max_percentage_outside < 100
    }

    /// Scan blocks in order and return the ones to write
    pub fn filter<'b>(
        &self,
        blocks: &'b [BlockFunction],
        origin: BlockPos,
        world: &dyn WorldGenRegion,
        area: Option<&PopulatingArea>,
    ) -> Result<Vec<&'b BlockFunction>, AbortReason> {
        if !self.counts_outside() {
            return Ok(blocks.iter().collect());
        }

        let max = max_allowed_outside(blocks.len(), self.max_percentage_outside);
        let mut outside = 0;
        let mut scheduled = Vec::with_capacity(blocks.len());

        for block in blocks {
            let pos = origin.offset(block.x, block.y, block.z);
            let in_source = world
                .material(pos, area)
                .map_or(false, |m| self.source_blocks.contains(&m));

            if in_source {
                scheduled.push(block);
                continue;
            }

            outside += 1;
            if outside > max {
                return Err(AbortReason::TooManyOutsideSource { outside, max });
            }
            if self.outside_source_block == OutsideSourceBlock::PlaceAnyway {
                scheduled.push(block);
            }
        }

        Ok(scheduled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::MemoryWorld;

    fn stone_set() -> AHashSet<Material> {
        [Material::STONE].into_iter().collect()
    }

    /// Row of `n` blocks along x at y = 10; the first `stone` cells are stone
    fn row(n: i32, stone: i32) -> (Vec<BlockFunction>, MemoryWorld) {
        let mut world = MemoryWorld::new("test");
        let mut blocks = Vec::new();
        for x in 0..n {
            blocks.push(BlockFunction::new(x, 0, 0, "cobblestone"));
            world.put(
                BlockPos::new(x, 10, 0),
                if x < stone { Material::STONE } else { Material::DIRT },
            );
        }
        (blocks, world)
    }

    #[test]
    fn test_max_allowed_outside() {
        assert_eq!(max_allowed_outside(10, 30), 3);
        assert_eq!(max_allowed_outside(3, 50), 2);
        assert_eq!(max_allowed_outside(7, 0), 0);
        assert_eq!(max_allowed_outside(7, 100), 7);
        assert_eq!(max_allowed_outside(0, 50), 0);
    }

    #[test]
    fn test_dont_place_aborts_past_allowance() {
        let set = stone_set();
        let policy = ContainmentPolicy {
            source_blocks: &set,
            max_percentage_outside: 30,
            outside_source_block: OutsideSourceBlock::DontPlace,
        };

        // 3 outside of 10 is within ceil(10 * 0.3) = 3
        let (blocks, world) = row(10, 7);
        let scheduled = policy.filter(&blocks, BlockPos::new(0, 10, 0), &world, None).unwrap();
        assert_eq!(scheduled.len(), 7);

        // a 4th outside block aborts
        let (blocks, world) = row(10, 6);
        assert_eq!(
            policy.filter(&blocks, BlockPos::new(0, 10, 0), &world, None),
            Err(AbortReason::TooManyOutsideSource { outside: 4, max: 3 })
        );
    }

    #[test]
    fn test_place_anyway_under_cap_writes_outside_blocks() {
        let set = stone_set();
        let policy = ContainmentPolicy {
            source_blocks: &set,
            max_percentage_outside: 50,
            outside_source_block: OutsideSourceBlock::PlaceAnyway,
        };
        let (blocks, world) = row(4, 2);
        let scheduled = policy.filter(&blocks, BlockPos::new(0, 10, 0), &world, None).unwrap();
        assert_eq!(scheduled.len(), 4);

        let (blocks, world) = row(4, 1);
        assert!(policy.filter(&blocks, BlockPos::new(0, 10, 0), &world, None).is_err());
    }

    #[test]
    fn test_full_tolerance_place_anyway_schedules_everything() {
        let set = stone_set();
        let policy = ContainmentPolicy {
            source_blocks: &set,
            max_percentage_outside: 100,
            outside_source_block: OutsideSourceBlock::PlaceAnyway,
        };
        assert!(!policy.counts_outside());

        let (blocks, world) = row(5, 0);
        let scheduled = policy.filter(&blocks, BlockPos::new(0, 10, 0), &world, None).unwrap();
        assert_eq!(scheduled.len(), 5);
    }

    #[test]
    fn test_full_tolerance_dont_place_drops_outside_blocks() {
        let set = stone_set();
        let policy = ContainmentPolicy {
            source_blocks: &set,
            max_percentage_outside: 100,
            outside_source_block: OutsideSourceBlock::DontPlace,
        };
        let (blocks, world) = row(5, 2);
        let scheduled = policy.filter(&blocks, BlockPos::new(0, 10, 0), &world, None).unwrap();
        assert_eq!(scheduled.iter().map(|b| b.x).collect::<Vec<_>>(), vec![0, 1]);
    }
}
