//! Spawn check evaluation

use super::AbortReason;
use crate::core::types::{BlockPos, PopulatingArea};
use crate::objects::checks::SpawnCheck;
use crate::world::WorldGenRegion;

/// Evaluate checks in order against the base height.
///
/// Checks target surface conditions, so they use the height chosen by the
/// spawn height policy rather than the offset origin. The first failing
/// check ends evaluation.
pub fn evaluate(
    checks: &[SpawnCheck],
    world: &dyn WorldGenRegion,
    x: i32,
    base_y: i32,
    z: i32,
    area: Option<&PopulatingArea>,
) -> Result<(), AbortReason> {
    let base = BlockPos::new(x, base_y, z);
    for (index, check) in checks.iter().enumerate() {
        let pos = base.offset(check.x, check.y, check.z);
        if check.prevents_spawn(world, pos, area) {
            return Err(AbortReason::CheckFailed { index, pos });
        }
    }
    Ok(())
}
