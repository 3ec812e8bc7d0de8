//! Vertical placement of an object
//!
//! The base height comes from the object's spawn height policy; the origin
//! is the base plus a static offset and a random variance. Checks use the
//! base height, blocks the origin.

use rand::Rng;

use super::AbortReason;
use crate::core::config::config;
use crate::core::types::PopulatingArea;
use crate::objects::schema::SpawnHeight;
use crate::world::WorldGenRegion;

/// Resolved heights for one placement attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Elevation {
    /// Height chosen by the spawn height policy
    pub base_y: i32,
    /// Origin height after offset and variance
    pub y: i32,
}

/// Base height for a column according to the policy
#[allow(clippy::too_many_arguments)]
pub fn base_y<R: Rng + ?Sized>(
    policy: SpawnHeight,
    min_y: i32,
    max_y: i32,
    x: i32,
    z: i32,
    world: &dyn WorldGenRegion,
    area: Option<&PopulatingArea>,
    rng: &mut R,
) -> Result<i32, AbortReason> {
    match policy {
        SpawnHeight::RandomY => {
            if min_y > max_y {
                Err(AbortReason::EmptyHeightRange {
                    min: min_y,
                    max: max_y,
                })
            } else if min_y == max_y {
                Ok(min_y)
            } else {
                Ok(rng.gen_range(min_y..=max_y))
            }
        }
        SpawnHeight::HighestBlock => world
            .highest_block_above_y_at(x, z, area)
            .ok_or(AbortReason::HeightUnavailable { x, z }),
        SpawnHeight::HighestSolidBlock => world
            .block_above_solid_height(x, z, area)
            .ok_or(AbortReason::HeightUnavailable { x, z }),
    }
}

/// Static offset plus a random variance towards the sign of `variance`,
/// clamped to the world's vertical bounds.
///
/// Under `RandomY` the variance compounds with the already random base.
pub fn offset_and_variance<R: Rng + ?Sized>(rng: &mut R, offset: i32, variance: i32) -> i32 {
    if variance == 0 {
        return offset;
    }
    let variance = if variance < 0 {
        rng.gen_range(variance..=0)
    } else {
        rng.gen_range(0..=variance)
    };
    let cfg = config();
    offset
        .saturating_add(variance)
        .clamp(cfg.world_depth, cfg.world_height - 1)
}

/// Base height plus offset and variance
#[allow(clippy::too_many_arguments)]
pub fn resolve<R: Rng + ?Sized>(
    policy: SpawnHeight,
    min_y: i32,
    max_y: i32,
    offset: i32,
    variance: i32,
    x: i32,
    z: i32,
    world: &dyn WorldGenRegion,
    area: Option<&PopulatingArea>,
    rng: &mut R,
) -> Result<Elevation, AbortReason> {
    let base_y = base_y(policy, min_y, max_y, x, z, world, area, rng)?;
    Ok(Elevation {
        base_y,
        y: base_y.saturating_add(offset_and_variance(rng, offset, variance)),
    })
}
