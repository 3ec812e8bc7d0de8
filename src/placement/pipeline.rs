//! Staged validate-then-commit placement of one object at one location

use ahash::AHashSet;

use super::chunk_guard;
use super::containment::ContainmentPolicy;
use super::extrusion::ExtrusionHelper;
use super::relocate::handle_functions;
use super::{checks, AbortReason, PlacementContext, PlacementOutcome, PlacementReport, PlacementStage};
use crate::core::config::config;
use crate::core::types::{BlockPos, ChunkCoordinate, PopulatingArea};
use crate::objects::definition::{ObjectDefinition, OrientedGeometry};
use crate::objects::functions::BlockFunction;
use crate::objects::rotation::Rotation;
use crate::structures::SharedStructure;
use crate::world::WorldGenRegion;

/// Which caller asked for the placement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlacementMode {
    /// Terrain population: every validation applies
    Population,
    /// Explicit command: only world bounds apply
    Forced,
    /// Natural growth from a sapling: may only grow into air or foliage
    Sapling,
}

/// One placement attempt at a fully resolved location
#[derive(Debug, Clone, PartialEq)]
pub struct PlacementRequest {
    pub rotation: Rotation,
    /// Object origin after offset and variance
    pub origin: BlockPos,
    /// Height chosen by the spawn height policy, used by checks
    pub base_y: i32,
    /// Allowed origin heights, when the caller restricts them
    pub height_range: Option<(i32, i32)>,
    pub area: Option<PopulatingArea>,
    pub replace_blocks: bool,
    pub mode: PlacementMode,
}

impl PlacementRequest {
    pub fn new(rotation: Rotation, origin: BlockPos, mode: PlacementMode) -> Self {
        Self {
            rotation,
            origin,
            base_y: origin.y,
            height_range: None,
            area: None,
            replace_blocks: true,
            mode,
        }
    }
}

/// Run all placement stages.
///
/// Validation only reads the world. The first failing stage returns
/// `Aborted` with the world and cache untouched.
pub fn run(
    def: &ObjectDefinition,
    req: &PlacementRequest,
    structure: Option<&SharedStructure>,
    ctx: &mut PlacementContext<'_>,
) -> PlacementOutcome {
    match validate(def, req, &*ctx.world) {
        Ok(scheduled) => commit(def, req, scheduled, structure, ctx),
        Err((stage, reason)) => {
            tracing::trace!(
                object = %def.name,
                origin = %req.origin,
                ?stage,
                ?reason,
                "placement aborted"
            );
            PlacementOutcome::aborted(stage, reason)
        }
    }
}

type StageResult<T> = Result<T, (PlacementStage, AbortReason)>;

fn at<T>(stage: PlacementStage, result: Result<T, AbortReason>) -> StageResult<T> {
    result.map_err(|reason| (stage, reason))
}

/// All validating stages; returns the blocks to commit
fn validate<'d>(
    def: &'d ObjectDefinition,
    req: &PlacementRequest,
    world: &dyn WorldGenRegion,
) -> StageResult<Vec<&'d BlockFunction>> {
    let geometry = def.oriented(req.rotation);
    let area = req.area.as_ref();

    at(PlacementStage::ValidatingBounds, check_bounds(geometry, req))?;

    // Sapling growth replaces the checks with the foliage rule below
    if req.mode == PlacementMode::Population {
        at(
            PlacementStage::ValidatingChecks,
            checks::evaluate(&geometry.checks, world, req.origin.x, req.base_y, req.origin.z, area),
        )?;
    }
    if req.mode != PlacementMode::Forced {
        at(
            PlacementStage::ValidatingChunkLoad,
            chunk_guard::verify(&geometry.blocks, req.origin, area),
        )?;
    }

    let scheduled = match req.mode {
        PlacementMode::Forced => Ok(geometry.blocks.iter().collect()),
        PlacementMode::Sapling => growth_targets(&geometry.blocks, req.origin, world, area),
        PlacementMode::Population => ContainmentPolicy {
            source_blocks: &def.source_blocks,
            max_percentage_outside: def.max_percentage_outside_source_block,
            outside_source_block: def.outside_source_block,
        }
        .filter(&geometry.blocks, req.origin, world, area),
    };
    at(PlacementStage::ValidatingContainment, scheduled)
}

fn check_bounds(geometry: &OrientedGeometry, req: &PlacementRequest) -> Result<(), AbortReason> {
    let cfg = config();
    let y = req.origin.y;

    if !cfg.in_vertical_bounds(y) {
        return Err(AbortReason::OriginOutOfWorld { y });
    }
    if let Some((min, max)) = req.height_range {
        if y < min || y > max {
            return Err(AbortReason::OutsideHeightRange { y, min, max });
        }
    }
    for block in &geometry.blocks {
        let pos = req.origin.offset(block.x, block.y, block.z);
        if !cfg.in_vertical_bounds(pos.y) {
            return Err(AbortReason::BlockOutOfWorld { pos });
        }
    }
    Ok(())
}

/// Blocks a sapling may grow. Anything at or above the origin layer must
/// target air, logs, leaves or a sapling; only air is written.
fn growth_targets<'d>(
    blocks: &'d [BlockFunction],
    origin: BlockPos,
    world: &dyn WorldGenRegion,
    area: Option<&PopulatingArea>,
) -> Result<Vec<&'d BlockFunction>, AbortReason> {
    let mut scheduled = Vec::with_capacity(blocks.len());
    for block in blocks {
        let pos = origin.offset(block.x, block.y, block.z);
        let material = world.material(pos, area);
        let is_air = material.as_ref().map_or(false, |m| m.is_air());

        if block.y >= 0 {
            let growable = material
                .as_ref()
                .map_or(false, |m| m.is_air() || m.is_log_or_leaves() || m.is_sapling());
            if !growable {
                return Err(AbortReason::Obstructed { pos });
            }
        }
        if is_air {
            scheduled.push(block);
        }
    }
    Ok(scheduled)
}

fn commit(
    def: &ObjectDefinition,
    req: &PlacementRequest,
    scheduled: Vec<&BlockFunction>,
    structure: Option<&SharedStructure>,
    ctx: &mut PlacementContext<'_>,
) -> PlacementOutcome {
    let geometry = def.oriented(req.rotation);
    let area = req.area.as_ref();
    // Saplings only grow into air and never overwrite
    let replace = req.replace_blocks && req.mode != PlacementMode::Sapling;

    let mut extrusion = ExtrusionHelper::new(
        def.extrude_mode,
        &def.extrude_through_blocks,
        def.extrude_filler.as_ref(),
    );
    let mut block_chunks = AHashSet::new();

    for &block in &scheduled {
        let pos = req.origin.offset(block.x, block.y, block.z);
        ctx.world
            .set_block(pos, &block.material, block.metadata.as_deref(), area, replace);
        block_chunks.insert(ChunkCoordinate::from_block_coords(pos.x, pos.z));
        extrusion.add_block(block);
    }
    let blocks_extruded = extrusion.extrude(ctx.world, req.origin, area, replace);

    let registration = handle_functions(
        geometry,
        &def.name,
        req.origin,
        &block_chunks,
        structure,
        ctx.cache,
        ctx.world,
        area,
    );

    PlacementOutcome::Done(PlacementReport {
        origin: req.origin,
        rotation: req.rotation,
        blocks_placed: scheduled.len(),
        blocks_extruded,
        structure: registration.structure,
        registered_chunks: registration.chunks,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objects::checks::{CheckKind, SpawnCheck};
    use crate::objects::functions::Marker;
    use crate::objects::schema::{ExtrudeMode, ObjectSettings, OutsideSourceBlock};
    use crate::structures::StructureCache;
    use crate::world::{Material, MemoryWorld};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn definition(configure: impl FnOnce(&mut ObjectSettings)) -> ObjectDefinition {
        let mut settings = ObjectSettings::default();
        settings.blocks = vec![
            BlockFunction::new(0, 0, 0, "stone"),
            BlockFunction::new(1, 0, 0, "stone"),
            BlockFunction::new(2, 0, 0, "stone"),
        ];
        configure(&mut settings);
        ObjectDefinition::from_settings("test", settings).unwrap()
    }

    fn population(origin: BlockPos) -> PlacementRequest {
        PlacementRequest {
            height_range: Some((0, 255)),
            ..PlacementRequest::new(Rotation::North, origin, PlacementMode::Population)
        }
    }

    fn run_on(
        def: &ObjectDefinition,
        req: &PlacementRequest,
        world: &mut MemoryWorld,
        cache: &StructureCache,
    ) -> PlacementOutcome {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let mut ctx = PlacementContext::new(cache, world, &mut rng);
        run(def, req, None, &mut ctx)
    }

    #[test]
    fn test_stone_dirt_scenario() {
        let def = definition(|s| {
            s.placement.source_blocks = vec![Material::STONE];
            s.placement.max_percentage_outside_source_block = 50;
            s.placement.outside_source_block = OutsideSourceBlock::DontPlace;
            s.blocks = vec![
                BlockFunction::new(0, 0, 0, "cobblestone"),
                BlockFunction::new(1, 0, 0, "cobblestone"),
                BlockFunction::new(2, 0, 0, "cobblestone"),
            ];
        });
        let mut world = MemoryWorld::new("test");
        world.put(BlockPos::new(0, 10, 0), Material::STONE);
        world.put(BlockPos::new(1, 10, 0), Material::STONE);
        world.put(BlockPos::new(2, 10, 0), Material::DIRT);
        let cache = StructureCache::new();

        let outcome = run_on(&def, &population(BlockPos::new(0, 10, 0)), &mut world, &cache);

        assert_eq!(outcome.report().map(|r| r.blocks_placed), Some(2));
        assert_eq!(world.get(BlockPos::new(0, 10, 0)), Material::new("cobblestone"));
        assert_eq!(world.get(BlockPos::new(1, 10, 0)), Material::new("cobblestone"));
        assert_eq!(world.get(BlockPos::new(2, 10, 0)), Material::DIRT);
    }

    #[test]
    fn test_failed_placement_leaves_no_trace() {
        let def = definition(|s| {
            s.placement.source_blocks = vec![Material::STONE];
            s.placement.max_percentage_outside_source_block = 0;
            s.markers = vec![Marker {
                x: 0,
                y: 1,
                z: 0,
                mod_id: "m".to_string(),
                mod_data: String::new(),
            }];
        });
        let mut world = MemoryWorld::new("test");
        world.put(BlockPos::new(0, 10, 0), Material::STONE);
        world.put(BlockPos::new(1, 10, 0), Material::STONE);
        let before = world.clone();
        let cache = StructureCache::new();

        let outcome = run_on(&def, &population(BlockPos::new(0, 10, 0)), &mut world, &cache);

        assert_eq!(
            outcome,
            PlacementOutcome::Aborted {
                stage: PlacementStage::ValidatingContainment,
                reason: AbortReason::TooManyOutsideSource { outside: 1, max: 0 },
            }
        );
        assert_eq!(world, before);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_height_range_enforced() {
        let def = definition(|_| {});
        let mut world = MemoryWorld::new("test");
        let cache = StructureCache::new();
        let mut req = population(BlockPos::new(0, 70, 0));
        req.height_range = Some((10, 60));

        let outcome = run_on(&def, &req, &mut world, &cache);
        assert_eq!(
            outcome.abort_reason(),
            Some(&AbortReason::OutsideHeightRange {
                y: 70,
                min: 10,
                max: 60
            })
        );
    }

    #[test]
    fn test_block_below_world_aborts() {
        let def = definition(|s| s.blocks.push(BlockFunction::new(0, -3, 0, "stone")));
        let mut world = MemoryWorld::new("test");
        let cache = StructureCache::new();
        let req = PlacementRequest::new(Rotation::North, BlockPos::new(0, 1, 0), PlacementMode::Forced);

        let outcome = run_on(&def, &req, &mut world, &cache);
        assert_eq!(
            outcome,
            PlacementOutcome::Aborted {
                stage: PlacementStage::ValidatingBounds,
                reason: AbortReason::BlockOutOfWorld {
                    pos: BlockPos::new(0, -2, 0)
                },
            }
        );
        assert_eq!(world.block_count(), 0);
    }

    #[test]
    fn test_forced_ignores_checks_and_area() {
        let def = definition(|s| {
            s.checks = vec![SpawnCheck {
                x: 0,
                y: -1,
                z: 0,
                kind: CheckKind::Block {
                    materials: vec![Material::GRASS],
                },
            }];
        });
        let mut world = MemoryWorld::new("test");
        let cache = StructureCache::new();
        let req = PlacementRequest::new(Rotation::North, BlockPos::new(0, 64, 0), PlacementMode::Forced);

        let outcome = run_on(&def, &req, &mut world, &cache);
        assert!(outcome.is_success());
        assert_eq!(world.count_of(&Material::STONE), 3);

        let populated = run_on(&def, &population(BlockPos::new(0, 80, 0)), &mut world, &cache);
        assert_eq!(
            populated.abort_reason(),
            Some(&AbortReason::CheckFailed {
                index: 0,
                pos: BlockPos::new(0, 79, 0)
            })
        );
    }

    #[test]
    fn test_chunk_guard_stage() {
        let def = definition(|_| {});
        let mut world = MemoryWorld::new("test");
        let cache = StructureCache::new();
        let mut req = population(BlockPos::new(38, 64, 10));
        req.area = Some(PopulatingArea::with_window(ChunkCoordinate::new(0, 0), 32));

        match run_on(&def, &req, &mut world, &cache) {
            PlacementOutcome::Aborted { stage, reason } => {
                assert_eq!(stage, PlacementStage::ValidatingChunkLoad);
                assert_eq!(
                    reason,
                    AbortReason::ChunkNotLoaded {
                        chunk: ChunkCoordinate::new(2, 0)
                    }
                );
            }
            other => panic!("expected abort, got {:?}", other),
        }
        assert_eq!(world.block_count(), 0);
    }

    #[test]
    fn test_sapling_grows_into_air_only() {
        let def = definition(|s| {
            s.blocks = vec![
                BlockFunction::new(0, -1, 0, "oak_log"),
                BlockFunction::new(0, 0, 0, "oak_log"),
                BlockFunction::new(0, 1, 0, "oak_log"),
                BlockFunction::new(1, 1, 0, "oak_leaves"),
            ];
        });
        let mut world = MemoryWorld::new("test");
        world.put(BlockPos::new(0, 63, 0), Material::DIRT);
        world.put(BlockPos::new(0, 64, 0), Material::new("oak_sapling"));
        world.put(BlockPos::new(1, 65, 0), Material::new("birch_leaves"));
        let cache = StructureCache::new();
        let req = PlacementRequest::new(Rotation::North, BlockPos::new(0, 64, 0), PlacementMode::Sapling);

        let outcome = run_on(&def, &req, &mut world, &cache);

        assert_eq!(outcome.report().map(|r| r.blocks_placed), Some(1));
        assert_eq!(world.get(BlockPos::new(0, 63, 0)), Material::DIRT);
        assert_eq!(world.get(BlockPos::new(0, 64, 0)), Material::new("oak_sapling"));
        assert_eq!(world.get(BlockPos::new(0, 65, 0)), Material::new("oak_log"));
        assert_eq!(world.get(BlockPos::new(1, 65, 0)), Material::new("birch_leaves"));
    }

    #[test]
    fn test_sapling_blocked_by_stone() {
        let def = definition(|_| {});
        let mut world = MemoryWorld::new("test");
        world.put(BlockPos::new(2, 64, 0), Material::STONE);
        let before = world.clone();
        let cache = StructureCache::new();
        let req = PlacementRequest::new(Rotation::North, BlockPos::new(0, 64, 0), PlacementMode::Sapling);

        let outcome = run_on(&def, &req, &mut world, &cache);
        assert_eq!(
            outcome.abort_reason(),
            Some(&AbortReason::Obstructed {
                pos: BlockPos::new(2, 64, 0)
            })
        );
        assert_eq!(world, before);
    }

    #[test]
    fn test_commit_extrudes_and_reports() {
        let def = definition(|s| {
            s.placement.extrude_mode = ExtrudeMode::BottomDown;
            s.placement.extrude_filler = Some(Material::DIRT);
        });
        let mut world = MemoryWorld::new("test");
        for x in 0..3 {
            world.put(BlockPos::new(x, 60, 0), Material::STONE);
        }
        let cache = StructureCache::new();

        let outcome = run_on(&def, &population(BlockPos::new(0, 64, 0)), &mut world, &cache);
        let report = outcome.report().cloned().unwrap();

        assert_eq!(report.blocks_placed, 3);
        // 61..=63 under each of the three columns
        assert_eq!(report.blocks_extruded, 9);
        assert_eq!(report.structure, None);
        assert_eq!(world.count_of(&Material::DIRT), 9);
    }
}
