//! Lazily loaded block object and its spawn entry points

use rand::{Rng, RngCore};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::definition::ObjectDefinition;
use super::functions::{BoundingBox, Branch};
use super::loader::DefinitionLoader;
use super::rotation::Rotation;
use super::schema::StructurePartSpawnHeight;
use super::{CustomObject, StructuredCustomObject};
use crate::core::error::{ObjectError, Result};
use crate::core::types::{BlockPos, ChunkCoordinate, PopulatingArea, CHUNK_SIZE};
use crate::placement::elevation;
use crate::placement::{
    run, PlacementContext, PlacementMode, PlacementOutcome, PlacementRequest, PlacementStage,
};
use crate::structures::{SharedStructure, StructureCoordinate};
use crate::world::ModLoadedChecker;

/// Load state of an object definition
#[derive(Debug, Clone, Default)]
pub enum LoadState {
    #[default]
    Unloaded,
    Loaded(Arc<ObjectDefinition>),
    /// Loading failed once; never retried
    Invalid,
}

/// An object backed by a definition file, loaded on first enable
#[derive(Debug, Clone)]
pub struct Bo3Object {
    name: String,
    path: PathBuf,
    state: LoadState,
}

impl Bo3Object {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            state: LoadState::Unloaded,
        }
    }

    /// Wrap an already built definition
    pub fn from_definition(definition: ObjectDefinition) -> Self {
        Self {
            name: definition.name.clone(),
            path: PathBuf::new(),
            state: LoadState::Loaded(Arc::new(definition)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self.state, LoadState::Loaded(_))
    }

    pub fn definition(&self) -> Result<&ObjectDefinition> {
        match &self.state {
            LoadState::Loaded(def) => Ok(def),
            _ => Err(ObjectError::NotLoaded(self.name.clone())),
        }
    }

    /// Shared handle to the loaded definition
    pub fn shared_definition(&self) -> Option<Arc<ObjectDefinition>> {
        match &self.state {
            LoadState::Loaded(def) => Some(Arc::clone(def)),
            _ => None,
        }
    }

    fn loaded(&self) -> Option<&ObjectDefinition> {
        self.definition().ok()
    }

    /// Population-time placement at a column: pick a rotation and a
    /// height, then run the pipeline inside the chunk's populating area
    #[allow(clippy::too_many_arguments)]
    fn spawn(
        &self,
        ctx: &mut PlacementContext<'_>,
        x: i32,
        z: i32,
        min_y: i32,
        max_y: i32,
        chunk: ChunkCoordinate,
        replace_blocks: bool,
    ) -> PlacementOutcome {
        let Some(def) = self.loaded() else {
            return not_loaded();
        };
        let rotation = if def.rotate_randomly {
            Rotation::random(&mut *ctx.rng)
        } else {
            Rotation::North
        };
        let area = PopulatingArea::new(chunk);

        let heights = elevation::resolve(
            def.spawn_height,
            min_y,
            max_y,
            def.spawn_height_offset,
            def.spawn_height_variance,
            x,
            z,
            &*ctx.world,
            Some(&area),
            &mut *ctx.rng,
        );
        let heights = match heights {
            Ok(heights) => heights,
            Err(reason) => {
                tracing::trace!(object = %self.name, x, z, ?reason, "no spawn height");
                return PlacementOutcome::aborted(PlacementStage::ValidatingBounds, reason);
            }
        };

        let request = PlacementRequest {
            base_y: heights.base_y,
            height_range: Some((min_y, max_y)),
            area: Some(area),
            replace_blocks,
            ..PlacementRequest::new(
                rotation,
                BlockPos::new(x, heights.y, z),
                PlacementMode::Population,
            )
        };
        self.try_spawn_at(None, &request, ctx)
    }

    /// Load the definition on first call. A failed load marks the object
    /// invalid and is never retried.
    pub fn load(&mut self, loader: &dyn DefinitionLoader) -> Result<()> {
        match self.state {
            LoadState::Loaded(_) => return Ok(()),
            LoadState::Invalid => return Err(ObjectError::NotLoaded(self.name.clone())),
            LoadState::Unloaded => {}
        }

        let definition = loader
            .load(&self.name, &self.path)
            .and_then(|settings| ObjectDefinition::from_settings(&self.name, settings))
            .map_err(|e| {
                tracing::warn!(
                    object = %self.name,
                    path = %self.path.display(),
                    error = %e,
                    "invalid object config, object disabled"
                );
                self.state = LoadState::Invalid;
                e
            })?;

        tracing::debug!(object = %self.name, "object loaded");
        self.state = LoadState::Loaded(Arc::new(definition));
        Ok(())
    }
}

fn not_loaded() -> PlacementOutcome {
    PlacementOutcome::aborted(
        PlacementStage::Loading,
        crate::placement::AbortReason::NotLoaded,
    )
}

impl CustomObject for Bo3Object {
    fn name(&self) -> &str {
        &self.name
    }

    fn on_enable(&mut self, loader: &dyn DefinitionLoader) -> bool {
        self.load(loader).is_ok()
    }

    fn load_checks(&self, mods: &dyn ModLoadedChecker) -> bool {
        self.loaded().map_or(false, |def| {
            def.required_mods.iter().all(|m| mods.is_mod_loaded(m))
        })
    }

    fn can_spawn_as_tree(&self) -> bool {
        self.loaded().map_or(false, |def| def.tree)
    }

    fn can_rotate_randomly(&self) -> bool {
        self.loaded().map_or(false, |def| def.rotate_randomly)
    }

    fn do_replace_blocks(&self) -> bool {
        self.loaded().map_or(false, |def| def.replace_blocks)
    }

    fn spawn_from_sapling(
        &self,
        ctx: &mut PlacementContext<'_>,
        rotation: Rotation,
        x: i32,
        y: i32,
        z: i32,
    ) -> bool {
        let request = PlacementRequest {
            replace_blocks: false,
            ..PlacementRequest::new(rotation, BlockPos::new(x, y, z), PlacementMode::Sapling)
        };
        self.try_spawn_at(None, &request, ctx).is_success()
    }

    fn spawn_forced(
        &self,
        ctx: &mut PlacementContext<'_>,
        rotation: Rotation,
        x: i32,
        y: i32,
        z: i32,
    ) -> bool {
        let request = PlacementRequest {
            replace_blocks: self.do_replace_blocks(),
            ..PlacementRequest::new(rotation, BlockPos::new(x, y, z), PlacementMode::Forced)
        };
        self.try_spawn_at(None, &request, ctx).is_success()
    }

    fn process(&self, ctx: &mut PlacementContext<'_>, chunk: ChunkCoordinate) -> bool {
        let Some(def) = self.loaded() else {
            return false;
        };

        let mut spawned = false;
        for _ in 0..def.frequency {
            if def.rarity > ctx.rng.gen::<f64>() * 100.0 {
                let x = chunk.block_x_center() + ctx.rng.gen_range(0..CHUNK_SIZE);
                let z = chunk.block_z_center() + ctx.rng.gen_range(0..CHUNK_SIZE);
                let outcome = self.spawn(
                    ctx,
                    x,
                    z,
                    def.min_height,
                    def.max_height,
                    chunk,
                    def.replace_blocks,
                );
                spawned |= outcome.is_success();
            }
        }
        spawned
    }

    fn spawn_as_tree(
        &self,
        ctx: &mut PlacementContext<'_>,
        x: i32,
        z: i32,
        min_y: Option<i32>,
        max_y: Option<i32>,
        chunk: ChunkCoordinate,
    ) -> bool {
        let Some(def) = self.loaded() else {
            return false;
        };
        let min_y = min_y.unwrap_or(def.min_height);
        let max_y = max_y.unwrap_or(def.max_height);
        self.spawn(ctx, x, z, min_y, max_y, chunk, false).is_success()
    }
}

impl StructuredCustomObject for Bo3Object {
    fn try_spawn_at(
        &self,
        structure: Option<&SharedStructure>,
        request: &PlacementRequest,
        ctx: &mut PlacementContext<'_>,
    ) -> PlacementOutcome {
        let Some(def) = self.loaded() else {
            return not_loaded();
        };
        let outcome = run(def, request, structure, ctx);
        if let PlacementOutcome::Done(report) = &outcome {
            tracing::debug!(
                object = %self.name,
                origin = %report.origin,
                rotation = ?report.rotation,
                blocks = report.blocks_placed,
                "object spawned"
            );
        }
        outcome
    }

    fn branches(&self, rotation: Rotation) -> &[Branch] {
        self.loaded()
            .map_or(&[], |def| def.oriented(rotation).branches.as_slice())
    }

    fn bounding_box(&self, rotation: Rotation) -> Option<BoundingBox> {
        self.loaded().map(|def| def.oriented(rotation).bounding_box)
    }

    fn max_branch_depth(&self) -> u32 {
        self.loaded().map_or(0, |def| def.max_branch_depth)
    }

    fn structure_part_spawn_height(&self) -> StructurePartSpawnHeight {
        self.loaded().map_or(StructurePartSpawnHeight::Highest, |def| {
            def.spawn_height.to_structure_part_spawn_height()
        })
    }

    fn make_structure_coordinate(
        &self,
        preset_name: &str,
        rng: &mut dyn RngCore,
        chunk: ChunkCoordinate,
    ) -> Option<StructureCoordinate> {
        let def = self.loaded()?;
        let rotation = if def.rotate_randomly {
            Rotation::random(rng)
        } else {
            Rotation::North
        };
        Some(StructureCoordinate::roll(
            preset_name,
            &self.name,
            rotation,
            def.min_height,
            def.max_height,
            chunk,
            rng,
        ))
    }
}
