//! Object placement pipeline.
//!
//! A placement attempt walks a fixed sequence of stages. Every validating
//! stage only reads the world; the first one that fails ends the attempt
//! with `PlacementOutcome::Aborted` and nothing written. Only after all of
//! them pass are blocks committed, gaps extruded and attached functions
//! relocated into the structure cache.

pub mod checks;
pub mod chunk_guard;
pub mod containment;
pub mod elevation;
pub mod extrusion;
pub mod pipeline;
pub mod relocate;

pub use pipeline::{run, PlacementMode, PlacementRequest};

use rand::RngCore;

use crate::core::types::{BlockPos, ChunkCoordinate, StructureId};
use crate::objects::rotation::Rotation;
use crate::structures::StructureCache;
use crate::world::WorldGenRegion;

/// Shared resources a placement reads and mutates
pub struct PlacementContext<'a> {
    pub cache: &'a StructureCache,
    pub world: &'a mut dyn WorldGenRegion,
    pub rng: &'a mut dyn RngCore,
}

impl<'a> PlacementContext<'a> {
    pub fn new(
        cache: &'a StructureCache,
        world: &'a mut dyn WorldGenRegion,
        rng: &'a mut dyn RngCore,
    ) -> Self {
        Self { cache, world, rng }
    }
}

/// Stages of a placement attempt, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PlacementStage {
    /// Looking up the loaded definition
    Loading,
    ValidatingBounds,
    ValidatingChecks,
    ValidatingChunkLoad,
    ValidatingContainment,
    Committing,
    RelocatingFunctions,
    Done,
}

/// Why a placement attempt was abandoned
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AbortReason {
    /// The object definition is not (or could not be) loaded
    NotLoaded,
    /// The column height could not be queried inside the populating area
    HeightUnavailable { x: i32, z: i32 },
    /// Requested height range is empty
    EmptyHeightRange { min: i32, max: i32 },
    /// Origin outside the world's vertical bounds
    OriginOutOfWorld { y: i32 },
    /// Origin outside the object's allowed height range
    OutsideHeightRange { y: i32, min: i32, max: i32 },
    /// A block would land outside the world's vertical bounds
    BlockOutOfWorld { pos: BlockPos },
    /// A spawn check rejected the location
    CheckFailed { index: usize, pos: BlockPos },
    /// A block falls outside the area that may be touched
    ChunkNotLoaded { chunk: ChunkCoordinate },
    /// Too many blocks would land outside the source blocks
    TooManyOutsideSource { outside: usize, max: usize },
    /// Natural growth is blocked by a non-growable block
    Obstructed { pos: BlockPos },
}

/// Summary of a successful placement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacementReport {
    pub origin: BlockPos,
    pub rotation: Rotation,
    /// Object blocks handed to the world
    pub blocks_placed: usize,
    /// Cells filled by extrusion
    pub blocks_extruded: usize,
    /// Structure that owns the relocated functions
    pub structure: Option<StructureId>,
    /// Chunks registered in the structure cache
    pub registered_chunks: usize,
}

/// Terminal state of a placement attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlacementOutcome {
    Done(PlacementReport),
    Aborted {
        stage: PlacementStage,
        reason: AbortReason,
    },
}

impl PlacementOutcome {
    pub fn aborted(stage: PlacementStage, reason: AbortReason) -> Self {
        Self::Aborted { stage, reason }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Done(_))
    }

    pub fn report(&self) -> Option<&PlacementReport> {
        match self {
            Self::Done(report) => Some(report),
            Self::Aborted { .. } => None,
        }
    }

    pub fn abort_reason(&self) -> Option<&AbortReason> {
        match self {
            Self::Done(_) => None,
            Self::Aborted { reason, .. } => Some(reason),
        }
    }
}
