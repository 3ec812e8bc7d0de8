//! Immutable, rotation-expanded object definition

use ahash::AHashSet;

use super::checks::SpawnCheck;
use super::functions::{
    AmbientEffect, BlockFunction, BoundingBox, Branch, EntityFunction, Marker, SpawnPoint,
};
use super::loader::ConfigError;
use super::rotation::{Rotation, RotationTable};
use super::schema::{ExtrudeMode, ObjectSettings, OutsideSourceBlock, SpawnHeight};
use crate::core::config::config;
use crate::world::Material;

/// Oriented geometry of an object for one rotation
#[derive(Debug, Clone, PartialEq)]
pub struct OrientedGeometry {
    pub blocks: Vec<BlockFunction>,
    pub checks: Vec<SpawnCheck>,
    pub bounding_box: BoundingBox,
    pub branches: Vec<Branch>,
    pub markers: Vec<Marker>,
    pub spawn_points: Vec<SpawnPoint>,
    pub ambient_effects: Vec<AmbientEffect>,
    pub entities: Vec<EntityFunction>,
}

impl OrientedGeometry {
    fn rotated(&self) -> Self {
        use super::rotation::Rotate;

        Self {
            blocks: self.blocks.rotate(),
            checks: self.checks.rotate(),
            bounding_box: self.bounding_box.rotate(),
            branches: self.branches.rotate(),
            markers: self.markers.rotate(),
            spawn_points: self.spawn_points.rotate(),
            ambient_effects: self.ambient_effects.rotate(),
            entities: self.entities.rotate(),
        }
    }

    /// Number of attached functions of all four kinds
    pub fn function_count(&self) -> usize {
        self.markers.len() + self.spawn_points.len() + self.ambient_effects.len() + self.entities.len()
    }
}

/// Everything the placement pipeline needs to know about one object.
///
/// Built once from `ObjectSettings` and read-only afterwards.
#[derive(Debug, Clone)]
pub struct ObjectDefinition {
    pub name: String,
    pub required_mods: Vec<String>,
    pub geometry: RotationTable<OrientedGeometry>,

    pub tree: bool,
    pub rotate_randomly: bool,
    pub replace_blocks: bool,
    pub frequency: u32,
    pub rarity: f64,
    pub min_height: i32,
    pub max_height: i32,
    pub spawn_height: SpawnHeight,
    pub spawn_height_offset: i32,
    pub spawn_height_variance: i32,
    pub source_blocks: AHashSet<Material>,
    pub max_percentage_outside_source_block: u32,
    pub outside_source_block: OutsideSourceBlock,
    pub extrude_mode: ExtrudeMode,
    pub extrude_through_blocks: AHashSet<Material>,
    pub extrude_filler: Option<Material>,
    pub max_branch_depth: u32,
}

impl ObjectDefinition {
    /// Validate settings and precompute all four rotations
    pub fn from_settings(name: &str, settings: ObjectSettings) -> Result<Self, ConfigError> {
        let errors = validate(&settings);
        if !errors.is_empty() {
            return Err(ConfigError::Invalid {
                name: name.to_string(),
                errors,
            });
        }

        let north = OrientedGeometry {
            bounding_box: BoundingBox::from_blocks(&settings.blocks),
            blocks: settings.blocks,
            checks: settings.checks,
            branches: settings.branches,
            markers: settings.markers,
            spawn_points: settings.spawn_points,
            ambient_effects: settings.ambient_effects,
            entities: settings.entities,
        };
        let p = settings.placement;

        Ok(Self {
            name: name.to_string(),
            required_mods: settings.required_mods,
            geometry: RotationTable::build(north, OrientedGeometry::rotated),
            tree: p.tree,
            rotate_randomly: p.rotate_randomly,
            replace_blocks: p.replace_blocks,
            frequency: p.frequency,
            rarity: p.rarity,
            min_height: p.min_height,
            max_height: p.max_height,
            spawn_height: p.spawn_height,
            spawn_height_offset: p.spawn_height_offset,
            spawn_height_variance: p.spawn_height_variance,
            source_blocks: p.source_blocks.into_iter().collect(),
            max_percentage_outside_source_block: p.max_percentage_outside_source_block,
            outside_source_block: p.outside_source_block,
            extrude_mode: p.extrude_mode,
            extrude_through_blocks: p.extrude_through_blocks.into_iter().collect(),
            extrude_filler: p.extrude_filler,
            max_branch_depth: p.max_branch_depth,
        })
    }

    #[inline]
    pub fn oriented(&self, rotation: Rotation) -> &OrientedGeometry {
        self.geometry.get(rotation)
    }
}

fn validate(settings: &ObjectSettings) -> Vec<String> {
    let mut errors = Vec::new();
    let p = &settings.placement;
    let cfg = config();

    if settings.blocks.is_empty() {
        errors.push("object has no blocks".to_string());
    }
    if p.min_height > p.max_height {
        errors.push(format!(
            "min_height ({}) is above max_height ({})",
            p.min_height, p.max_height
        ));
    }
    if p.min_height < cfg.world_depth || p.max_height > cfg.world_height {
        errors.push(format!(
            "height range {}..={} is outside the world ({}..{})",
            p.min_height, p.max_height, cfg.world_depth, cfg.world_height
        ));
    }
    if !(0.0..=100.0).contains(&p.rarity) {
        errors.push(format!("rarity ({}) must be within 0..=100", p.rarity));
    }
    if p.max_percentage_outside_source_block > 100 {
        errors.push(format!(
            "max_percentage_outside_source_block ({}) must be within 0..=100",
            p.max_percentage_outside_source_block
        ));
    }
    let span = cfg.world_height - cfg.world_depth;
    for (label, value) in [
        ("spawn_height_offset", p.spawn_height_offset),
        ("spawn_height_variance", p.spawn_height_variance),
    ] {
        if value.checked_abs().map_or(true, |v| v > span) {
            errors.push(format!("{} ({}) exceeds the world height ({})", label, value, span));
        }
    }
    if p.extrude_mode != ExtrudeMode::None && p.extrude_through_blocks.is_empty() {
        errors.push("extrusion enabled without extrude_through_blocks".to_string());
    }
    for branch in &settings.branches {
        if branch.possibilities.iter().any(|b| b.object.trim().is_empty()) {
            errors.push(format!(
                "branch at ({}, {}, {}) names an empty object",
                branch.x, branch.y, branch.z
            ));
        }
    }

    errors
}
