//! Relocation of attached functions into world space
//!
//! Markers, spawn points and ambient effects become part of a structure and
//! are indexed in the structure cache. Entities are handed to the world
//! directly; the cache does not track them.

use ahash::AHashSet;

use crate::core::types::{BlockPos, ChunkCoordinate, PopulatingArea, StructureId};
use crate::objects::definition::OrientedGeometry;
use crate::objects::functions::{Positioned, Relocate};
use crate::objects::rotation::Rotation;
use crate::structures::{
    CustomStructure, SharedStructure, StructureCache, StructureCoordinate, StructureFunctions,
};
use crate::world::WorldGenRegion;

/// World-space copies of one placement's structural functions
#[derive(Debug, Clone, Default)]
pub struct RelocatedFunctions {
    pub functions: StructureFunctions,
    /// Chunks touched by any relocated marker, spawn point or effect
    pub chunks: AHashSet<ChunkCoordinate>,
}

/// Copy markers, spawn points and ambient effects to absolute positions
pub fn relocate(geometry: &OrientedGeometry, origin: BlockPos) -> RelocatedFunctions {
    let mut chunks = AHashSet::new();

    let markers: Vec<_> = geometry.markers.iter().map(|m| m.relocated(origin)).collect();
    let spawn_points: Vec<_> = geometry
        .spawn_points
        .iter()
        .map(|s| s.relocated(origin))
        .collect();
    let ambient_effects: Vec<_> = geometry
        .ambient_effects
        .iter()
        .map(|a| a.relocated(origin))
        .collect();

    chunks.extend(markers.iter().map(Positioned::chunk));
    chunks.extend(spawn_points.iter().map(Positioned::chunk));
    chunks.extend(ambient_effects.iter().map(Positioned::chunk));

    RelocatedFunctions {
        functions: StructureFunctions {
            markers,
            spawn_points,
            ambient_effects,
        },
        chunks,
    }
}

/// Result of handing relocated functions to their owner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Registration {
    pub structure: Option<StructureId>,
    pub chunks: usize,
}

/// Relocate all attached functions of one placement and register them.
///
/// A branch piece adds its data to `structure` and registers both the chunks
/// its blocks landed in and the chunks its functions touch. A standalone
/// object gets a placeholder structure registered only where its functions
/// are; with no functions the placeholder is not created.
#[allow(clippy::too_many_arguments)]
pub fn handle_functions(
    geometry: &OrientedGeometry,
    object_name: &str,
    origin: BlockPos,
    block_chunks: &AHashSet<ChunkCoordinate>,
    structure: Option<&SharedStructure>,
    cache: &StructureCache,
    world: &mut dyn WorldGenRegion,
    area: Option<&PopulatingArea>,
) -> Registration {
    let relocated = relocate(geometry, origin);

    let registration = match structure {
        Some(structure) => {
            structure.add_functions(relocated.functions);
            let chunks: AHashSet<_> = block_chunks.union(&relocated.chunks).copied().collect();
            for chunk in &chunks {
                cache.register(*chunk, structure, true);
            }
            Registration {
                structure: Some(structure.id()),
                chunks: chunks.len(),
            }
        }
        None if relocated.functions.is_empty() => Registration {
            structure: None,
            chunks: 0,
        },
        None => {
            let placeholder = CustomStructure::placeholder(StructureCoordinate {
                preset_name: world.preset_name().to_string(),
                object_name: object_name.to_string(),
                rotation: Rotation::North,
                x: origin.x,
                y: 0,
                z: origin.z,
            });
            placeholder.add_functions(relocated.functions);
            for chunk in &relocated.chunks {
                cache.register(*chunk, &placeholder, false);
            }
            Registration {
                structure: Some(placeholder.id()),
                chunks: relocated.chunks.len(),
            }
        }
    };

    for entity in &geometry.entities {
        world.spawn_entity(entity.relocated(origin), area);
    }

    registration
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objects::functions::{
        AmbientEffect, BlockFunction, BoundingBox, EntityFunction, Marker, SpawnPoint, Velocity,
    };
    use crate::world::MemoryWorld;

    fn geometry() -> OrientedGeometry {
        OrientedGeometry {
            blocks: vec![BlockFunction::new(0, 0, 0, "stone")],
            checks: vec![],
            bounding_box: BoundingBox::default(),
            branches: vec![],
            markers: vec![Marker {
                x: 20,
                y: 1,
                z: 0,
                mod_id: "lore".to_string(),
                mod_data: "page".to_string(),
            }],
            spawn_points: vec![SpawnPoint {
                x: 0,
                y: 1,
                z: 0,
                mob_name: "zombie".to_string(),
                nbt_file_name: None,
                group_size: 2,
                interval: 20,
                spawn_chance: 50,
                max_count: 4,
                despawn_time: 0,
                velocity: Velocity::default(),
                yaw: 90.0,
                pitch: 0.0,
            }],
            ambient_effects: vec![AmbientEffect {
                x: 1,
                y: 2,
                z: 1,
                particle_name: "smoke".to_string(),
                interval: 0.5,
                velocity: Velocity {
                    y: Some(0.1),
                    ..Default::default()
                },
            }],
            entities: vec![EntityFunction {
                x: 0,
                y: 1,
                z: 0,
                name: "villager".to_string(),
                resource_location: None,
                group_size: 1,
                name_tag_or_nbt_file: None,
                nbt: None,
                facing: 0,
            }],
        }
    }

    #[test]
    fn test_relocate_preserves_payload() {
        let relocated = relocate(&geometry(), BlockPos::new(4, 64, 4));
        let sp = &relocated.functions.spawn_points[0];

        assert_eq!(sp.position(), BlockPos::new(4, 65, 4));
        assert_eq!(sp.spawn_chance, 50);
        assert_eq!(sp.yaw, 90.0);
        assert_eq!(relocated.functions.ambient_effects[0].velocity.y, Some(0.1));
        // marker at x = 24 is in chunk 1, the rest in chunk 0
        assert_eq!(relocated.chunks.len(), 2);
    }

    #[test]
    fn test_standalone_gets_placeholder() {
        let cache = StructureCache::new();
        let mut world = MemoryWorld::new("default");
        let block_chunks = AHashSet::new();

        let reg = handle_functions(
            &geometry(),
            "camp",
            BlockPos::new(4, 64, 4),
            &block_chunks,
            None,
            &cache,
            &mut world,
            None,
        );

        assert_eq!(reg.chunks, 2);
        let entries = cache.structures_in(ChunkCoordinate::new(1, 0));
        assert_eq!(entries.len(), 1);
        assert!(!entries[0].is_branch_member);
        assert!(entries[0].structure.is_placeholder());
        assert_eq!(entries[0].structure.start().preset_name, "default");
        assert_eq!(entries[0].structure.functions().markers[0].x, 24);
        assert_eq!(world.entities().len(), 1);
        assert_eq!(world.entities()[0].position(), BlockPos::new(4, 65, 4));
    }

    #[test]
    fn test_branch_piece_registers_block_chunks() {
        let cache = StructureCache::new();
        let mut world = MemoryWorld::new("default");
        let structure = CustomStructure::composite(StructureCoordinate {
            preset_name: "default".to_string(),
            object_name: "fort".to_string(),
            rotation: Rotation::North,
            x: 0,
            y: 64,
            z: 0,
        });
        let block_chunks: AHashSet<_> = [ChunkCoordinate::new(0, 0), ChunkCoordinate::new(0, 5)]
            .into_iter()
            .collect();

        let reg = handle_functions(
            &geometry(),
            "fort_tower",
            BlockPos::new(4, 64, 4),
            &block_chunks,
            Some(&structure),
            &cache,
            &mut world,
            None,
        );

        assert_eq!(reg.structure, Some(structure.id()));
        assert_eq!(reg.chunks, 3);
        assert!(cache.structures_in(ChunkCoordinate::new(0, 5))[0].is_branch_member);
        assert_eq!(structure.functions().spawn_points.len(), 1);
    }

    #[test]
    fn test_no_functions_no_placeholder() {
        let cache = StructureCache::new();
        let mut world = MemoryWorld::new("default");
        let mut g = geometry();
        g.markers.clear();
        g.spawn_points.clear();
        g.ambient_effects.clear();

        let reg = handle_functions(
            &g,
            "rock",
            BlockPos::new(0, 64, 0),
            &AHashSet::new(),
            None,
            &cache,
            &mut world,
            None,
        );

        assert_eq!(reg.structure, None);
        assert!(cache.is_empty());
        assert_eq!(world.entities().len(), 1);
    }
}
