//! In-memory world used by tests, benches and the population demo

use ahash::AHashMap;

use super::{Material, WorldGenRegion};
use crate::core::config::config;
use crate::core::types::{BlockPos, ChunkCoordinate, PopulatingArea, CHUNK_SIZE};
use crate::objects::functions::EntityFunction;

/// A stored block: material plus optional extra data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredBlock {
    pub material: Material,
    pub metadata: Option<String>,
}

/// Sparse block storage. Absent positions are air.
#[derive(Debug, Clone, PartialEq)]
pub struct MemoryWorld {
    preset: String,
    blocks: AHashMap<BlockPos, StoredBlock>,
    entities: Vec<EntityFunction>,
}

impl MemoryWorld {
    pub fn new(preset: impl Into<String>) -> Self {
        Self {
            preset: preset.into(),
            blocks: AHashMap::new(),
            entities: Vec::new(),
        }
    }

    /// Flat terrain over a square of chunks. `layers` are listed bottom-up
    /// as (material, thickness) starting at the world depth.
    pub fn flat(
        preset: impl Into<String>,
        min_chunk: ChunkCoordinate,
        max_chunk: ChunkCoordinate,
        layers: &[(Material, i32)],
    ) -> Self {
        let mut world = Self::new(preset);
        for cx in min_chunk.x..=max_chunk.x {
            for cz in min_chunk.z..=max_chunk.z {
                let chunk = ChunkCoordinate::new(cx, cz);
                for dx in 0..CHUNK_SIZE {
                    for dz in 0..CHUNK_SIZE {
                        let mut y = config().world_depth;
                        for (material, thickness) in layers {
                            for _ in 0..*thickness {
                                world.put(
                                    BlockPos::new(chunk.block_x() + dx, y, chunk.block_z() + dz),
                                    material.clone(),
                                );
                                y += 1;
                            }
                        }
                    }
                }
            }
        }
        world
    }

    /// Unconditional write, bypassing area and replace rules
    pub fn put(&mut self, pos: BlockPos, material: Material) {
        if material.is_air() {
            self.blocks.remove(&pos);
        } else {
            self.blocks.insert(
                pos,
                StoredBlock {
                    material,
                    metadata: None,
                },
            );
        }
    }

    /// Material at a position, ignoring any area constraint
    pub fn get(&self, pos: BlockPos) -> Material {
        self.blocks
            .get(&pos)
            .map(|b| b.material.clone())
            .unwrap_or(Material::AIR)
    }

    pub fn block(&self, pos: BlockPos) -> Option<&StoredBlock> {
        self.blocks.get(&pos)
    }

    pub fn entities(&self) -> &[EntityFunction] {
        &self.entities
    }

    /// Number of non-air blocks
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Number of blocks of a given material
    pub fn count_of(&self, material: &Material) -> usize {
        self.blocks
            .values()
            .filter(|b| &b.material == material)
            .count()
    }

    fn readable(pos: BlockPos, area: Option<&PopulatingArea>) -> bool {
        config().in_vertical_bounds(pos.y) && area.map_or(true, |a| a.contains(pos.x, pos.z))
    }

    fn column_top(&self, x: i32, z: i32, pred: impl Fn(&Material) -> bool) -> i32 {
        let cfg = config();
        (cfg.world_depth..cfg.world_height)
            .rev()
            .find(|&y| {
                self.blocks
                    .get(&BlockPos::new(x, y, z))
                    .map_or(false, |b| pred(&b.material))
            })
            .map(|y| y + 1)
            .unwrap_or(cfg.world_depth)
    }
}

impl WorldGenRegion for MemoryWorld {
    fn preset_name(&self) -> &str {
        &self.preset
    }

    fn material(&self, pos: BlockPos, area: Option<&PopulatingArea>) -> Option<Material> {
        Self::readable(pos, area).then(|| self.get(pos))
    }

    fn set_block(
        &mut self,
        pos: BlockPos,
        material: &Material,
        metadata: Option<&str>,
        area: Option<&PopulatingArea>,
        replace_blocks: bool,
    ) {
        if !Self::readable(pos, area) {
            return;
        }
        if !replace_blocks && !self.get(pos).is_air() {
            return;
        }
        if material.is_air() {
            self.blocks.remove(&pos);
            return;
        }
        self.blocks.insert(
            pos,
            StoredBlock {
                material: material.clone(),
                metadata: metadata.map(str::to_string),
            },
        );
    }

    fn highest_block_above_y_at(
        &self,
        x: i32,
        z: i32,
        area: Option<&PopulatingArea>,
    ) -> Option<i32> {
        if area.map_or(false, |a| !a.contains(x, z)) {
            return None;
        }
        Some(self.column_top(x, z, |m| !m.is_air()))
    }

    fn block_above_solid_height(
        &self,
        x: i32,
        z: i32,
        area: Option<&PopulatingArea>,
    ) -> Option<i32> {
        if area.map_or(false, |a| !a.contains(x, z)) {
            return None;
        }
        Some(self.column_top(x, z, Material::is_solid))
    }

    fn spawn_entity(&mut self, entity: EntityFunction, area: Option<&PopulatingArea>) {
        if area.map_or(true, |a| a.contains(entity.x, entity.z)) {
            self.entities.push(entity);
        }
    }
}
