//! Positional spawn predicates evaluated before an object is placed

use serde::{Deserialize, Serialize};

use super::rotation::{rotate_xz, Rotate};
use crate::core::types::{BlockPos, PopulatingArea};
use crate::world::{Material, WorldGenRegion};

/// What a check requires of the world material at its position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CheckKind {
    /// Material must be one of the listed ones
    Block { materials: Vec<Material> },
    /// Material must not be any of the listed ones
    BlockNot { materials: Vec<Material> },
}

/// A check at an offset from the object origin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpawnCheck {
    pub x: i32,
    pub y: i32,
    pub z: i32,
    #[serde(flatten)]
    pub kind: CheckKind,
}

impl SpawnCheck {
    /// True if the world at `pos` fails this check.
    ///
    /// An unreadable position never satisfies a `Block` check and never
    /// violates a `BlockNot` check.
    pub fn prevents_spawn(
        &self,
        world: &dyn WorldGenRegion,
        pos: BlockPos,
        area: Option<&PopulatingArea>,
    ) -> bool {
        let material = world.material(pos, area);
        match &self.kind {
            CheckKind::Block { materials } => {
                !material.map_or(false, |m| materials.contains(&m))
            }
            CheckKind::BlockNot { materials } => {
                material.map_or(false, |m| materials.contains(&m))
            }
        }
    }
}

impl Rotate for SpawnCheck {
    fn rotate(&self) -> Self {
        let (x, z) = rotate_xz(self.x, self.z);
        Self { x, z, ..self.clone() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::MemoryWorld;

    fn grass_check() -> SpawnCheck {
        SpawnCheck {
            x: 0,
            y: -1,
            z: 0,
            kind: CheckKind::Block {
                materials: vec![Material::GRASS],
            },
        }
    }

    #[test]
    fn test_block_check() {
        let mut world = MemoryWorld::new("test");
        world.put(BlockPos::new(0, 63, 0), Material::GRASS);
        let check = grass_check();

        assert!(!check.prevents_spawn(&world, BlockPos::new(0, 63, 0), None));
        assert!(check.prevents_spawn(&world, BlockPos::new(1, 63, 0), None));
    }

    #[test]
    fn test_block_not_check() {
        let mut world = MemoryWorld::new("test");
        world.put(BlockPos::new(0, 63, 0), Material::WATER);
        let check = SpawnCheck {
            x: 0,
            y: 0,
            z: 0,
            kind: CheckKind::BlockNot {
                materials: vec![Material::WATER],
            },
        };

        assert!(check.prevents_spawn(&world, BlockPos::new(0, 63, 0), None));
        assert!(!check.prevents_spawn(&world, BlockPos::new(0, 64, 0), None));
    }

    #[test]
    fn test_unreadable_position() {
        let world = MemoryWorld::new("test");
        let check = grass_check();
        // y = -5 is below the world
        assert!(check.prevents_spawn(&world, BlockPos::new(0, -5, 0), None));
    }

    #[test]
    fn test_deserialize_check() {
        let check: SpawnCheck = toml::from_str(
            r#"
            x = 1
            y = -1
            z = 0
            type = "block_not"
            materials = ["water", "lava"]
            "#,
        )
        .unwrap();
        assert_eq!(
            check.kind,
            CheckKind::BlockNot {
                materials: vec![Material::WATER, Material::new("lava")]
            }
        );
    }
}
