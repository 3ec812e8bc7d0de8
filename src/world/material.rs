//! Block material identity
//!
//! Materials are identified by a normalized resource name. Only the handful
//! of classifications the placement pipeline needs are derived from the name;
//! richer block state belongs to the host world.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;

const NAMESPACE: &str = "minecraft:";

/// A block material, e.g. `stone` or `oak_leaves`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Material(Cow<'static, str>);

impl Material {
    pub const AIR: Material = Material(Cow::Borrowed("air"));
    pub const STONE: Material = Material(Cow::Borrowed("stone"));
    pub const DIRT: Material = Material(Cow::Borrowed("dirt"));
    pub const GRASS: Material = Material(Cow::Borrowed("grass_block"));
    pub const WATER: Material = Material(Cow::Borrowed("water"));

    /// Normalize a material name: lowercase, default namespace stripped
    pub fn new(name: impl AsRef<str>) -> Self {
        let name = name.as_ref().trim().to_ascii_lowercase();
        let name = name.strip_prefix(NAMESPACE).map(str::to_string).unwrap_or(name);
        Self(Cow::Owned(name))
    }

    pub fn name(&self) -> &str {
        &self.0
    }

    pub fn is_air(&self) -> bool {
        matches!(self.name(), "air" | "cave_air" | "void_air")
    }

    pub fn is_liquid(&self) -> bool {
        matches!(self.name(), "water" | "lava" | "flowing_water" | "flowing_lava")
    }

    pub fn is_log_or_leaves(&self) -> bool {
        let name = self.name();
        name.ends_with("log")
            || name.ends_with("wood")
            || name.ends_with("leaves")
            || name.ends_with("stem")
            || name.ends_with("wart_block")
    }

    pub fn is_sapling(&self) -> bool {
        self.name().ends_with("sapling") || self.name().ends_with("propagule")
    }

    /// Solid for height queries: not air, liquid, leaves or small plants
    pub fn is_solid(&self) -> bool {
        !self.is_air()
            && !self.is_liquid()
            && !self.name().ends_with("leaves")
            && !self.is_sapling()
            && !matches!(self.name(), "grass" | "short_grass" | "tall_grass" | "fern" | "snow")
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::AIR
    }
}

impl From<String> for Material {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}

impl From<&str> for Material {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<Material> for String {
    fn from(material: Material) -> Self {
        material.0.into_owned()
    }
}

impl std::fmt::Display for Material {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
