//! Placement configuration with documented constants
//!
//! World limits and the population window are collected here so the
//! placement pipeline and the reference world agree on them.

/// Configuration shared by every placement attempt
#[derive(Debug, Clone)]
pub struct PlacementConfig {
    // === VERTICAL BOUNDS ===
    /// Lowest valid block y (inclusive)
    pub world_depth: i32,

    /// One past the highest valid block y
    ///
    /// A block at `world_height - 1` is the topmost writable block. Offsets
    /// from the elevation resolver are clamped into this range as well.
    pub world_height: i32,

    // === POPULATION ===
    /// Side length (blocks) of the area a population step may touch
    ///
    /// At 32, population of one chunk may reach into the three neighbours
    /// on its positive x/z side, which are generated before it is populated.
    pub population_window: i32,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            world_depth: 0,
            world_height: 256,
            population_window: 32,
        }
    }
}

impl PlacementConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// True when `y` is a writable block height
    #[inline]
    pub fn in_vertical_bounds(&self, y: i32) -> bool {
        y >= self.world_depth && y < self.world_height
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<(), String> {
        if self.world_depth >= self.world_height {
            return Err(format!(
                "world_depth ({}) must be < world_height ({})",
                self.world_depth, self.world_height
            ));
        }

        if self.population_window < crate::core::types::CHUNK_SIZE {
            return Err(format!(
                "population_window ({}) must cover at least one chunk",
                self.population_window
            ));
        }

        Ok(())
    }
}

// === GLOBAL CONFIG ACCESS ===

use std::sync::OnceLock;

static CONFIG: OnceLock<PlacementConfig> = OnceLock::new();

/// Get the global placement config (initializes with defaults if not set)
pub fn config() -> &'static PlacementConfig {
    CONFIG.get_or_init(PlacementConfig::default)
}

/// Set the global placement config (can only be called once)
///
/// Returns Err if config was already set.
pub fn set_config(config: PlacementConfig) -> Result<(), PlacementConfig> {
    CONFIG.set(config)
}
