pub mod config;
pub mod error;
pub mod types;

pub use config::{config, PlacementConfig};
pub use types::{BlockPos, ChunkCoordinate, PopulatingArea, StructureId, CHUNK_SIZE};
