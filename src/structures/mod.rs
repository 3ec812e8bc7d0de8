//! Structures built from placed objects and the chunk index over them

pub mod cache;
pub mod structure;

pub use cache::{CacheEntry, StructureCache};
pub use structure::{CustomStructure, SharedStructure, StructureCoordinate, StructureFunctions};
