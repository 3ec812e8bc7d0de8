//! Custom Objects - validated placement of pre-authored voxel objects
//!
//! Objects are block clusters such as trees, ruins or pieces of composite
//! structures. During chunk population they are positioned, validated
//! against the world and committed atomically, and the data they carry
//! (markers, spawners, particles, entities) is indexed per chunk.

pub mod core;
pub mod objects;
pub mod placement;
pub mod structures;
pub mod world;
