//! Cardinal rotations and per-rotation precomputed tables

use rand::Rng;
use serde::{Deserialize, Serialize};

/// One of the four cardinal orientations of an object.
///
/// `North` is the orientation the object was authored in; each following
/// variant is one further clockwise quarter turn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Rotation {
    #[default]
    North = 0,
    East = 1,
    South = 2,
    West = 3,
}

impl Rotation {
    pub const ALL: [Rotation; 4] = [
        Rotation::North,
        Rotation::East,
        Rotation::South,
        Rotation::West,
    ];

    #[inline]
    pub fn id(self) -> usize {
        self as usize
    }

    /// Rotation for an id, wrapping modulo four
    pub fn from_id(id: usize) -> Self {
        Self::ALL[id % 4]
    }

    /// One clockwise quarter turn further
    pub fn next(self) -> Self {
        Self::from_id(self.id() + 1)
    }

    /// Compose two rotations
    pub fn combine(self, other: Rotation) -> Self {
        Self::from_id(self.id() + other.id())
    }

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::from_id(rng.gen_range(0..4))
    }
}

/// Clockwise quarter turn of a horizontal offset: (x, z) -> (z, -x)
#[inline]
pub fn rotate_xz(x: i32, z: i32) -> (i32, i32) {
    (z, -x)
}

/// Geometry that can be turned one clockwise quarter around the object origin
pub trait Rotate {
    fn rotate(&self) -> Self;
}

impl<T: Rotate> Rotate for Vec<T> {
    fn rotate(&self) -> Self {
        self.iter().map(Rotate::rotate).collect()
    }
}

/// Four precomputed variants of a value, one per rotation
#[derive(Debug, Clone, PartialEq)]
pub struct RotationTable<T>([T; 4]);

impl<T> RotationTable<T> {
    /// Build all four variants from the north one using a quarter-turn step
    pub fn build(north: T, step: impl Fn(&T) -> T) -> Self {
        let east = step(&north);
        let south = step(&east);
        let west = step(&south);
        Self([north, east, south, west])
    }

    #[inline]
    pub fn get(&self, rotation: Rotation) -> &T {
        &self.0[rotation.id()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (Rotation, &T)> {
        Rotation::ALL.into_iter().zip(self.0.iter())
    }
}

impl<T: Rotate> RotationTable<T> {
    pub fn from_north(north: T) -> Self {
        Self::build(north, Rotate::rotate)
    }
}
