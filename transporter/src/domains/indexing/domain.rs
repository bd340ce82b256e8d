use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt::{Display, Formatter};

pub const CHUNK_SIZE: i32 = 16;

/// Block coordinate inside a named world.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub world: String,
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl Point {
    pub fn new(world: impl Into<String>, x: i32, y: i32, z: i32) -> Self {
        Self {
            world: world.into(),
            x,
            y,
            z,
        }
    }

    #[inline]
    pub fn block(&self) -> [i32; 3] {
        [self.x, self.y, self.z]
    }

    #[inline]
    pub fn chunk(&self) -> ChunkPos {
        ChunkPos::of(self.block())
    }

    pub fn offset(&self, delta: [i32; 3]) -> Point {
        Point::new(
            self.world.clone(),
            self.x + delta[0],
            self.y + delta[1],
            self.z + delta[2],
        )
    }

    pub fn distance_to(&self, other: &Point) -> f64 {
        self.distance([other.x as f64 + 0.5, other.y as f64 + 0.5, other.z as f64 + 0.5])
    }

    pub fn distance(&self, position: [f64; 3]) -> f64 {
        let dx = self.x as f64 + 0.5 - position[0];
        let dy = self.y as f64 + 0.5 - position[1];
        let dz = self.z as f64 + 0.5 - position[2];
        (dx * dx + dy * dy + dz * dz).sqrt()
    }
}

impl Display for Point {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{},{},{}", self.world, self.x, self.y, self.z)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChunkPos {
    pub x: i32,
    pub z: i32,
}

impl ChunkPos {
    #[inline]
    pub fn of(block: [i32; 3]) -> Self {
        Self {
            x: block[0].div_euclid(CHUNK_SIZE),
            z: block[2].div_euclid(CHUNK_SIZE),
        }
    }
}

/// Functional role of a gate block. Every role is indexed separately because
/// one position can play several roles with independent lifecycles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Portal,
    Protection,
    Screen,
    Switch,
    Trigger,
}

impl Role {
    pub const ALL: [Role; 5] = [
        Role::Portal,
        Role::Protection,
        Role::Screen,
        Role::Switch,
        Role::Trigger,
    ];
}

/// Set of blocks one gate owns for one role. All blocks belong to `world`.
#[derive(Debug, Clone)]
pub struct Volume {
    pub gate: String,
    pub world: String,
    blocks: HashSet<[i32; 3]>,
}

impl Volume {
    pub fn new(gate: impl Into<String>, world: impl Into<String>) -> Self {
        Self {
            gate: gate.into(),
            world: world.into(),
            blocks: HashSet::new(),
        }
    }

    /// Returns false when the point lies in another world and was not added.
    pub fn add_point(&mut self, point: &Point) -> bool {
        if point.world != self.world {
            return false;
        }
        self.blocks.insert(point.block());
        true
    }

    pub fn contains(&self, point: &Point) -> bool {
        point.world == self.world && self.blocks.contains(&point.block())
    }

    #[inline]
    pub fn blocks(&self) -> impl Iterator<Item = &[i32; 3]> {
        self.blocks.iter()
    }

    pub fn points(&self) -> impl Iterator<Item = Point> + '_ {
        self.blocks
            .iter()
            .map(|[x, y, z]| Point::new(self.world.clone(), *x, *y, *z))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}
