// src/coords.rs

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TerrainError;

/// How many cells per horizontal edge of a chunk (x and z).
pub const CHUNK_WIDTH: i32 = 32;

/// How many cells per vertical edge of a chunk (y).
pub const CHUNK_HEIGHT: i32 = 128;

/// Number of columns in a chunk.
pub const COLUMNS_PER_CHUNK: usize = (CHUNK_WIDTH * CHUNK_WIDTH) as usize;

/// Which material (grass, dirt, stone…) a range is made of.
pub type MaterialId = u16;

/// A cell position in the world. X and Z are horizontal, Y is up.
///
/// Serialized as a plain `[x, y, z]` array.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "[i32; 3]", into = "[i32; 3]")]
pub struct Coords {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl Coords {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Base corner of the chunk containing this cell.
    pub fn chunk_base(&self) -> Coords {
        Coords {
            x: chunk_base(self.x, CHUNK_WIDTH),
            y: chunk_base(self.y, CHUNK_HEIGHT),
            z: chunk_base(self.z, CHUNK_WIDTH),
        }
    }

    /// Position of this cell relative to its chunk base; every axis is non-negative.
    pub fn local_in_chunk(&self) -> Coords {
        let base = self.chunk_base();
        Coords {
            x: self.x - base.x,
            y: self.y - base.y,
            z: self.z - base.z,
        }
    }

    pub fn is_chunk_aligned(&self) -> bool {
        self.chunk_base() == *self
    }

    /// Stable chunk key for this coordinate triple.
    pub fn to_key(&self) -> String {
        coords_to_key(*self)
    }
}

impl From<[i32; 3]> for Coords {
    fn from([x, y, z]: [i32; 3]) -> Self {
        Self { x, y, z }
    }
}

impl From<Coords> for [i32; 3] {
    fn from(c: Coords) -> Self {
        [c.x, c.y, c.z]
    }
}

impl fmt::Display for Coords {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.x, self.y, self.z)
    }
}

/// Floors `coord` onto the grid of `axis_size`; `chunk_base(-1, 32) == -32`.
pub fn chunk_base(coord: i32, axis_size: i32) -> i32 {
    coord.div_euclid(axis_size) * axis_size
}

/// Index of a local column inside a chunk: `x + z * CHUNK_WIDTH`.
pub fn column_index(local_x: usize, local_z: usize) -> usize {
    local_x + local_z * CHUNK_WIDTH as usize
}

/// Chunk key, formatted as `"<x> <y> <z>"`.
pub fn coords_to_key(coords: Coords) -> String {
    coords.to_string()
}

/// Exact inverse of [`coords_to_key`].
pub fn key_to_coords(key: &str) -> Result<Coords, TerrainError> {
    let mut parts = key.split(' ');
    let mut next = || -> Result<i32, TerrainError> {
        parts
            .next()
            .and_then(|p| p.parse::<i32>().ok())
            .ok_or_else(|| TerrainError::InvalidChunkKey(key.to_string()))
    };
    let coords = Coords::new(next()?, next()?, next()?);
    if parts.next().is_some() {
        return Err(TerrainError::InvalidChunkKey(key.to_string()));
    }
    Ok(coords)
}

/// Like [`key_to_coords`], but the key must name a chunk base corner.
pub fn chunk_key_to_coords(key: &str) -> Result<Coords, TerrainError> {
    let coords = key_to_coords(key)?;
    if !coords.is_chunk_aligned() {
        return Err(TerrainError::InvalidChunkKey(key.to_string()));
    }
    Ok(coords)
}
