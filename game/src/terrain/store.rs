// src/terrain/store.rs

use log::debug;
use terrain::prelude::*;

/// The client's copy of the chunks inside its buffered view extent.
#[derive(Debug, Default)]
pub struct ClientTerrain {
    chunks: Terrain,
}

impl ClientTerrain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copies a batch of chunks in and returns the keys that changed.
    ///
    /// A chunk replaces the cached one only when it is new or carries a higher
    /// revision, so re-applying a batch is a no-op.
    pub fn update_chunks(&mut self, batch: &Terrain) -> Vec<String> {
        let mut changed = Vec::new();
        for (key, chunk) in batch {
            let stale = match self.chunks.get(key) {
                Some(cached) => cached.revision() < chunk.revision(),
                None => true,
            };
            if stale {
                self.chunks.insert(key.clone(), chunk.clone());
                changed.push(key.clone());
            }
        }
        if !changed.is_empty() {
            debug!("Updated {} of {} received chunks", changed.len(), batch.len());
        }
        changed
    }

    pub fn remove_chunk_by_key(&mut self, key: &str) -> Option<GridChunk> {
        self.chunks.remove(key)
    }

    pub fn get(&self, key: &str) -> Option<&GridChunk> {
        self.chunks.get(key)
    }

    /// The chunk containing the world cell `(x, y, z)`, if loaded.
    pub fn chunk_at(&self, x: i32, y: i32, z: i32) -> Option<&GridChunk> {
        self.chunks.get(&Coords::new(x, y, z).chunk_base().to_key())
    }

    /// Nearest terrain surface below (or, with `going_up`, above) the cell
    /// `(x, y, z)`, walking through vertically stacked chunks.
    ///
    /// Going down this is the first empty y on top of solid ground; going up it
    /// is the lowest solid y overhead. A cell already inside terrain returns `y`
    /// itself. Returns `None` once the walk reaches a chunk that is not loaded.
    pub fn surface_height(&self, x: i32, y: i32, z: i32, going_up: bool) -> Option<i32> {
        let local = Coords::new(x, y, z).local_in_chunk();
        let (local_x, local_z) = (local.x as usize, local.z as usize);
        let mut current_y = y as i64;
        let mut first = true;

        while current_y >= i32::MIN as i64 && current_y <= i32::MAX as i64 {
            let chunk = self.chunk_at(x, current_y as i32, z)?;
            let base_y = chunk_base(current_y as i32, CHUNK_HEIGHT) as i64;
            let local_y = (current_y - base_y) as u32;

            if let Column::Filled(column) = chunk.column(local_x, local_z) {
                if first && column.range_containing(local_y).is_some() {
                    return Some(y);
                }
                let found = if going_up {
                    column
                        .ranges
                        .iter()
                        .find(|r| r.bottom_start as u32 >= local_y)
                        .map(|r| base_y + r.bottom_start as i64)
                } else {
                    // below the current cell, or touching it from a lower chunk
                    let reach = if first { local_y } else { local_y + 1 };
                    column
                        .ranges
                        .iter()
                        .rev()
                        .find(|r| r.end() <= reach)
                        .map(|r| base_y + r.end() as i64)
                };
                if let Some(surface) = found {
                    return i32::try_from(surface).ok();
                }
            }

            first = false;
            current_y = if going_up {
                base_y + CHUNK_HEIGHT as i64
            } else {
                base_y - 1
            };
        }
        None
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.chunks.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.chunks.keys()
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }
}
