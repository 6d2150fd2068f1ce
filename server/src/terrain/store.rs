// src/terrain/store.rs

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use log::{debug, error, info};
use terrain::prelude::*;

use crate::terrain::generator::{generate_chunk, GenerationError, Heightmap};

/// The authoritative chunk store: generates a chunk the first time it is
/// asked for and keeps it for the life of the process.
pub struct TerrainStore<H> {
    heightmap: H,
    chunks: HashMap<String, GridChunk>,
}

impl<H: Heightmap> TerrainStore<H> {
    pub fn new(heightmap: H) -> Self {
        Self {
            heightmap,
            chunks: HashMap::new(),
        }
    }

    pub fn heightmap(&self) -> &H {
        &self.heightmap
    }

    /// The chunk containing `coords`, generated on first access.
    pub fn get_chunk(&mut self, coords: Coords) -> Result<&GridChunk, GenerationError> {
        Ok(&*self.chunk_mut(coords)?)
    }

    /// Fills or clears the world cell at `coords`, generating its chunk first
    /// if needed. Returns the chunk's new revision, or `None` if the cell
    /// already had that content.
    pub fn set_cell(&mut self, coords: Coords, material: Option<MaterialId>) -> Result<Option<Revision>, GenerationError> {
        let chunk = self.chunk_mut(coords)?;
        if !chunk.set_cell(coords.local_in_chunk(), material)? {
            return Ok(None);
        }
        info!(
            "Set cell {} to {:?}, chunk {} is now at revision {}",
            coords,
            material,
            coords.chunk_base(),
            chunk.revision()
        );
        Ok(Some(chunk.revision()))
    }

    fn chunk_mut(&mut self, coords: Coords) -> Result<&mut GridChunk, GenerationError> {
        let base = coords.chunk_base();
        match self.chunks.entry(base.to_key()) {
            Entry::Occupied(entry) => {
                debug!("Chunk cache hit for {}", entry.key());
                Ok(entry.into_mut())
            }
            Entry::Vacant(entry) => {
                let chunk = generate_chunk(&self.heightmap, base)?;
                Ok(entry.insert(chunk))
            }
        }
    }

    /// Looks up a batch of chunks, keyed by their base coordinates.
    ///
    /// A chunk that fails to generate is logged and left out; the rest of the
    /// batch is still returned.
    pub fn get_chunks(&mut self, coords_list: &[Coords]) -> Terrain {
        let mut terrain = Terrain::new();
        for &coords in coords_list {
            match self.get_chunk(coords) {
                Ok(chunk) => {
                    let chunk = chunk.clone();
                    terrain.insert(coords.chunk_base().to_key(), chunk);
                }
                Err(e) => error!("Failed to generate chunk at {}: {}", coords, e),
            }
        }
        terrain
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.chunks.contains_key(key)
    }

    /// Number of chunks generated so far.
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }
}
