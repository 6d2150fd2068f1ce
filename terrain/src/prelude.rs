// src/prelude.rs
//! A convenient prelude re-exporting common terrain types.

pub use crate::chunk::{CellColumn, CellColumnRange, Column, GridChunk, Revision, Terrain};
pub use crate::codec::{decode_chunk, encode_chunk, GridChunkEncoded, TerrainEncoded};
pub use crate::coords::{
    chunk_base, chunk_key_to_coords, coords_to_key, key_to_coords, Coords, MaterialId, CHUNK_HEIGHT,
    CHUNK_WIDTH, COLUMNS_PER_CHUNK,
};
pub use crate::environment::{merge_environment_states, EnvironmentState, EnvironmentStateEncoded};
pub use crate::error::TerrainError;
pub use crate::extent::ViewExtent;
pub use crate::protocol::{GridCellEdit, Message};
pub use crate::shape::{Neighbours, SurfaceShape};
