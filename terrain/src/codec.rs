// src/codec.rs

//! Wire form of terrain.
//!
//! Each range packs into one `u64` word, low bits first:
//!
//! | bits  | field          |
//! |-------|----------------|
//! | 0-3   | top shape      |
//! | 4-7   | bottom shape   |
//! | 8-15  | bottom start   |
//! | 16-23 | range size     |
//! | 24-39 | material id    |
//!
//! Bits 40 and up are always zero, so a word stays exact as a JSON number.
//! A chunk encodes as an array of `CHUNK_WIDTH² + 1` slots: `-1` for an empty
//! column, an array of range words otherwise, and the revision last.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::chunk::{CellColumn, CellColumnRange, Column, GridChunk, Revision, Terrain};
use crate::coords::{chunk_key_to_coords, COLUMNS_PER_CHUNK};
use crate::error::TerrainError;
use crate::shape::SurfaceShape;

pub type EncodedRange = u64;
pub type CellColumnEncoded = Vec<EncodedRange>;
pub type TerrainEncoded = BTreeMap<String, GridChunkEncoded>;

const TOP_SHAPE_SHIFT: u32 = 0;
const BOTTOM_SHAPE_SHIFT: u32 = 4;
const BOTTOM_START_SHIFT: u32 = 8;
const RANGE_SIZE_SHIFT: u32 = 16;
const MATERIAL_SHIFT: u32 = 24;

const SHAPE_MASK: u64 = 0xf;
const BYTE_MASK: u64 = 0xff;
const MATERIAL_MASK: u64 = 0xffff;

/// Number of low bits a range word may use.
pub const RANGE_WORD_BITS: u32 = 40;

/// Marker used in place of a column array for an empty column.
pub const EMPTY_COLUMN: i64 = -1;

/// One slot of an encoded chunk: a bare number (empty marker or revision) or a packed column.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EncodedSlot {
    Number(i64),
    Column(CellColumnEncoded),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GridChunkEncoded(pub Vec<EncodedSlot>);

pub fn encode_range(range: &CellColumnRange) -> EncodedRange {
    ((range.top_shape.as_u8() as u64) << TOP_SHAPE_SHIFT)
        | ((range.bottom_shape.as_u8() as u64) << BOTTOM_SHAPE_SHIFT)
        | ((range.bottom_start as u64) << BOTTOM_START_SHIFT)
        | ((range.range_size as u64) << RANGE_SIZE_SHIFT)
        | ((range.material_id as u64) << MATERIAL_SHIFT)
}

pub fn decode_range(word: EncodedRange) -> Result<CellColumnRange, TerrainError> {
    if word >> RANGE_WORD_BITS != 0 {
        return Err(TerrainError::malformed(format!(
            "range word {word:#x} uses bits above {RANGE_WORD_BITS}"
        )));
    }
    Ok(CellColumnRange {
        top_shape: SurfaceShape::try_from(((word >> TOP_SHAPE_SHIFT) & SHAPE_MASK) as u8)?,
        bottom_shape: SurfaceShape::try_from(((word >> BOTTOM_SHAPE_SHIFT) & SHAPE_MASK) as u8)?,
        bottom_start: ((word >> BOTTOM_START_SHIFT) & BYTE_MASK) as u8,
        range_size: ((word >> RANGE_SIZE_SHIFT) & BYTE_MASK) as u8,
        material_id: ((word >> MATERIAL_SHIFT) & MATERIAL_MASK) as u16,
    })
}

pub fn encode_column(column: &CellColumn) -> CellColumnEncoded {
    column.ranges.iter().map(encode_range).collect()
}

pub fn decode_column(encoded: &[EncodedRange]) -> Result<CellColumn, TerrainError> {
    let ranges = encoded
        .iter()
        .map(|word| decode_range(*word))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(CellColumn::new(ranges))
}

pub fn encode_chunk(chunk: &GridChunk) -> GridChunkEncoded {
    let mut slots = Vec::with_capacity(COLUMNS_PER_CHUNK + 1);
    for column in chunk.columns() {
        slots.push(match column {
            Column::Empty => EncodedSlot::Number(EMPTY_COLUMN),
            Column::Filled(col) => EncodedSlot::Column(encode_column(col)),
        });
    }
    // revisions past i64::MAX are not reachable by incrementing from zero
    slots.push(EncodedSlot::Number(chunk.revision() as i64));
    GridChunkEncoded(slots)
}

pub fn decode_chunk(encoded: &GridChunkEncoded) -> Result<GridChunk, TerrainError> {
    let slots = &encoded.0;
    if slots.len() != COLUMNS_PER_CHUNK + 1 {
        return Err(TerrainError::malformed(format!(
            "expected {} slots, got {}",
            COLUMNS_PER_CHUNK + 1,
            slots.len()
        )));
    }

    let revision: Revision = match &slots[COLUMNS_PER_CHUNK] {
        EncodedSlot::Number(n) if *n >= 0 => *n as Revision,
        EncodedSlot::Number(n) => {
            return Err(TerrainError::malformed(format!("negative revision {n}")));
        }
        EncodedSlot::Column(_) => {
            return Err(TerrainError::malformed("trailing revision is missing"));
        }
    };

    let columns = slots[..COLUMNS_PER_CHUNK]
        .iter()
        .enumerate()
        .map(|(i, slot)| match slot {
            EncodedSlot::Number(EMPTY_COLUMN) => Ok(Column::Empty),
            EncodedSlot::Number(n) => Err(TerrainError::malformed(format!(
                "column {i} holds {n}, expected {EMPTY_COLUMN} or a range list"
            ))),
            EncodedSlot::Column(words) => decode_column(words).map(Column::Filled),
        })
        .collect::<Result<Vec<_>, _>>()?;

    GridChunk::from_columns(columns, revision)
}

pub fn encode_terrain(terrain: &Terrain) -> TerrainEncoded {
    terrain
        .iter()
        .map(|(key, chunk)| (key.clone(), encode_chunk(chunk)))
        .collect()
}

/// Result of decoding a terrain batch: the chunks that decoded cleanly and
/// the errors for those that did not.
#[derive(Debug, Default)]
pub struct DecodedTerrain {
    pub terrain: Terrain,
    pub rejected: Vec<TerrainError>,
}

/// Decodes every chunk of a batch. A malformed chunk, or a key that is not a
/// chunk base corner, is dropped on its own and does not prevent the rest of
/// the batch from applying.
pub fn decode_terrain(encoded: &TerrainEncoded) -> DecodedTerrain {
    let mut out = DecodedTerrain::default();
    for (key, chunk) in encoded {
        match chunk_key_to_coords(key).and_then(|_| decode_chunk(chunk)) {
            Ok(chunk) => {
                out.terrain.insert(key.clone(), chunk);
            }
            Err(e) => {
                let e = e.for_key(key);
                log::warn!("Dropping chunk update: {}", e);
                out.rejected.push(e);
            }
        }
    }
    out
}
