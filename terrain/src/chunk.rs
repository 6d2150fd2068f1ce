// src/chunk.rs

use std::collections::BTreeMap;

use crate::coords::{column_index, Coords, MaterialId, CHUNK_HEIGHT, CHUNK_WIDTH, COLUMNS_PER_CHUNK};
use crate::error::TerrainError;
use crate::shape::SurfaceShape;

/// Chunk revision. Only ever grows; equal revisions mean equal content.
pub type Revision = u64;

/// Chunks by key (`"x y z"`). A missing key means "not known yet", not "empty".
pub type Terrain = BTreeMap<String, GridChunk>;

/// One contiguous vertical run of a single material inside a column.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CellColumnRange {
    pub top_shape: SurfaceShape,
    pub bottom_shape: SurfaceShape,
    /// Offset from the chunk's base y.
    pub bottom_start: u8,
    pub range_size: u8,
    pub material_id: MaterialId,
}

impl CellColumnRange {
    pub fn new(bottom_start: u8, range_size: u8, material_id: MaterialId) -> Self {
        Self {
            top_shape: SurfaceShape::Flat,
            bottom_shape: SurfaceShape::Flat,
            bottom_start,
            range_size,
            material_id,
        }
    }

    /// Builds a range from unchecked integers, failing on any field that does
    /// not fit its encoded width instead of wrapping it.
    pub fn try_new(bottom_start: i64, range_size: i64, material_id: i64) -> Result<Self, TerrainError> {
        Ok(Self::new(
            checked_field("bottom_start", bottom_start, u8::MAX as i64)? as u8,
            checked_field("range_size", range_size, u8::MAX as i64)? as u8,
            checked_field("material_id", material_id, MaterialId::MAX as i64)? as MaterialId,
        ))
    }

    pub fn with_top_shape(mut self, shape: SurfaceShape) -> Self {
        self.top_shape = shape;
        self
    }

    pub fn with_bottom_shape(mut self, shape: SurfaceShape) -> Self {
        self.bottom_shape = shape;
        self
    }

    /// First local y above this range.
    pub fn end(&self) -> u32 {
        self.bottom_start as u32 + self.range_size as u32
    }

    pub fn contains(&self, local_y: u32) -> bool {
        (self.bottom_start as u32) <= local_y && local_y < self.end()
    }
}

fn checked_field(field: &'static str, value: i64, max: i64) -> Result<i64, TerrainError> {
    if (0..=max).contains(&value) {
        Ok(value)
    } else {
        Err(TerrainError::RangeFieldOverflow { field, value, max })
    }
}

/// The solid runs at one (x, z) position of a chunk, bottom to top.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct CellColumn {
    pub ranges: Vec<CellColumnRange>,
}

impl CellColumn {
    pub fn new(ranges: Vec<CellColumnRange>) -> Self {
        Self { ranges }
    }

    /// Ranges sorted by `bottom_start` and not overlapping. Touching ranges of
    /// the same material are fine.
    pub fn is_well_ordered(&self) -> bool {
        self.ranges
            .windows(2)
            .all(|pair| pair[0].end() <= pair[1].bottom_start as u32)
    }

    pub fn range_containing(&self, local_y: u32) -> Option<&CellColumnRange> {
        self.ranges.iter().find(|r| r.contains(local_y))
    }

    /// Fills the cell at `local_y` with `material`, or clears it with `None`.
    ///
    /// A range holding the cell is split around it; the part below keeps the
    /// range's bottom shape and the part above keeps its top shape. Returns
    /// false if the cell already had that content. `local_y` is below
    /// `CHUNK_HEIGHT`, checked by [`GridChunk::set_cell`].
    pub(crate) fn set_cell(&mut self, local_y: u8, material: Option<MaterialId>) -> bool {
        let y = local_y as u32;
        let Some(i) = self.ranges.iter().position(|r| r.contains(y)) else {
            let Some(material_id) = material else {
                return false;
            };
            let at = self.ranges.partition_point(|r| r.end() <= y);
            self.ranges.insert(at, CellColumnRange::new(local_y, 1, material_id));
            return true;
        };

        let range = self.ranges[i];
        if material == Some(range.material_id) {
            return false;
        }

        let mut parts = Vec::with_capacity(3);
        if range.bottom_start < local_y {
            parts.push(CellColumnRange {
                range_size: local_y - range.bottom_start,
                top_shape: SurfaceShape::Flat,
                ..range
            });
        }
        if let Some(material_id) = material {
            let mut cell = CellColumnRange::new(local_y, 1, material_id);
            if range.bottom_start == local_y {
                cell.bottom_shape = range.bottom_shape;
            }
            if range.end() == y + 1 {
                cell.top_shape = range.top_shape;
            }
            parts.push(cell);
        }
        if range.end() > y + 1 {
            parts.push(CellColumnRange {
                bottom_start: (y + 1) as u8,
                range_size: (range.end() - y - 1) as u8,
                bottom_shape: SurfaceShape::Flat,
                ..range
            });
        }
        self.ranges.splice(i..=i, parts);
        true
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Column {
    /// No solid cell anywhere in the column.
    Empty,
    Filled(CellColumn),
}

impl Column {
    pub fn as_filled(&self) -> Option<&CellColumn> {
        match self {
            Column::Empty => None,
            Column::Filled(col) => Some(col),
        }
    }
}

/// A chunk: `CHUNK_WIDTH²` columns indexed by `x + z * CHUNK_WIDTH`, plus a revision.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct GridChunk {
    columns: Vec<Column>,
    revision: Revision,
}

impl GridChunk {
    /// A chunk with every column empty.
    pub fn empty(revision: Revision) -> Self {
        Self {
            columns: vec![Column::Empty; COLUMNS_PER_CHUNK],
            revision,
        }
    }

    pub fn from_columns(columns: Vec<Column>, revision: Revision) -> Result<Self, TerrainError> {
        if columns.len() != COLUMNS_PER_CHUNK {
            return Err(TerrainError::malformed(format!(
                "expected {} columns, got {}",
                COLUMNS_PER_CHUNK,
                columns.len()
            )));
        }
        Ok(Self { columns, revision })
    }

    pub fn revision(&self) -> Revision {
        self.revision
    }

    /// Marks the content as changed.
    pub fn bump_revision(&mut self) -> Revision {
        self.revision += 1;
        self.revision
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, local_x: usize, local_z: usize) -> &Column {
        &self.columns[column_index(local_x, local_z)]
    }

    /// Replaces a column. Does not touch the revision; callers that edit
    /// published chunks must call [`GridChunk::bump_revision`].
    pub fn set_column(&mut self, local_x: usize, local_z: usize, column: Column) {
        self.columns[column_index(local_x, local_z)] = column;
    }

    /// Fills or clears one cell at a chunk-local position and bumps the
    /// revision if anything changed. A column left without ranges becomes
    /// [`Column::Empty`].
    pub fn set_cell(&mut self, local: Coords, material: Option<MaterialId>) -> Result<bool, TerrainError> {
        let inside = (0..CHUNK_WIDTH).contains(&local.x)
            && (0..CHUNK_HEIGHT).contains(&local.y)
            && (0..CHUNK_WIDTH).contains(&local.z);
        if !inside {
            return Err(TerrainError::CellOutsideChunk(local));
        }

        let y = local.y as u8;
        let column = &mut self.columns[column_index(local.x as usize, local.z as usize)];
        let changed = match column {
            Column::Empty => match material {
                Some(material_id) => {
                    *column = Column::Filled(CellColumn::new(vec![CellColumnRange::new(y, 1, material_id)]));
                    true
                }
                None => false,
            },
            Column::Filled(cells) => {
                let changed = cells.set_cell(y, material);
                if cells.ranges.is_empty() {
                    *column = Column::Empty;
                }
                changed
            }
        };

        if changed {
            self.bump_revision();
        }
        Ok(changed)
    }

    pub fn filled_columns(&self) -> usize {
        self.columns.iter().filter(|c| matches!(c, Column::Filled(_))).count()
    }
}
