use log::debug;
use terrain::prelude::*;
use thiserror::Error;

use super::heightmap::Heightmap;

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("heightmap returned {height} at ({x}, {z})")]
    NonFiniteHeight { x: i32, z: i32, height: f64 },
    #[error(transparent)]
    Terrain(#[from] TerrainError),
}

const MATERIAL_GROUND: MaterialId = 0;

/// Heights of a chunk's columns plus a one-cell border, so each column's
/// eight neighbours are sampled once instead of per column.
struct PaddedHeights {
    data: Vec<f64>,
    dim: usize, // CHUNK_WIDTH + 2
}

impl PaddedHeights {
    fn sample<H: Heightmap + ?Sized>(heightmap: &H, base: Coords) -> Result<Self, GenerationError> {
        let dim = CHUNK_WIDTH as usize + 2;
        let mut data = Vec::with_capacity(dim * dim);
        for z in -1..=CHUNK_WIDTH {
            for x in -1..=CHUNK_WIDTH {
                let (wx, wz) = (base.x.saturating_add(x), base.z.saturating_add(z));
                let height = heightmap.height(wx, wz);
                if !height.is_finite() {
                    return Err(GenerationError::NonFiniteHeight { x: wx, z: wz, height });
                }
                data.push(height);
            }
        }
        Ok(Self { data, dim })
    }

    /// Height at a chunk-local position; -1 and CHUNK_WIDTH reach into the border.
    fn get(&self, local_x: i32, local_z: i32) -> f64 {
        let u = (local_x + 1) as usize;
        let v = (local_z + 1) as usize;
        self.data[v * self.dim + u]
    }
}

/// Builds the chunk whose base corner is `base` from the heightmap alone.
///
/// Each column holds at most one ground range starting at the chunk floor.
/// Columns whose ground lies below the chunk are empty. The top shape comes
/// from which of the eight horizontal neighbours reach a higher whole cell;
/// when the ground rises past the chunk's ceiling the top is left flat.
/// Fresh chunks start at revision 0.
pub fn generate_chunk<H: Heightmap + ?Sized>(heightmap: &H, base: Coords) -> Result<GridChunk, GenerationError> {
    let heights = PaddedHeights::sample(heightmap, base)?;
    let base_y = base.y as f64;
    let mut columns = Vec::with_capacity(COLUMNS_PER_CHUNK);

    for i in 0..COLUMNS_PER_CHUNK as i32 {
        let local_x = i % CHUNK_WIDTH;
        let local_z = i / CHUNK_WIDTH;
        let height = heights.get(local_x, local_z);
        if height < base_y {
            columns.push(Column::Empty);
            continue;
        }

        let depth = (height - base_y).floor() as i64;
        let top_cell = height.floor();
        let top_shape = if depth > (CHUNK_HEIGHT - 1) as i64 {
            SurfaceShape::Flat
        } else {
            let flags = Neighbours::OFFSETS.map(|(dx, dz)| heights.get(local_x + dx, local_z + dz).floor() > top_cell);
            SurfaceShape::from_neighbours(Neighbours::from_flags(flags))
        };

        let range_size = depth.min((CHUNK_HEIGHT - 1) as i64);
        let range = CellColumnRange::try_new(0, range_size, MATERIAL_GROUND as i64)?.with_top_shape(top_shape);
        columns.push(Column::Filled(CellColumn::new(vec![range])));
    }

    let chunk = GridChunk::from_columns(columns, 0)?;
    debug!(
        "Generated chunk {} ({} filled columns)",
        base.to_key(),
        chunk.filled_columns()
    );
    Ok(chunk)
}
