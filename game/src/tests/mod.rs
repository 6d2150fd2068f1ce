
use terrain::prelude::*;

/// A chunk with the given columns filled, keyed by local `(x, z)`.
pub(crate) fn chunk_with(revision: Revision, columns: &[((usize, usize), Vec<CellColumnRange>)]) -> GridChunk {
    let mut chunk = GridChunk::empty(revision);
    for ((x, z), ranges) in columns {
        chunk.set_column(*x, *z, Column::Filled(CellColumn::new(ranges.clone())));
    }
    chunk
}

pub(crate) fn terrain_of(chunks: Vec<(&str, GridChunk)>) -> Terrain {
    chunks.into_iter().map(|(key, chunk)| (key.to_string(), chunk)).collect()
}
