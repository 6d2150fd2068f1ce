mod chunk;
mod heightmap;

pub use chunk::{generate_chunk, GenerationError};
pub use heightmap::{Heightmap, HeightmapGenerator};
