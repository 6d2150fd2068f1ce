pub mod dirtychunks;
pub mod store;

pub use dirtychunks::DirtyChunks;
pub use store::ClientTerrain;
