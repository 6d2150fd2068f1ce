pub mod generator;
pub mod store;

pub use store::TerrainStore;
