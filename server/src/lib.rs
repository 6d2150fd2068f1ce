//! Server half of the terrain streamer: procedural chunk generation, the
//! authoritative chunk store, and per-viewer streaming sessions.

pub mod config;
pub mod error;
pub mod session;
pub mod terrain;

pub use config::{ConfigError, HeightmapConfig, ServerConfig};
pub use error::SessionError;
pub use session::{StreamingSession, ViewerId};
pub use crate::terrain::generator::{GenerationError, Heightmap, HeightmapGenerator};
pub use crate::terrain::TerrainStore;

#[cfg(test)]
mod tests;
