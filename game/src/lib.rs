//! Client half of the terrain streamer: the local chunk cache, dirty tracking
//! for the mesh builder, and view tracking that drives `moveView` requests.

pub mod environment;
pub mod error;
pub mod terrain;
pub mod view;

pub use environment::ClientEnvironment;
pub use error::ClientError;
pub use crate::terrain::{ClientTerrain, DirtyChunks};
pub use view::{ViewConfig, ViewTracker, ViewUpdate};

#[cfg(test)]
mod tests;
