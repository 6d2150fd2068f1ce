// src/lib.rs

//! Shared terrain domain types for both client & server: chunk addressing,
//! the column model and its wire codec, view extent math, and snapshot merge.

pub mod chunk;
pub mod codec;
pub mod coords;
pub mod environment;
pub mod error;
pub mod extent;
pub mod prelude;
pub mod protocol;
pub mod shape;

pub use error::TerrainError;

#[cfg(test)]
mod tests;
