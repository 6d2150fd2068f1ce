// src/environment.rs

use serde::{Deserialize, Serialize};

use crate::chunk::Terrain;
use crate::codec::{decode_terrain, encode_terrain, TerrainEncoded};
use crate::coords::{chunk_key_to_coords, Coords};
use crate::error::TerrainError;
use crate::extent::{is_chunk_in_extent, ViewExtent};

/// Entities travel opaquely next to the terrain; this core never looks inside them.
pub type Entity = serde_json::Value;

/// A full or partial snapshot of what a viewer knows about the world.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EnvironmentState {
    pub terrain: Terrain,
    pub entities: Vec<Entity>,
}

/// Wire form of [`EnvironmentState`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentStateEncoded {
    pub c: TerrainEncoded,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub e: Option<Vec<Entity>>,
}

impl EnvironmentState {
    pub fn new(terrain: Terrain) -> Self {
        Self {
            terrain,
            entities: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.terrain.is_empty() && self.entities.is_empty()
    }

    pub fn encode(&self) -> EnvironmentStateEncoded {
        EnvironmentStateEncoded {
            c: encode_terrain(&self.terrain),
            e: (!self.entities.is_empty()).then(|| self.entities.clone()),
        }
    }

    /// Keeps the chunks whose base corner passes `keep`. Chunks under keys that
    /// do not name a chunk base are dropped.
    pub fn retain_chunks(&mut self, mut keep: impl FnMut(Coords) -> bool) {
        self.terrain.retain(|key, _| match chunk_key_to_coords(key) {
            Ok(base) => keep(base),
            Err(_) => false,
        });
    }

    /// Drops every chunk whose base corner lies outside `extent`.
    pub fn retain_within(&mut self, extent: &ViewExtent) {
        self.retain_chunks(|base| is_chunk_in_extent(extent, base));
    }
}

impl EnvironmentStateEncoded {
    /// Decodes the snapshot. Malformed chunks are left out and reported next to it.
    pub fn decode(&self) -> (EnvironmentState, Vec<TerrainError>) {
        let decoded = decode_terrain(&self.c);
        let state = EnvironmentState {
            terrain: decoded.terrain,
            entities: self.e.clone().unwrap_or_default(),
        };
        (state, decoded.rejected)
    }
}

/// Folds two snapshots into one.
///
/// Per chunk key the higher revision wins; on equal revisions the copy from
/// `first` is kept. Entities of `second` are appended unless an identical
/// entity is already present, so `merge(s, s) == s`.
pub fn merge_environment_states(first: &EnvironmentState, second: &EnvironmentState) -> EnvironmentState {
    let mut terrain = first.terrain.clone();
    for (key, chunk) in &second.terrain {
        match terrain.get(key) {
            Some(existing) if existing.revision() >= chunk.revision() => {}
            _ => {
                terrain.insert(key.clone(), chunk.clone());
            }
        }
    }

    let mut entities = first.entities.clone();
    for entity in &second.entities {
        if !entities.contains(entity) {
            entities.push(entity.clone());
        }
    }

    EnvironmentState { terrain, entities }
}
