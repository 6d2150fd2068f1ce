// src/session.rs

//! Per-viewer streaming state.
//!
//! A viewer is registered with nothing visible. Each accepted view extent is
//! answered with the chunks that were not part of the previous one, so a
//! client that applies every partial state in order ends up holding the whole
//! extent. Chunks that fail to generate are remembered per viewer and retried
//! on the viewer's next `moveView`.

use std::collections::{BTreeSet, HashMap};

use log::{debug, info, warn};
use terrain::chunk::Terrain;
use terrain::coords::{Coords, MaterialId};
use terrain::environment::EnvironmentState;
use terrain::extent::{
    cap_extent, chunks_by_subtracting_extents, chunks_in_extent, compare_extents, is_chunk_in_extent, ViewExtent,
};
use terrain::protocol::Message;

use crate::config::ServerConfig;
use crate::error::SessionError;
use crate::terrain::generator::{Heightmap, HeightmapGenerator};
use crate::terrain::TerrainStore;

/// Identifies one connected viewer; assigned by the transport.
pub type ViewerId = String;

#[derive(Clone, Debug, PartialEq, Eq)]
struct Viewer {
    view_extent: ViewExtent,
    /// Chunk bases inside `view_extent` that could not be sent yet.
    missing: BTreeSet<Coords>,
}

pub struct StreamingSession<H = HeightmapGenerator> {
    store: TerrainStore<H>,
    viewers: HashMap<ViewerId, Viewer>,
    max_extent_width: i32,
    max_extent_height: Option<i32>,
}

impl StreamingSession<HeightmapGenerator> {
    /// A session over the noise heightmap described by `config`.
    pub fn from_config(config: &ServerConfig) -> Self {
        let heightmap = HeightmapGenerator::with_config(config.seed, &config.heightmap);
        Self::new(
            TerrainStore::new(heightmap),
            config.max_extent_width,
            Some(config.max_extent_height),
        )
    }
}

impl<H: Heightmap> StreamingSession<H> {
    pub fn new(store: TerrainStore<H>, max_extent_width: i32, max_extent_height: Option<i32>) -> Self {
        Self {
            store,
            viewers: HashMap::new(),
            max_extent_width,
            max_extent_height,
        }
    }

    pub fn store(&self) -> &TerrainStore<H> {
        &self.store
    }

    pub fn register_viewer(&mut self, id: &str) -> Result<(), SessionError> {
        if self.viewers.contains_key(id) {
            warn!("A viewer with the id {} has already been registered", id);
            return Err(SessionError::DuplicateViewerRegistration(id.to_string()));
        }
        self.viewers.insert(
            id.to_string(),
            Viewer {
                view_extent: ViewExtent::EMPTY,
                missing: BTreeSet::new(),
            },
        );
        info!("Registered viewer {}", id);
        Ok(())
    }

    /// Forgets a viewer, returning its last extent.
    pub fn unregister_viewer(&mut self, id: &str) -> Result<ViewExtent, SessionError> {
        let viewer = self
            .viewers
            .remove(id)
            .ok_or_else(|| SessionError::ViewerNotFound(id.to_string()))?;
        info!("Unregistered viewer {}", id);
        Ok(viewer.view_extent)
    }

    pub fn is_registered(&self, id: &str) -> bool {
        self.viewers.contains_key(id)
    }

    pub fn viewer_count(&self) -> usize {
        self.viewers.len()
    }

    pub fn view_extent(&self, id: &str) -> Result<ViewExtent, SessionError> {
        Ok(self.viewer(id)?.view_extent)
    }

    /// Caps `requested` and, if it differs from the viewer's current extent,
    /// stores it and returns the chunks the viewer has not been sent yet.
    ///
    /// Chunks that failed to generate for an earlier extent are retried as
    /// long as they are still in view. Repeating the current extent with
    /// nothing left to retry returns `None`.
    pub fn set_view_extent(
        &mut self,
        id: &str,
        requested: &ViewExtent,
    ) -> Result<Option<EnvironmentState>, SessionError> {
        let (previous, retry) = {
            let viewer = self.viewer(id)?;
            (viewer.view_extent, viewer.missing.clone())
        };
        let extent = cap_extent(requested, self.max_extent_width, self.max_extent_height);
        let moved = compare_extents(&extent, &previous);
        if !moved && retry.is_empty() {
            debug!("Viewer {} view extent unchanged", id);
            return Ok(None);
        }

        let mut wanted = if moved {
            chunks_by_subtracting_extents(&previous, &extent)
        } else {
            Vec::new()
        };
        wanted.extend(retry.into_iter().filter(|base| is_chunk_in_extent(&extent, *base)));

        let terrain = self.store.get_chunks(&wanted);
        let missing: BTreeSet<Coords> = wanted
            .into_iter()
            .filter(|base| !terrain.contains_key(&base.to_key()))
            .collect();
        if !missing.is_empty() {
            warn!("{} chunks for viewer {} will be retried on its next move", missing.len(), id);
        }
        if let Some(viewer) = self.viewers.get_mut(id) {
            viewer.view_extent = extent;
            viewer.missing = missing;
        }

        if !moved && terrain.is_empty() {
            return Ok(None);
        }
        info!(
            "Viewer {} moved view to {:?}, sending {} chunks",
            id,
            extent,
            terrain.len()
        );
        Ok(Some(EnvironmentState::new(terrain)))
    }

    /// Every chunk of the viewer's current extent.
    pub fn full_state(&mut self, id: &str) -> Result<EnvironmentState, SessionError> {
        let extent = self.viewer(id)?.view_extent;
        let terrain = self.store.get_chunks(&chunks_in_extent(&extent));
        Ok(EnvironmentState::new(terrain))
    }

    /// Fills or clears one world cell and returns the edited chunk for every
    /// viewer whose extent holds it, ordered by viewer id. An edit that
    /// changes nothing notifies no one.
    pub fn alter_grid_cell(
        &mut self,
        coords: Coords,
        material: Option<MaterialId>,
    ) -> Result<Vec<(ViewerId, EnvironmentState)>, SessionError> {
        if self.store.set_cell(coords, material)?.is_none() {
            return Ok(Vec::new());
        }
        let base = coords.chunk_base();
        let key = base.to_key();
        let chunk = self.store.get_chunk(base)?.clone();

        let mut updates = Vec::new();
        for (id, viewer) in self.viewers.iter_mut() {
            if is_chunk_in_extent(&viewer.view_extent, base) {
                viewer.missing.remove(&base);
                let terrain = Terrain::from([(key.clone(), chunk.clone())]);
                updates.push((id.clone(), EnvironmentState::new(terrain)));
            }
        }
        updates.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(updates)
    }

    /// Routes one upstream message and returns the messages to deliver, each
    /// with its recipient.
    pub fn handle_message(&mut self, sender: &str, message: &Message) -> Result<Vec<(ViewerId, Message)>, SessionError> {
        match message {
            Message::MoveView(extent) => {
                let reply = self.set_view_extent(sender, extent)?;
                Ok(reply
                    .map(|state| (sender.to_string(), Message::EnvironmentState(state.encode())))
                    .into_iter()
                    .collect())
            }
            Message::AlterGridCell(edit) => {
                self.viewer(sender)?;
                let updates = self.alter_grid_cell(edit.coords, edit.material)?;
                Ok(updates
                    .into_iter()
                    .map(|(id, state)| (id, Message::EnvironmentState(state.encode())))
                    .collect())
            }
            other => {
                warn!("Ignoring unexpected {} message from {}", other.name(), sender);
                Ok(Vec::new())
            }
        }
    }

    /// [`StreamingSession::handle_message`] on raw JSON envelopes.
    pub fn handle_json(&mut self, sender: &str, json: &str) -> Result<Vec<(ViewerId, String)>, SessionError> {
        let message = Message::from_json(json)?;
        let mut outgoing = Vec::new();
        for (recipient, reply) in self.handle_message(sender, &message)? {
            outgoing.push((recipient, reply.to_json()?));
        }
        Ok(outgoing)
    }

    fn viewer(&self, id: &str) -> Result<&Viewer, SessionError> {
        self.viewers
            .get(id)
            .ok_or_else(|| SessionError::ViewerNotFound(id.to_string()))
    }
}
