// src/environment.rs

use std::time::Instant;

use log::warn;
use terrain::environment::{merge_environment_states, EnvironmentState, EnvironmentStateEncoded};
use terrain::protocol::Message;

use crate::error::ClientError;
use crate::terrain::{ClientTerrain, DirtyChunks};
use crate::view::{ViewConfig, ViewTracker, ViewUpdate};

/// Client-side composition of the chunk cache, the dirty queue and the view
/// tracker. Feed it camera updates and server messages; it returns the
/// messages to send back.
#[derive(Debug)]
pub struct ClientEnvironment {
    last: EnvironmentState,
    terrain: ClientTerrain,
    dirty: DirtyChunks,
    view: ViewTracker,
}

impl ClientEnvironment {
    pub fn new(config: ViewConfig) -> Self {
        Self {
            last: EnvironmentState::default(),
            terrain: ClientTerrain::new(),
            dirty: DirtyChunks::new(),
            view: ViewTracker::new(config),
        }
    }

    pub fn terrain(&self) -> &ClientTerrain {
        &self.terrain
    }

    pub fn dirty_chunks(&mut self) -> &mut DirtyChunks {
        &mut self.dirty
    }

    pub fn view(&self) -> &ViewTracker {
        &self.view
    }

    /// The last merged state, trimmed to the chunks the view retains.
    pub fn state(&self) -> &EnvironmentState {
        &self.last
    }

    /// Moves the camera. Evicts chunks that left the buffered view and returns
    /// the `moveView` request to send, if one is due.
    pub fn update_camera(&mut self, position: [f64; 3], forward: [f64; 3], now: Instant) -> Option<Message> {
        let update = self.view.update_camera(position, forward, now);
        self.apply_view_update(update)
    }

    /// Sends a throttled `moveView` that is still pending.
    pub fn flush(&mut self, now: Instant) -> Option<Message> {
        let update = self.view.flush(now);
        self.apply_view_update(update)
    }

    /// Applies a downstream message and returns the keys of chunks that changed.
    pub fn handle_message(&mut self, message: &Message) -> Result<Vec<String>, ClientError> {
        match message {
            Message::EnvironmentState(encoded) => Ok(self.apply_encoded(encoded)),
            other => Err(ClientError::UnexpectedMessage(other.name())),
        }
    }

    pub fn handle_json(&mut self, json: &str) -> Result<Vec<String>, ClientError> {
        let message = Message::from_json(json)?;
        self.handle_message(&message)
    }

    /// Decodes and applies a snapshot; malformed chunks are dropped and logged.
    pub fn apply_encoded(&mut self, encoded: &EnvironmentStateEncoded) -> Vec<String> {
        let (state, rejected) = encoded.decode();
        if !rejected.is_empty() {
            warn!("Dropped {} malformed chunks from environment state", rejected.len());
        }
        self.apply_state(&state)
    }

    /// Folds `incoming` into the last state, drops chunks the view does not
    /// retain, and copies the result into the cache. Changed chunks are marked
    /// dirty.
    ///
    /// A reply can arrive after the camera has moved on. Its chunks are still
    /// kept while they lie inside the extent last sent to the server, because
    /// the server will not send them again.
    pub fn apply_state(&mut self, incoming: &EnvironmentState) -> Vec<String> {
        let mut merged = merge_environment_states(&self.last, incoming);
        let view = &self.view;
        merged.retain_chunks(|base| view.retains(base));

        let changed = self.terrain.update_chunks(&merged.terrain);
        for key in &changed {
            if let Some(chunk) = self.terrain.get(key) {
                self.dirty.mark_dirty(key, chunk.revision());
            }
        }
        self.last = merged;
        changed
    }

    fn apply_view_update(&mut self, update: ViewUpdate) -> Option<Message> {
        for key in &update.evict {
            self.evict(key);
        }
        update.send.map(Message::MoveView)
    }

    fn evict(&mut self, key: &str) {
        self.terrain.remove_chunk_by_key(key);
        self.dirty.forget(key);
        self.last.terrain.remove(key);
    }
}
