use std::collections::{BTreeMap, HashMap};

use log::debug;
use terrain::chunk::Revision;

/// Chunks waiting for the mesh builder.
///
/// A chunk is only queued when its revision differs from the one last handed
/// to the builder, so re-receiving an unchanged chunk never triggers a rebuild.
#[derive(Debug, Default)]
pub struct DirtyChunks {
    pending: BTreeMap<String, Revision>,
    handed_out: HashMap<String, Revision>,
}

impl DirtyChunks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a single chunk dirty. Returns false if the builder already has this revision.
    pub fn mark_dirty(&mut self, key: &str, revision: Revision) -> bool {
        if self.handed_out.get(key) == Some(&revision) {
            return false;
        }
        debug!("Marking chunk {} (revision {}) as dirty", key, revision);
        self.pending.insert(key.to_string(), revision);
        true
    }

    /// Pop one dirty chunk and record its revision as handed to the builder.
    pub fn pop_dirty(&mut self) -> Option<(String, Revision)> {
        let (key, revision) = self.pending.pop_first()?;
        self.handed_out.insert(key.clone(), revision);
        Some((key, revision))
    }

    pub fn pop_if_dirty(&mut self, key: &str) -> Option<Revision> {
        let revision = self.pending.remove(key)?;
        self.handed_out.insert(key.to_string(), revision);
        Some(revision)
    }

    pub fn is_dirty(&self, key: &str) -> bool {
        self.pending.contains_key(key)
    }

    /// Drops everything known about a chunk, e.g. once it has been evicted.
    pub fn forget(&mut self, key: &str) {
        self.pending.remove(key);
        self.handed_out.remove(key);
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
