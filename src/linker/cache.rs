//! Per-run memoization of note tags and hub links

use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};

use crate::domain::{extract_links, extract_tags_with, InlineTagScope};
use crate::storage::{NoteHandle, Vault, VaultError};

/// A note as read during a run
#[derive(Debug, Clone)]
pub struct CachedNote {
    pub content: String,
    pub tags: Vec<String>,
}

/// A hub as last read or written during a run
#[derive(Debug, Clone)]
pub struct CachedHub {
    pub content: String,
    pub links: HashSet<String>,
}

/// Lazily filled caches keyed by vault-relative path
///
/// A fresh cache is used for each `hublink link` run. Watch mode keeps one
/// alive across runs and calls [`RunCache::invalidate`] for changed paths.
#[derive(Debug, Default)]
pub struct RunCache {
    notes: HashMap<String, CachedNote>,
    hubs: HashMap<String, CachedHub>,
}

impl RunCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached note, reading and extracting tags on first access
    pub fn note<V: Vault + ?Sized>(
        &mut self,
        vault: &V,
        note: &NoteHandle,
        scope: InlineTagScope,
    ) -> Result<&CachedNote, VaultError> {
        let cached: &CachedNote = match self.notes.entry(note.path.clone()) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                let content = vault.read(note)?;
                let tags = extract_tags_with(&content, scope);
                entry.insert(CachedNote { content, tags })
            }
        };
        Ok(cached)
    }

    /// Returns the cached hub, reading and extracting links on first access
    pub fn hub<V: Vault + ?Sized>(
        &mut self,
        vault: &V,
        hub: &NoteHandle,
    ) -> Result<&mut CachedHub, VaultError> {
        let cached = match self.hubs.entry(hub.path.clone()) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                let content = vault.read(hub)?;
                let links = extract_links(&content);
                entry.insert(CachedHub { content, links })
            }
        };
        Ok(cached)
    }

    /// Drops everything cached for `path`; returns true if anything was cached
    pub fn invalidate(&mut self, path: &str) -> bool {
        let note = self.notes.remove(path).is_some();
        let hub = self.hubs.remove(path).is_some();
        note || hub
    }

    pub fn clear(&mut self) {
        self.notes.clear();
        self.hubs.clear();
    }

    pub fn note_count(&self) -> usize {
        self.notes.len()
    }

    pub fn hub_count(&self) -> usize {
        self.hubs.len()
    }
}
