//! # Linker
//!
//! Runs the tag-to-hub linking pass over a vault.
//!
//! For every note under the configured folder:
//!
//! 1. read it once and extract its tags (cached in [`RunCache`])
//! 2. resolve each tag against the configured mappings
//! 3. for each mapped hub that exists, insert a link line under the section
//!    heading unless the hub already links to the note
//!
//! Hubs are written back right after each insertion and the cached hub is
//! updated in place, so later notes in the same run see the new content.
//! Read and write failures are logged and skipped; a run always completes
//! and reports how many links it added.

mod cache;

pub use cache::{CachedHub, CachedNote, RunCache};

use log::{debug, info, warn};
use serde::Serialize;

use crate::domain::{merge, resolve, TagMapping};
use crate::storage::{LinkConfig, NoteHandle, Vault};

/// Receives human-readable status messages during a run
pub trait Progress {
    fn report(&mut self, message: &str);
}

impl<F: FnMut(&str)> Progress for F {
    fn report(&mut self, message: &str) {
        self(message)
    }
}

/// A link inserted during a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AddedLink {
    /// Name of the linked note
    pub note: String,

    /// Vault-relative hub path
    pub hub: String,

    /// Tag that caused the link
    pub tag: String,
}

/// Outcome of a linking run
#[derive(Debug, Clone, Default, Serialize)]
pub struct LinkReport {
    /// Notes considered
    pub notes_scanned: usize,

    /// Links inserted into hubs
    pub links_added: usize,

    /// Mapped hubs that do not exist
    pub missing_hubs: usize,

    /// Notes or hubs that could not be read or written
    pub failures: usize,

    /// Every inserted link, in insertion order
    pub added: Vec<AddedLink>,
}

/// Links tagged notes into their hubs
pub struct Linker<'a, V: Vault + ?Sized> {
    vault: &'a V,
    config: &'a LinkConfig,
    dry_run: bool,
}

impl<'a, V: Vault + ?Sized> Linker<'a, V> {
    pub fn new(vault: &'a V, config: &'a LinkConfig) -> Self {
        Self {
            vault,
            config,
            dry_run: false,
        }
    }

    /// Computes insertions without writing any hub
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Runs a full pass with a fresh cache
    pub fn run(&self, progress: &mut dyn Progress) -> LinkReport {
        let mut cache = RunCache::new();
        self.run_with_cache(&mut cache, progress)
    }

    /// Runs a full pass reusing `cache`
    pub fn run_with_cache(&self, cache: &mut RunCache, progress: &mut dyn Progress) -> LinkReport {
        let mut report = LinkReport::default();

        let notes = match self.vault.list_notes(&self.config.default_path) {
            Ok(notes) => notes,
            Err(e) => {
                warn!("Cannot scan '{}': {}", self.config.default_path, e);
                progress.report(&format!(
                    "Could not scan '{}': {}",
                    self.config.default_path, e
                ));
                progress.report(&finished_message(&report));
                return report;
            }
        };

        let total = notes.len();
        let batch_size = self.config.batch_size.max(1);
        progress.report(&format!("Scanning {} notes for tag mappings", total));

        let mut processed = 0;
        for chunk in notes.chunks(batch_size) {
            for note in chunk {
                self.process_note(note, cache, &mut report);
            }

            processed += chunk.len();
            if processed < total {
                progress.report(&format!(
                    "Processed {}/{} notes, {} links added",
                    processed, total, report.links_added
                ));
            }
        }

        progress.report(&finished_message(&report));
        report
    }

    fn process_note(&self, note: &NoteHandle, cache: &mut RunCache, report: &mut LinkReport) {
        report.notes_scanned += 1;

        let tags = match cache.note(self.vault, note, self.config.inline_tags) {
            Ok(cached) => cached.tags.clone(),
            Err(e) => {
                warn!("Skipping note: {}", e);
                report.failures += 1;
                return;
            }
        };

        if tags.is_empty() {
            return;
        }

        for tag in &tags {
            for mapping in resolve(tag, &self.config.tag_mappings) {
                self.link_into_hub(note, tag, mapping, cache, report);
            }
        }
    }

    fn link_into_hub(
        &self,
        note: &NoteHandle,
        tag: &str,
        mapping: &TagMapping,
        cache: &mut RunCache,
        report: &mut LinkReport,
    ) {
        let hub_path = mapping.normalized_hub_path();
        let Some(hub) = self.vault.resolve(&hub_path) else {
            warn!("Hub not found: {} (mapped from tag '{}')", hub_path, mapping.tag);
            report.missing_hubs += 1;
            return;
        };

        let entry = match cache.hub(self.vault, &hub) {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Skipping hub: {}", e);
                report.failures += 1;
                return;
            }
        };

        if entry.links.contains(&note.basename) {
            debug!("{} already links to [[{}]]", hub.path, note.basename);
            return;
        }

        let line = self.config.link_line(&note.basename);
        let updated = merge(&entry.content, &self.config.section_heading, &line);

        if !self.dry_run {
            if let Err(e) = self.vault.write(&hub, &updated) {
                warn!("Skipping hub: {}", e);
                report.failures += 1;
                return;
            }
        }

        entry.content = updated;
        entry.links.insert(note.basename.clone());

        info!("Linked [[{}]] into {} via #{}", note.basename, hub.path, tag);
        report.links_added += 1;
        report.added.push(AddedLink {
            note: note.basename.clone(),
            hub: hub.path,
            tag: tag.to_string(),
        });
    }
}

fn finished_message(report: &LinkReport) -> String {
    match report.links_added {
        1 => "Finished: added 1 link".to_string(),
        n => format!("Finished: added {} links", n),
    }
}
