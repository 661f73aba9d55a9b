//! The `watch` command
//!
//! Links once, then re-links after every debounced batch of file changes.
//! A single [`RunCache`] lives for the whole session; changed paths are
//! invalidated before each re-run.

use std::path::Path;
use std::sync::mpsc;
use std::time::Duration;

use anyhow::{Context, Result};
use log::{debug, warn};
use notify::RecursiveMode;
use notify_debouncer_mini::new_debouncer;

use super::link_cmd::link_config;
use super::output::Output;
use crate::domain::NOTE_EXTENSION;
use crate::linker::{Linker, RunCache};
use crate::storage::{is_hidden, FsVault, Workspace};

pub fn run(output: &Output, vault: Option<&Path>, root: Option<String>) -> Result<()> {
    let workspace = Workspace::open_or_current(vault)?;
    let config = link_config(&workspace, root)?;

    // Watcher events carry canonical paths
    let vault_root = workspace
        .root()
        .canonicalize()
        .with_context(|| format!("Failed to resolve vault: {}", workspace.root().display()))?;
    let fs_vault = FsVault::new(&vault_root);

    let linker = Linker::new(&fs_vault, &config);
    let mut cache = RunCache::new();
    let mut progress = |message: &str| output.progress(message);

    linker.run_with_cache(&mut cache, &mut progress);

    let (tx, rx) = mpsc::channel();
    let mut debouncer = new_debouncer(Duration::from_millis(config.watch.debounce_ms), tx)?;
    debouncer
        .watcher()
        .watch(&vault_root, RecursiveMode::Recursive)?;

    output.success(&format!(
        "Watching {} for changes (Ctrl+C to stop)",
        vault_root.display()
    ));

    loop {
        match rx.recv() {
            Ok(Ok(events)) => {
                let changed: Vec<String> = events
                    .iter()
                    .filter_map(|e| fs_vault.relative_path(&e.path))
                    .filter(|path| is_watched(path))
                    .collect();

                if changed.is_empty() {
                    continue;
                }

                for path in &changed {
                    debug!("Changed: {}", path);
                    cache.invalidate(path);
                }

                linker.run_with_cache(&mut cache, &mut progress);
            }
            Ok(Err(error)) => {
                warn!("Watch error: {:?}", error);
            }
            Err(e) => {
                warn!("Channel error: {}", e);
                break;
            }
        }
    }

    Ok(())
}

/// Markdown files outside hidden directories
fn is_watched(path: &str) -> bool {
    let suffix = format!(".{}", NOTE_EXTENSION);
    path.ends_with(&suffix) && !path.split('/').any(is_hidden)
}
