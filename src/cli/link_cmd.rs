//! The `link` command

use std::path::Path;

use anyhow::Result;

use super::output::Output;
use crate::linker::Linker;
use crate::storage::{LinkConfig, Workspace};

/// Effective link settings: the vault config with an optional root override
pub(super) fn link_config(workspace: &Workspace, root: Option<String>) -> Result<LinkConfig> {
    let mut config = workspace.config().vault.clone();
    if let Some(root) = root {
        config.default_path = root;
    }
    config.validate()?;
    Ok(config)
}

pub fn run(output: &Output, vault: Option<&Path>, dry_run: bool, root: Option<String>) -> Result<()> {
    let workspace = Workspace::open_or_current(vault)?;
    let config = link_config(&workspace, root)?;

    if config.tag_mappings.is_empty() {
        log::warn!("No tag mappings configured; add one with 'hublink map add <tag> <hub>'");
    }

    let fs_vault = workspace.vault();
    let linker = Linker::new(&fs_vault, &config).dry_run(dry_run);
    let report = linker.run(&mut |message: &str| output.progress(message));

    if output.is_json() {
        output.data(&serde_json::json!({
            "dry_run": dry_run,
            "report": report,
        }));
        return Ok(());
    }

    for added in &report.added {
        let verb = if dry_run { "Would link" } else { "Linked" };
        let link = format!("[[{}]]", added.note);
        output.row(&[verb, link.as_str(), "->", added.hub.as_str()]);
    }

    if report.missing_hubs > 0 || report.failures > 0 {
        let summary = format!(
            "{} missing hub(s), {} failure(s); run with --verbose for details",
            report.missing_hubs, report.failures
        );
        output.row(&[summary.as_str()]);
    }

    if dry_run {
        output.row(&["Dry run: no hubs were modified"]);
    }

    Ok(())
}
