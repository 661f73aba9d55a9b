//! Commands that show what the linker sees in a single note

use std::path::Path;

use anyhow::Result;

use super::output::Output;
use crate::domain::{extract_links, extract_tags_with, normalize_hub_path, resolve};
use crate::storage::{NoteHandle, Vault, Workspace};

/// Resolves a user-supplied note path within the vault
fn find_note(vault: &impl Vault, path: &str) -> Result<NoteHandle> {
    let normalized = normalize_hub_path(path);
    vault
        .resolve(&normalized)
        .ok_or_else(|| anyhow::anyhow!("Note not found: {}", normalized))
}

pub fn tags(output: &Output, vault: Option<&Path>, note: &str) -> Result<()> {
    let workspace = Workspace::open_or_current(vault)?;
    let config = &workspace.config().vault;
    let fs_vault = workspace.vault();

    let note = find_note(&fs_vault, note)?;
    let content = fs_vault.read(&note)?;
    let tags = extract_tags_with(&content, config.inline_tags);

    let rows: Vec<(String, Vec<String>)> = tags
        .into_iter()
        .map(|tag| {
            let hubs = resolve(&tag, &config.tag_mappings)
                .into_iter()
                .map(|m| m.normalized_hub_path())
                .collect();
            (tag, hubs)
        })
        .collect();

    if output.is_json() {
        let json: Vec<_> = rows
            .iter()
            .map(|(tag, hubs)| serde_json::json!({ "tag": tag, "hubs": hubs }))
            .collect();
        output.data(&json);
        return Ok(());
    }

    if rows.is_empty() {
        println!("No tags in {}", note.path);
        return Ok(());
    }

    for (tag, hubs) in &rows {
        if hubs.is_empty() {
            output.row(&[tag.as_str()]);
        } else {
            output.row(&[tag.as_str(), "->", hubs.join(", ").as_str()]);
        }
    }

    Ok(())
}

pub fn links(output: &Output, vault: Option<&Path>, hub: &str) -> Result<()> {
    let workspace = Workspace::open_or_current(vault)?;
    let fs_vault = workspace.vault();

    let hub = find_note(&fs_vault, hub)?;
    let content = fs_vault.read(&hub)?;

    let mut links: Vec<String> = extract_links(&content).into_iter().collect();
    links.sort();

    if output.is_json() {
        output.data(&links);
        return Ok(());
    }

    if links.is_empty() {
        println!("No links in {}", hub.path);
        return Ok(());
    }

    for link in &links {
        output.row(&[link.as_str()]);
    }

    Ok(())
}
