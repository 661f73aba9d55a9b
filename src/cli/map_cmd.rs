//! Tag mapping commands

use std::path::Path;

use anyhow::Result;
use clap::Subcommand;

use super::output::Output;
use crate::domain::TagMapping;
use crate::storage::{Vault, Workspace};

#[derive(Subcommand)]
pub enum MapCommands {
    /// Map a tag to a hub note
    Add {
        /// Tag, with or without '#'
        tag: String,

        /// Vault-relative hub path (".md" optional)
        hub: String,
    },

    /// Remove mappings for a tag
    Remove {
        /// Tag, with or without '#'
        tag: String,

        /// Only remove the mapping to this hub
        #[arg(long)]
        hub: Option<String>,
    },

    /// List all mappings
    List,
}

pub fn run(cmd: MapCommands, output: &Output, vault: Option<&Path>) -> Result<()> {
    let mut workspace = Workspace::open_or_current(vault)?;

    match cmd {
        MapCommands::Add { tag, hub } => add(&mut workspace, output, tag, hub),
        MapCommands::Remove { tag, hub } => remove(&mut workspace, output, &tag, hub.as_deref()),
        MapCommands::List => list(&workspace, output),
    }
}

fn add(workspace: &mut Workspace, output: &Output, tag: String, hub: String) -> Result<()> {
    let mapping = TagMapping::new(tag, hub);
    let hub_path = mapping.normalized_hub_path();
    let hub_exists = workspace.vault().resolve(&hub_path).is_some();

    let config = workspace.config_mut();
    if !config.vault.add_mapping(mapping.clone()) {
        anyhow::bail!("Mapping already exists: {} -> {}", mapping.tag, hub_path);
    }
    config.vault.validate()?;
    config.save_vault()?;

    if !hub_exists {
        log::warn!("Hub {} does not exist yet; it will be skipped until created", hub_path);
    }

    if output.is_json() {
        output.data(&serde_json::json!({
            "tag": mapping.tag,
            "hub_path": mapping.hub_path,
            "hub_exists": hub_exists,
        }));
    } else {
        output.success(&format!("Mapped {} -> {}", mapping.tag, hub_path));
    }

    Ok(())
}

fn remove(workspace: &mut Workspace, output: &Output, tag: &str, hub: Option<&str>) -> Result<()> {
    let config = workspace.config_mut();
    let removed = config.vault.remove_mappings(tag, hub);

    if removed == 0 {
        anyhow::bail!("No mapping found for tag '{}'", tag);
    }
    config.save_vault()?;

    if output.is_json() {
        output.data(&serde_json::json!({ "removed": removed }));
    } else {
        output.success(&format!("Removed {} mapping(s) for {}", removed, tag));
    }

    Ok(())
}

fn list(workspace: &Workspace, output: &Output) -> Result<()> {
    let mappings = &workspace.config().vault.tag_mappings;

    if output.is_json() {
        output.data(mappings);
        return Ok(());
    }

    if mappings.is_empty() {
        println!("No tag mappings configured.");
        return Ok(());
    }

    for mapping in mappings {
        output.row(&[mapping.tag.as_str(), "->", mapping.normalized_hub_path().as_str()]);
    }

    Ok(())
}
