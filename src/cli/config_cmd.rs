//! Configuration commands

use std::path::Path;

use anyhow::Result;
use clap::Subcommand;

use super::output::Output;
use crate::storage::Workspace;

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show the vault configuration
    Show,

    /// Set a configuration option
    Set {
        /// Option name (default_path, append_format, section_heading,
        /// batch_size, inline_tags, watch.debounce_ms)
        key: String,

        /// New value
        value: String,
    },
}

pub fn run(cmd: ConfigCommands, output: &Output, vault: Option<&Path>) -> Result<()> {
    let mut workspace = Workspace::open_or_current(vault)?;

    match cmd {
        ConfigCommands::Show => show(&workspace, output),
        ConfigCommands::Set { key, value } => set(&mut workspace, output, &key, &value),
    }
}

fn show(workspace: &Workspace, output: &Output) -> Result<()> {
    let config = &workspace.config().vault;

    if output.is_json() {
        output.data(config);
        return Ok(());
    }

    let batch_size = config.batch_size.to_string();
    let debounce = config.watch.debounce_ms.to_string();
    let mappings = config.tag_mappings.len().to_string();

    output.row(&["vault", &workspace.root().display().to_string()]);
    output.row(&["default_path", &config.default_path]);
    output.row(&["append_format", &config.append_format]);
    output.row(&["section_heading", &config.section_heading]);
    output.row(&["batch_size", &batch_size]);
    output.row(&["inline_tags", config.inline_tags.as_str()]);
    output.row(&["watch.debounce_ms", &debounce]);
    output.row(&["tag_mappings", &mappings]);

    Ok(())
}

fn set(workspace: &mut Workspace, output: &Output, key: &str, value: &str) -> Result<()> {
    let config = workspace.config_mut();
    config.vault.set(key, value)?;
    config.save_vault()?;

    output.success(&format!("Set {} = {}", key, value));
    Ok(())
}
