//! Workspace management
//!
//! A workspace is a vault directory with a `.hublink/` configuration
//! directory at its root.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use thiserror::Error;

use super::config::CONFIG_DIR;
use super::{Config, FsVault};

#[derive(Debug, Error)]
pub enum WorkspaceError {
    #[error("Not in a hublink vault. Run 'hublink init' first.")]
    NotInVault,

    #[error("Vault directory does not exist: {0}")]
    MissingRoot(PathBuf),
}

/// A vault together with its configuration
pub struct Workspace {
    root: PathBuf,
    config: Config,
}

impl Workspace {
    /// Opens an existing workspace at the given path
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();

        if !root.join(CONFIG_DIR).is_dir() {
            return Err(WorkspaceError::NotInVault.into());
        }

        let config = Config::for_vault(&root)?;

        Ok(Self { root, config })
    }

    /// Opens the workspace at the current directory or a parent
    pub fn open_current() -> Result<Self> {
        let root = Config::find_vault_root().ok_or(WorkspaceError::NotInVault)?;

        Self::open(root)
    }

    /// Opens `vault` if given, otherwise searches from the current directory
    pub fn open_or_current(vault: Option<&Path>) -> Result<Self> {
        match vault {
            Some(path) => Self::open(path),
            None => Self::open_current(),
        }
    }

    /// Initializes a workspace in an existing vault directory
    pub fn init(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        if !root.is_dir() {
            return Err(WorkspaceError::MissingRoot(root).into());
        }

        let config_dir = root.join(CONFIG_DIR);
        fs::create_dir_all(&config_dir).with_context(|| {
            format!(
                "Failed to create {} directory: {}",
                CONFIG_DIR,
                config_dir.display()
            )
        })?;

        let config_path = Config::vault_config_path(&root);
        if !config_path.exists() {
            let default_config = r###"# hublink configuration

# Folder to scan for notes ("/" scans the whole vault)
default_path = "/"

# Line appended to a hub; {note} is replaced by the note name
append_format = "- [[{note}]]"

# Heading under which links are inserted (created when missing)
section_heading = "## Links"

# Notes processed between progress reports
batch_size = 50

# Where inline #tags are read from: "all", "body" or "off"
inline_tags = "all"

# Tag to hub mappings, for example:
#
# [[tag_mappings]]
# tag = "maths"
# hub_path = "Maths MOC"
"###;
            fs::write(&config_path, default_config)
                .with_context(|| format!("Failed to write config: {}", config_path.display()))?;
        }

        Self::open(root)
    }

    /// Returns the vault root path
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the `.hublink` directory path
    pub fn config_dir(&self) -> PathBuf {
        self.root.join(CONFIG_DIR)
    }

    /// Returns the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns a mutable reference to the configuration
    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    /// Returns the filesystem vault for this workspace
    pub fn vault(&self) -> FsVault {
        FsVault::new(&self.root)
    }
}
