//! # Storage Layer
//!
//! Access to the vault on disk and to hublink's configuration.
//!
//! ## Layout
//!
//! ```text
//! vault/
//! ├── .hublink/
//! │   └── config.toml       # Mappings and link options
//! ├── Maths MOC.md          # Hub notes
//! └── notes/
//!     └── Algebra.md        # Tagged notes
//! ```
//!
//! Hidden directories (`.hublink`, `.obsidian`, `.git`) are never scanned.
//! Hub writes are atomic (temp file + rename).
//!
//! ## Key Types
//!
//! - [`Vault`] - Listing, reading and writing notes
//! - [`FsVault`] - Filesystem-backed vault
//! - [`Workspace`] - A vault plus its configuration
//! - [`Config`] - Vault and global configuration

mod config;
mod vault;
mod workspace;

pub use config::{
    Config, ConfigError, GlobalConfig, LinkConfig, OutputFormat, WatchConfig, CONFIG_DIR,
    NOTE_PLACEHOLDER,
};
pub use vault::{is_hidden, FsVault, NoteHandle, Vault, VaultError, VAULT_ROOT};
pub use workspace::{Workspace, WorkspaceError};
