//! hublink - Tag-driven backlinks for markdown vaults
//!
//! hublink reads the tags of every note in a vault and appends a link to
//! each note under a heading in the "hub" notes its tags are mapped to.
//! Running it again never duplicates a link.

pub mod domain;
pub mod storage;
pub mod linker;
pub mod cli;

pub use domain::{extract_links, extract_tags, merge, resolve, TagMapping};
pub use linker::{LinkReport, Linker, Progress, RunCache};
pub use storage::{FsVault, NoteHandle, Vault, VaultError};
