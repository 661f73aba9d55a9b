//! # Command-Line Interface
//!
//! User-facing CLI commands and output formatting.
//!
//! ## Commands
//!
//! | Command | Purpose |
//! |---------|---------|
//! | `init` | Create `.hublink/config.toml` in a vault |
//! | `link` | Add backlinks to hubs (`--dry-run` to preview) |
//! | `watch` | Link, then re-link on every change |
//! | `map add/remove/list` | Manage tag to hub mappings |
//! | `config show/set` | Inspect and change options |
//! | `tags`, `links` | Show what the linker reads from one note |
//!
//! ## Output Formats
//!
//! All commands support `--format`:
//! - `text` (default) - Human-readable output
//! - `json` - Machine-parseable JSON
//!
//! The default can be changed with `default_format` in the global config.
//!
//! ## Logging
//!
//! Warnings (missing hubs, unreadable notes) go to stderr. Use `--verbose`
//! (or `-v`) for debug logging, or set `RUST_LOG`.
//!
//! ## Entry Point
//!
//! Call [`run()`] to parse arguments and execute the appropriate command.

mod app;
mod output;
mod link_cmd;
mod watch_cmd;
mod map_cmd;
mod config_cmd;
mod inspect;

pub use app::{Cli, Commands, run};
pub use output::{Output, OutputFormat};
