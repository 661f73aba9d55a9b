//! Main CLI application structure

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use super::output::{Output, OutputFormat};
use super::{config_cmd, inspect, link_cmd, map_cmd, watch_cmd};
use crate::storage::{Config, Workspace};

#[derive(Parser)]
#[command(name = "hublink")]
#[command(author, version, about = "Append backlinks to hub notes based on note tags")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format (defaults to the global config, then text)
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Vault directory (defaults to the nearest parent with a .hublink directory)
    #[arg(long, global = true, env = "HUBLINK_VAULT")]
    pub vault: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize hublink in a vault directory
    Init {
        /// Vault directory (defaults to current directory)
        #[arg(default_value = ".")]
        path: PathBuf,
    },

    /// Add backlinks to hubs for every mapped tag
    Link {
        /// Report what would be linked without modifying any hub
        #[arg(long)]
        dry_run: bool,

        /// Folder to scan instead of the configured default_path
        #[arg(long)]
        root: Option<String>,
    },

    /// Link once, then re-link whenever notes change
    Watch {
        /// Folder to scan instead of the configured default_path
        #[arg(long)]
        root: Option<String>,
    },

    /// Manage tag to hub mappings
    #[command(subcommand)]
    Map(map_cmd::MapCommands),

    /// Show or change configuration
    #[command(subcommand)]
    Config(config_cmd::ConfigCommands),

    /// Show the tags extracted from a note
    Tags {
        /// Vault-relative note path (".md" optional)
        note: String,
    },

    /// Show the notes a hub already links to
    Links {
        /// Vault-relative hub path (".md" optional)
        hub: String,
    },
}

/// Main entry point for the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let format = match cli.format {
        Some(format) => format,
        None => Config::load_global()?.default_format.into(),
    };
    let output = Output::new(format);
    let vault = cli.vault.as_deref();

    log::debug!("hublink starting");

    match cli.command {
        Commands::Init { path } => {
            let workspace = Workspace::init(&path)?;
            output.success(&format!(
                "Initialized hublink in {}",
                workspace.root().display()
            ));
        }

        Commands::Link { dry_run, root } => link_cmd::run(&output, vault, dry_run, root)?,
        Commands::Watch { root } => watch_cmd::run(&output, vault, root)?,
        Commands::Map(cmd) => map_cmd::run(cmd, &output, vault)?,
        Commands::Config(cmd) => config_cmd::run(cmd, &output, vault)?,
        Commands::Tags { note } => inspect::tags(&output, vault, &note)?,
        Commands::Links { hub } => inspect::links(&output, vault, &hub)?,
    }

    Ok(())
}

/// Logs to stderr at `warn`, or `debug` for hublink itself with `--verbose`.
/// `RUST_LOG` overrides both.
fn init_logging(verbose: bool) {
    let default_filter = if verbose { "warn,hublink=debug" } else { "warn" };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .format_target(false)
        .init();
}
