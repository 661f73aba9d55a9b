//! Configuration handling for hublink
//!
//! Configuration is stored in `.hublink/config.toml` (vault) and
//! `~/.config/hublink/config.toml` (global).

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{extract_links, strip_hash, InlineTagScope, TagMapping};

/// Name of the per-vault configuration directory
pub const CONFIG_DIR: &str = ".hublink";

/// Placeholder replaced by the note name in `append_format`
pub const NOTE_PLACEHOLDER: &str = "{note}";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to parse configuration: {0}")]
    Parse(String),

    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),
}

/// Settings for `hublink watch`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct WatchConfig {
    /// Debounce delay in milliseconds before a re-run
    pub debounce_ms: u64,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self { debounce_ms: 500 }
    }
}

/// Vault-level configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LinkConfig {
    /// Folder to scan for notes ("/" for the whole vault)
    pub default_path: String,

    /// Link line template; `{note}` is replaced by the note name
    pub append_format: String,

    /// Heading under which links are inserted
    pub section_heading: String,

    /// Notes per progress report
    pub batch_size: usize,

    /// Where inline `#tags` are looked for
    pub inline_tags: InlineTagScope,

    /// Watch mode settings
    pub watch: WatchConfig,

    /// Tag to hub mappings
    pub tag_mappings: Vec<TagMapping>,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            default_path: "/".to_string(),
            append_format: "- [[{note}]]".to_string(),
            section_heading: "## Links".to_string(),
            batch_size: 50,
            inline_tags: InlineTagScope::default(),
            watch: WatchConfig::default(),
            tag_mappings: vec![],
        }
    }
}

impl LinkConfig {
    /// Checks the options the linker relies on
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.section_heading.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "section_heading must not be empty".to_string(),
            ));
        }

        if self.batch_size == 0 {
            return Err(ConfigError::Invalid(
                "batch_size must be a positive integer".to_string(),
            ));
        }

        if !self.append_format.contains(NOTE_PLACEHOLDER) {
            return Err(ConfigError::Invalid(format!(
                "append_format must contain the {} placeholder",
                NOTE_PLACEHOLDER
            )));
        }

        // Re-runs find existing links by their `[[name]]`, so the rendered
        // line has to carry exactly that link
        if !extract_links(&self.link_line("note")).contains("note") {
            return Err(ConfigError::Invalid(format!(
                "append_format must render a [[{}]] link",
                NOTE_PLACEHOLDER
            )));
        }

        if let Some(m) = self
            .tag_mappings
            .iter()
            .find(|m| strip_hash(m.tag.trim()).is_empty() || m.hub_path.trim().is_empty())
        {
            return Err(ConfigError::Invalid(format!(
                "mapping '{}' -> '{}' needs both a tag and a hub path",
                m.tag, m.hub_path
            )));
        }

        Ok(())
    }

    /// Renders the link line for a note
    pub fn link_line(&self, note_name: &str) -> String {
        self.append_format.replacen(NOTE_PLACEHOLDER, note_name, 1)
    }

    /// Sets a scalar option by key
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        match key {
            "default_path" => self.default_path = value.to_string(),
            "append_format" => self.append_format = value.to_string(),
            "section_heading" => self.section_heading = value.to_string(),
            "batch_size" => {
                self.batch_size = value
                    .parse()
                    .map_err(|_| ConfigError::Invalid(format!("batch_size: '{}' is not a number", value)))?
            }
            "inline_tags" => self.inline_tags = value.parse().map_err(ConfigError::Invalid)?,
            "watch.debounce_ms" => {
                self.watch.debounce_ms = value.parse().map_err(|_| {
                    ConfigError::Invalid(format!("watch.debounce_ms: '{}' is not a number", value))
                })?
            }
            other => return Err(ConfigError::UnknownKey(other.to_string())),
        }

        self.validate()
    }

    /// Adds a mapping; returns false if the same tag/hub pair already exists
    pub fn add_mapping(&mut self, mapping: TagMapping) -> bool {
        let exists = self.tag_mappings.iter().any(|m| {
            strip_hash(&m.tag) == strip_hash(&mapping.tag)
                && m.normalized_hub_path() == mapping.normalized_hub_path()
        });

        if exists {
            return false;
        }

        self.tag_mappings.push(mapping);
        true
    }

    /// Removes mappings for a tag, optionally only those pointing at `hub`
    ///
    /// Returns the number of mappings removed.
    pub fn remove_mappings(&mut self, tag: &str, hub: Option<&str>) -> usize {
        let hub = hub.map(crate::domain::normalize_hub_path);
        let before = self.tag_mappings.len();

        self.tag_mappings.retain(|m| {
            let tag_matches = m.matches(tag);
            let hub_matches = hub
                .as_deref()
                .map_or(true, |h| m.normalized_hub_path() == h);
            !(tag_matches && hub_matches)
        });

        before - self.tag_mappings.len()
    }
}

/// Global user configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GlobalConfig {
    /// Default output format (text or json)
    pub default_format: OutputFormat,
}

/// Output format for commands
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Combined configuration (global + vault)
#[derive(Debug, Clone)]
pub struct Config {
    pub vault: LinkConfig,
    pub global: GlobalConfig,
    pub vault_root: Option<PathBuf>,
}

impl Config {
    /// Loads configuration for a specific vault
    pub fn for_vault(vault_root: &Path) -> Result<Self> {
        let global = Self::load_global()?;
        let vault = Self::load_vault_config(vault_root)?;

        Ok(Self {
            vault,
            global,
            vault_root: Some(vault_root.to_path_buf()),
        })
    }

    /// Returns the global config directory
    pub fn global_config_dir() -> Option<PathBuf> {
        ProjectDirs::from("dev", "hublink", "hublink").map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Path of the vault config file
    pub fn vault_config_path(vault_root: &Path) -> PathBuf {
        vault_root.join(CONFIG_DIR).join("config.toml")
    }

    /// Loads global configuration
    pub fn load_global() -> Result<GlobalConfig> {
        let config_dir = match Self::global_config_dir() {
            Some(dir) => dir,
            None => return Ok(GlobalConfig::default()),
        };

        let config_path = config_dir.join("config.toml");
        if !config_path.exists() {
            return Ok(GlobalConfig::default());
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read global config: {}", config_path.display()))?;

        toml::from_str(&content)
            .map_err(|e| ConfigError::Parse(e.to_string()))
            .context("Failed to parse global config")
    }

    /// Loads vault configuration from a specific root
    fn load_vault_config(vault_root: &Path) -> Result<LinkConfig> {
        let config_path = Self::vault_config_path(vault_root);

        if !config_path.exists() {
            return Ok(LinkConfig::default());
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read vault config: {}", config_path.display()))?;

        Self::parse_vault_config(&content).context("Failed to parse vault config")
    }

    /// Parses and validates vault configuration text
    pub fn parse_vault_config(content: &str) -> Result<LinkConfig, ConfigError> {
        let config: LinkConfig =
            toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Finds the vault root by looking for a `.hublink/` directory
    pub fn find_vault_root() -> Option<PathBuf> {
        let current = std::env::current_dir().ok()?;
        Self::find_vault_root_from(&current)
    }

    /// Finds the vault root starting at `start` and walking up
    pub fn find_vault_root_from(start: &Path) -> Option<PathBuf> {
        let mut current = start.to_path_buf();

        loop {
            if current.join(CONFIG_DIR).is_dir() {
                return Some(current);
            }

            if !current.pop() {
                return None;
            }
        }
    }

    /// Returns the vault root, or an error if not in a vault
    pub fn require_vault_root(&self) -> Result<&Path> {
        self.vault_root
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("Not in a hublink vault. Run 'hublink init' first."))
    }

    /// Saves the vault configuration
    pub fn save_vault(&self) -> Result<()> {
        let root = self.require_vault_root()?;
        let config_path = Self::vault_config_path(root);

        let content =
            toml::to_string_pretty(&self.vault).context("Failed to serialize vault config")?;

        fs::write(&config_path, content)
            .with_context(|| format!("Failed to write vault config: {}", config_path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config() {
        let config = LinkConfig::default();

        assert_eq!(config.default_path, "/");
        assert_eq!(config.section_heading, "## Links");
        assert_eq!(config.batch_size, 50);
        assert_eq!(config.inline_tags, InlineTagScope::All);
        assert!(config.tag_mappings.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn parse_vault_config() {
        let toml = r##"
default_path = "Notes"
append_format = "* [[{note}]]"
section_heading = "# Index"
batch_size = 10
inline_tags = "body"

[[tag_mappings]]
tag = "maths"
hub_path = "MOC"

[[tag_mappings]]
tag = "#physics"
hub_path = "Hubs/Physics.md"
"##;

        let config = Config::parse_vault_config(toml).unwrap();
        assert_eq!(config.default_path, "Notes");
        assert_eq!(config.batch_size, 10);
        assert_eq!(config.inline_tags, InlineTagScope::Body);
        assert_eq!(config.tag_mappings.len(), 2);
        assert_eq!(config.tag_mappings[1], TagMapping::new("#physics", "Hubs/Physics.md"));
        assert_eq!(config.link_line("A"), "* [[A]]");
        assert_eq!(config.watch, WatchConfig::default());
    }

    #[test]
    fn parse_global_config() {
        let config: GlobalConfig = toml::from_str(r#"default_format = "json""#).unwrap();
        assert_eq!(config.default_format, OutputFormat::Json);
    }

    #[test]
    fn invalid_configs_are_rejected() {
        assert!(matches!(
            Config::parse_vault_config("batch_size = 0"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            Config::parse_vault_config(r#"section_heading = "  ""#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            Config::parse_vault_config(r#"append_format = "- [[note]]""#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            Config::parse_vault_config("[[tag_mappings]]\ntag = \"#\"\nhub_path = \"MOC\""),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            Config::parse_vault_config(r#"append_format = "- {note}""#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            Config::parse_vault_config(r#"append_format = "- [[see {note}]]""#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(Config::parse_vault_config(r#"append_format = "- [[{note}|alias]] ok""#).is_ok());
        assert!(matches!(
            Config::parse_vault_config("batch_size = \"many\""),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn link_line_substitutes_once() {
        let config = LinkConfig {
            append_format: "- [[{note}]] ({note})".to_string(),
            ..LinkConfig::default()
        };
        assert_eq!(config.link_line("A"), "- [[A]] ({note})");
    }

    #[test]
    fn set_options() {
        let mut config = LinkConfig::default();

        config.set("batch_size", "5").unwrap();
        config.set("inline_tags", "off").unwrap();
        config.set("section_heading", "## Backlinks").unwrap();
        config.set("watch.debounce_ms", "250").unwrap();
        assert_eq!(config.batch_size, 5);
        assert_eq!(config.inline_tags, InlineTagScope::Off);
        assert_eq!(config.section_heading, "## Backlinks");
        assert_eq!(config.watch.debounce_ms, 250);

        assert!(matches!(config.set("batch_size", "x"), Err(ConfigError::Invalid(_))));
        assert!(matches!(config.set("colour", "red"), Err(ConfigError::UnknownKey(_))));
    }

    #[test]
    fn add_and_remove_mappings() {
        let mut config = LinkConfig::default();

        assert!(config.add_mapping(TagMapping::new("maths", "MOC")));
        assert!(!config.add_mapping(TagMapping::new("#maths", "MOC.md")));
        assert!(config.add_mapping(TagMapping::new("maths", "Index")));
        assert!(config.add_mapping(TagMapping::new("physics", "MOC")));

        assert_eq!(config.remove_mappings("#maths", Some("Index")), 1);
        assert_eq!(config.tag_mappings.len(), 2);

        assert_eq!(config.remove_mappings("maths", None), 1);
        assert_eq!(config.tag_mappings, vec![TagMapping::new("physics", "MOC")]);

        assert_eq!(config.remove_mappings("nothing", None), 0);
    }

    #[test]
    fn find_vault_root() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join(CONFIG_DIR)).unwrap();

        let sub_dir = dir.path().join("sub").join("dir");
        fs::create_dir_all(&sub_dir).unwrap();

        let root = Config::find_vault_root_from(&sub_dir);
        assert_eq!(root.as_deref(), Some(dir.path()));
    }

    #[test]
    fn save_and_reload_vault_config() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join(CONFIG_DIR)).unwrap();

        let mut config = Config::for_vault(dir.path()).unwrap();
        config.vault.add_mapping(TagMapping::new("maths", "MOC"));
        config.vault.batch_size = 7;
        config.save_vault().unwrap();

        let reloaded = Config::for_vault(dir.path()).unwrap();
        assert_eq!(reloaded.vault, config.vault);
    }

    #[test]
    fn config_not_in_vault() {
        let config = Config {
            vault: LinkConfig::default(),
            global: GlobalConfig::default(),
            vault_root: None,
        };

        assert!(config.require_vault_root().is_err());
    }
}
