//! Tag to hub mappings

use serde::{Deserialize, Serialize};

/// File extension of notes and hubs
pub const NOTE_EXTENSION: &str = "md";

/// A configured association from a tag to a hub note
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagMapping {
    /// Tag, with or without a leading `#`
    pub tag: String,

    /// Vault-relative hub path; the `.md` extension is optional
    pub hub_path: String,
}

impl TagMapping {
    pub fn new(tag: impl Into<String>, hub_path: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            hub_path: hub_path.into(),
        }
    }

    /// Returns true if this mapping applies to `tag`
    pub fn matches(&self, tag: &str) -> bool {
        strip_hash(&self.tag) == strip_hash(tag)
    }

    /// Hub path with the note extension applied
    pub fn normalized_hub_path(&self) -> String {
        normalize_hub_path(&self.hub_path)
    }
}

/// Removes a single leading `#`
pub fn strip_hash(tag: &str) -> &str {
    tag.strip_prefix('#').unwrap_or(tag)
}

/// Returns every mapping for `tag`
///
/// Matching is exact and case-sensitive once the `#` prefix is ignored on both
/// sides. No matches is an empty result, not an error.
pub fn resolve<'a>(tag: &str, mappings: &'a [TagMapping]) -> Vec<&'a TagMapping> {
    mappings.iter().filter(|m| m.matches(tag)).collect()
}

/// Normalizes a hub path to a vault-relative `.md` path
///
/// Empty, `.` and `..` segments are dropped so the result never leaves the
/// vault.
pub fn normalize_hub_path(path: &str) -> String {
    let path = path
        .trim()
        .split('/')
        .filter(|part| !matches!(*part, "" | "." | ".."))
        .collect::<Vec<_>>()
        .join("/");
    let suffix = format!(".{}", NOTE_EXTENSION);

    if path.ends_with(&suffix) {
        path.to_string()
    } else {
        format!("{}{}", path, suffix)
    }
}
