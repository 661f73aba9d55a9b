//! Note storage
//!
//! The [`Vault`] trait is the boundary between the linker and wherever notes
//! live. [`FsVault`] is the filesystem implementation: a directory tree of
//! markdown files addressed by vault-relative, `/`-separated paths.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::warn;
use serde::Serialize;
use thiserror::Error;
use walkdir::WalkDir;

use crate::domain::NOTE_EXTENSION;

/// Root selector meaning "the whole vault"
pub const VAULT_ROOT: &str = "/";

#[derive(Debug, Error)]
pub enum VaultError {
    #[error("Failed to read {path}: {source}")]
    Read { path: String, source: io::Error },

    #[error("Failed to write {path}: {source}")]
    Write { path: String, source: io::Error },

    #[error("Failed to list notes under {path}: {source}")]
    List { path: String, source: io::Error },

    #[error("Not found: {0}")]
    NotFound(String),
}

/// A note in the vault
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct NoteHandle {
    /// Vault-relative path, `/`-separated
    pub path: String,

    /// File name without extension, used as the link target
    pub basename: String,

    /// File extension without the dot
    pub extension: String,
}

impl NoteHandle {
    /// Builds a handle from a vault-relative path
    pub fn from_path(path: impl Into<String>) -> Self {
        let path = path.into();
        let file_name = path.rsplit('/').next().unwrap_or(&path);
        let (basename, extension) = match file_name.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() => (stem.to_string(), ext.to_string()),
            _ => (file_name.to_string(), String::new()),
        };

        Self {
            path,
            basename,
            extension,
        }
    }

    /// Returns true for markdown notes
    pub fn is_note(&self) -> bool {
        self.extension == NOTE_EXTENSION
    }
}

/// Storage and listing of notes
pub trait Vault {
    /// Lists every note under `root` (`"/"` for the whole vault)
    fn list_notes(&self, root: &str) -> Result<Vec<NoteHandle>, VaultError>;

    /// Reads the full text of a note
    fn read(&self, note: &NoteHandle) -> Result<String, VaultError>;

    /// Replaces the full text of a note
    fn write(&self, note: &NoteHandle, content: &str) -> Result<(), VaultError>;

    /// Looks up an existing note by vault-relative path
    fn resolve(&self, path: &str) -> Option<NoteHandle>;
}

/// A vault backed by a directory on disk
#[derive(Debug, Clone)]
pub struct FsVault {
    root: PathBuf,
}

impl FsVault {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Returns the vault directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute path for a vault-relative path
    ///
    /// `.` and `..` segments are ignored, so the result is always under the root.
    pub fn full_path(&self, path: &str) -> PathBuf {
        let mut full = self.root.clone();
        full.extend(segments(path));
        full
    }

    /// Vault-relative path for a path on disk, if it is inside the vault
    pub fn relative_path(&self, path: &Path) -> Option<String> {
        let relative = path.strip_prefix(&self.root).ok()?;
        let parts: Vec<_> = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();

        if parts.is_empty() {
            None
        } else {
            Some(parts.join("/"))
        }
    }

    fn scan_dir(&self, root: &str) -> PathBuf {
        let root = root.trim_matches('/');
        if root.is_empty() {
            self.root.clone()
        } else {
            self.full_path(root)
        }
    }
}

fn segments(path: &str) -> impl Iterator<Item = &str> + '_ {
    path.split('/').filter(|part| !matches!(*part, "" | "." | ".."))
}

/// Returns true for dot-prefixed names like `.obsidian`, `.git` or `.hublink`
pub fn is_hidden(name: &str) -> bool {
    name.starts_with('.')
}

impl Vault for FsVault {
    fn list_notes(&self, root: &str) -> Result<Vec<NoteHandle>, VaultError> {
        let dir = self.scan_dir(root);
        if !dir.is_dir() {
            return Err(VaultError::NotFound(root.to_string()));
        }

        let mut notes = Vec::new();
        let walker = WalkDir::new(&dir)
            .follow_links(false)
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !is_hidden(&e.file_name().to_string_lossy()));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) if e.depth() == 0 => {
                    return Err(VaultError::List {
                        path: root.to_string(),
                        source: e.into(),
                    });
                }
                Err(e) => {
                    warn!("Skipping unreadable entry under '{}': {}", root, e);
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }

            if let Some(relative) = self.relative_path(entry.path()) {
                let handle = NoteHandle::from_path(relative);
                if handle.is_note() {
                    notes.push(handle);
                }
            }
        }

        notes.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(notes)
    }

    fn read(&self, note: &NoteHandle) -> Result<String, VaultError> {
        fs::read_to_string(self.full_path(&note.path)).map_err(|source| VaultError::Read {
            path: note.path.clone(),
            source,
        })
    }

    /// Writes atomically (temp file + rename)
    fn write(&self, note: &NoteHandle, content: &str) -> Result<(), VaultError> {
        let path = self.full_path(&note.path);
        let temp_path = path.with_extension(format!("{}.tmp", note.extension));
        let write_err = |source| VaultError::Write {
            path: note.path.clone(),
            source,
        };

        fs::write(&temp_path, content).map_err(write_err)?;
        fs::rename(&temp_path, &path).map_err(|source| {
            let _ = fs::remove_file(&temp_path);
            write_err(source)
        })
    }

    fn resolve(&self, path: &str) -> Option<NoteHandle> {
        let path = segments(path).collect::<Vec<_>>().join("/");
        if !path.is_empty() && self.full_path(&path).is_file() {
            Some(NoteHandle::from_path(path))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn vault_with(files: &[(&str, &str)]) -> (TempDir, FsVault) {
        let dir = TempDir::new().unwrap();
        for (path, content) in files {
            let full = dir.path().join(path);
            fs::create_dir_all(full.parent().unwrap()).unwrap();
            fs::write(full, content).unwrap();
        }
        let vault = FsVault::new(dir.path());
        (dir, vault)
    }

    #[test]
    fn handle_from_path() {
        let handle = NoteHandle::from_path("Maths/Algebra.md");
        assert_eq!(handle.basename, "Algebra");
        assert_eq!(handle.extension, "md");
        assert!(handle.is_note());

        let handle = NoteHandle::from_path("notes.v2.md");
        assert_eq!(handle.basename, "notes.v2");

        let handle = NoteHandle::from_path("README");
        assert_eq!(handle.basename, "README");
        assert_eq!(handle.extension, "");
        assert!(!handle.is_note());
    }

    #[test]
    fn list_whole_vault() {
        let (_dir, vault) = vault_with(&[
            ("b.md", ""),
            ("a.md", ""),
            ("sub/c.md", ""),
            ("image.png", ""),
            (".obsidian/workspace.md", ""),
            (".hublink/config.toml", ""),
        ]);

        let notes = vault.list_notes(VAULT_ROOT).unwrap();
        let paths: Vec<_> = notes.iter().map(|n| n.path.as_str()).collect();
        assert_eq!(paths, vec!["a.md", "b.md", "sub/c.md"]);
    }

    #[test]
    fn list_subfolder() {
        let (_dir, vault) = vault_with(&[("a.md", ""), ("sub/c.md", ""), ("sub/deep/d.md", "")]);

        let notes = vault.list_notes("sub").unwrap();
        let paths: Vec<_> = notes.iter().map(|n| n.path.as_str()).collect();
        assert_eq!(paths, vec!["sub/c.md", "sub/deep/d.md"]);

        assert_eq!(vault.list_notes("/sub/").unwrap().len(), 2);
    }

    #[test]
    fn list_missing_folder() {
        let (_dir, vault) = vault_with(&[("a.md", "")]);
        assert!(matches!(
            vault.list_notes("nope"),
            Err(VaultError::NotFound(_))
        ));
    }

    #[cfg(unix)]
    #[test]
    fn unreadable_subfolder_is_skipped() {
        use std::os::unix::fs::PermissionsExt;

        let (dir, vault) = vault_with(&[("A.md", "#maths"), ("zz_locked/B.md", "#maths")]);
        let locked = dir.path().join("zz_locked");
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        let listed = vault.list_notes(VAULT_ROOT);
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        // Running as root bypasses the permission bits, so B.md may also show up
        let paths: Vec<_> = listed.unwrap().into_iter().map(|n| n.path).collect();
        assert_eq!(paths.first().map(String::as_str), Some("A.md"));
    }

    #[test]
    fn read_write_roundtrip() {
        let (dir, vault) = vault_with(&[("hub.md", "old")]);
        let hub = vault.resolve("hub.md").unwrap();

        vault.write(&hub, "new content").unwrap();
        assert_eq!(vault.read(&hub).unwrap(), "new content");
        assert!(!dir.path().join("hub.md.tmp").exists());
    }

    #[test]
    fn read_missing_note_fails() {
        let (_dir, vault) = vault_with(&[]);
        let ghost = NoteHandle::from_path("ghost.md");
        assert!(matches!(vault.read(&ghost), Err(VaultError::Read { .. })));
    }

    #[test]
    fn write_into_missing_folder_fails() {
        let (_dir, vault) = vault_with(&[]);
        let ghost = NoteHandle::from_path("missing/ghost.md");
        assert!(matches!(
            vault.write(&ghost, "x"),
            Err(VaultError::Write { .. })
        ));
    }

    #[test]
    fn resolve_existing_and_missing() {
        let (_dir, vault) = vault_with(&[("Hubs/MOC.md", "")]);
        assert_eq!(
            vault.resolve("Hubs/MOC.md").map(|h| h.basename),
            Some("MOC".to_string())
        );
        assert_eq!(
            vault.resolve("/Hubs/MOC.md").map(|h| h.path),
            Some("Hubs/MOC.md".to_string())
        );
        assert!(vault.resolve("Hubs/Other.md").is_none());
        assert!(vault.resolve("Hubs").is_none());
        assert!(vault.resolve("").is_none());
    }

    #[test]
    fn parent_segments_never_escape_the_root() {
        let (dir, _) = vault_with(&[("inner/MOC.md", ""), ("secret.md", "")]);
        let vault = FsVault::new(dir.path().join("inner"));

        assert_eq!(
            vault.full_path("../secret.md"),
            dir.path().join("inner").join("secret.md")
        );
        assert!(vault.resolve("../secret.md").is_none());
        assert_eq!(
            vault.resolve("../MOC.md").map(|h| h.path),
            Some("MOC.md".to_string())
        );
    }
}
