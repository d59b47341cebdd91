//! # vellum-vault
//!
//! File system operations for Vellum vaults.
//!
//! The vault is the authoritative source of truth: a directory tree of
//! markdown documents plus a handful of root-level configuration files.
//! This crate is the storage collaborator for every engine — sandboxed
//! path resolution, read/write/append, and deterministic listings. No
//! content is cached; every operation reads fresh from disk.

pub mod paths;

use std::fs;
use std::path::{Component, Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use vellum_core::{Result, VellumError};

/// Files larger than this are refused by [`Vault::read`]; vault documents
/// are small text files and anything bigger is not one of ours.
pub const MAX_READ_BYTES: u64 = 250_000;

/// Root-level configuration files included in search scope when present.
const COMPOSE_FILES: &[&str] = &["docker-compose.yml", "docker-compose.yaml"];

const CONFIG_EXTENSIONS: &[&str] = &["yml", "yaml", "json"];

/// Handle on a vault directory. All operations take vault-relative paths
/// and reject any path that would escape the root.
#[derive(Debug, Clone)]
pub struct Vault {
    root: PathBuf,
}

impl Vault {
    /// Open a vault rooted at `root`.
    ///
    /// # Errors
    ///
    /// Returns [`VellumError::Io`] if the root does not exist or is not a
    /// directory.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        if !root.is_dir() {
            return Err(VellumError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("vault root is not a directory: {}", root.display()),
            )));
        }
        Ok(Self { root })
    }

    /// The vault root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a vault-relative path, rejecting absolute paths and any
    /// `..` component before touching the filesystem.
    fn resolve(&self, rel: &str) -> Result<PathBuf> {
        let rel_path = Path::new(rel);
        if rel_path.is_absolute() {
            return Err(VellumError::PathEscape(rel.to_string()));
        }
        for component in rel_path.components() {
            if matches!(component, Component::ParentDir) {
                return Err(VellumError::PathEscape(rel.to_string()));
            }
        }
        Ok(self.root.join(rel_path))
    }

    /// Read a document. Absent files are `None`, not an error; every
    /// parsing routine treats them as empty text.
    ///
    /// # Errors
    ///
    /// Returns [`VellumError::PathEscape`] for paths leaving the root and
    /// [`VellumError::FileTooLarge`] for files above [`MAX_READ_BYTES`].
    pub fn read(&self, rel: &str) -> Result<Option<String>> {
        let abs = self.resolve(rel)?;
        let metadata = match fs::metadata(&abs) {
            Ok(m) => m,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        if !metadata.is_file() {
            return Ok(None);
        }
        if metadata.len() > MAX_READ_BYTES {
            return Err(VellumError::FileTooLarge {
                path: rel.to_string(),
                size: metadata.len(),
                max: MAX_READ_BYTES,
            });
        }
        Ok(Some(fs::read_to_string(&abs)?))
    }

    /// Whether a document exists.
    pub fn exists(&self, rel: &str) -> Result<bool> {
        Ok(self.resolve(rel)?.is_file())
    }

    /// Write a document, creating parent directories and replacing any
    /// prior content.
    pub fn write(&self, rel: &str, content: &str) -> Result<()> {
        let abs = self.resolve(rel)?;
        if let Some(parent) = abs.parent() {
            fs::create_dir_all(parent)?;
        }
        debug!(path = rel, bytes = content.len(), "vault write");
        fs::write(&abs, content)?;
        Ok(())
    }

    /// Append to a document, creating it (and parents) if absent.
    pub fn append(&self, rel: &str, content: &str) -> Result<()> {
        let abs = self.resolve(rel)?;
        if let Some(parent) = abs.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut combined = match fs::read_to_string(&abs) {
            Ok(existing) => existing,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
            Err(e) => return Err(e.into()),
        };
        combined.push_str(content);
        debug!(path = rel, bytes = content.len(), "vault append");
        fs::write(&abs, combined)?;
        Ok(())
    }

    /// Names of the top-level directories in the vault, sorted.
    pub fn list_directories(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        names.sort();
        Ok(names)
    }

    /// All markdown files under the root, as sorted vault-relative paths
    /// with forward slashes. Deterministic order keeps scans and reports
    /// reproducible.
    pub fn list_markdown_files(&self) -> Result<Vec<String>> {
        let mut files = Vec::new();
        for entry in WalkDir::new(&self.root)
            .sort_by_file_name()
            .into_iter()
            .filter_map(std::result::Result::ok)
        {
            if !entry.file_type().is_file() {
                continue;
            }
            let is_md = entry
                .path()
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case("md"));
            if !is_md {
                continue;
            }
            if let Ok(rel) = entry.path().strip_prefix(&self.root) {
                files.push(normalize(rel));
            }
        }
        files.sort();
        Ok(files)
    }

    /// Root-level configuration-like files: compose files plus every
    /// `*.yml`/`*.yaml`/`*.json` directly under the root. Sorted and
    /// deduplicated.
    pub fn list_root_config_files(&self) -> Result<Vec<String>> {
        let mut files = Vec::new();
        for name in COMPOSE_FILES {
            if self.root.join(name).is_file() {
                files.push((*name).to_string());
            }
        }
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            let matches_ext = Path::new(&name)
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| {
                    CONFIG_EXTENSIONS
                        .iter()
                        .any(|allowed| e.eq_ignore_ascii_case(allowed))
                });
            if matches_ext {
                files.push(name);
            }
        }
        files.sort();
        files.dedup();
        Ok(files)
    }
}

fn normalize(rel: &Path) -> String {
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn vault_with(files: &[(&str, &str)]) -> (TempDir, Vault) {
        let dir = TempDir::new().unwrap();
        for (rel, content) in files {
            let abs = dir.path().join(rel);
            fs::create_dir_all(abs.parent().unwrap()).unwrap();
            fs::write(abs, content).unwrap();
        }
        let vault = Vault::open(dir.path()).unwrap();
        (dir, vault)
    }

    #[test]
    fn read_absent_file_is_none() {
        let (_dir, vault) = vault_with(&[]);
        assert!(vault.read("planning/missing.md").unwrap().is_none());
    }

    #[test]
    fn read_returns_content() {
        let (_dir, vault) = vault_with(&[("planning/now.md", "# Now\n")]);
        assert_eq!(vault.read("planning/now.md").unwrap().unwrap(), "# Now\n");
    }

    #[test]
    fn read_rejects_oversize_files() {
        let big = "x".repeat((MAX_READ_BYTES + 1) as usize);
        let (_dir, vault) = vault_with(&[("big.md", &big)]);
        let err = vault.read("big.md").unwrap_err();
        assert!(matches!(err, VellumError::FileTooLarge { .. }));
    }

    #[test]
    fn paths_escaping_root_are_rejected() {
        let (_dir, vault) = vault_with(&[]);
        assert!(matches!(
            vault.read("../outside.md").unwrap_err(),
            VellumError::PathEscape(_)
        ));
        assert!(matches!(
            vault.write("a/../../outside.md", "x").unwrap_err(),
            VellumError::PathEscape(_)
        ));
        assert!(matches!(
            vault.read("/etc/hostname").unwrap_err(),
            VellumError::PathEscape(_)
        ));
    }

    #[test]
    fn write_overwrites_and_creates_parents() {
        let (_dir, vault) = vault_with(&[]);
        vault.write("system/triage.md", "first").unwrap();
        vault.write("system/triage.md", "second").unwrap();
        assert_eq!(vault.read("system/triage.md").unwrap().unwrap(), "second");
    }

    #[test]
    fn append_preserves_existing_content() {
        let (_dir, vault) = vault_with(&[]);
        vault.append("system/maintenance.md", "# Log\n").unwrap();
        vault.append("system/maintenance.md", "entry\n").unwrap();
        assert_eq!(
            vault.read("system/maintenance.md").unwrap().unwrap(),
            "# Log\nentry\n"
        );
    }

    #[test]
    fn list_directories_returns_top_level_only() {
        let (_dir, vault) = vault_with(&[
            ("planning/now.md", ""),
            ("architecture/deep/nested.md", ""),
            ("root-note.md", ""),
        ]);
        assert_eq!(
            vault.list_directories().unwrap(),
            vec!["architecture", "planning"]
        );
    }

    #[test]
    fn list_markdown_files_is_recursive_and_sorted() {
        let (_dir, vault) = vault_with(&[
            ("planning/now.md", ""),
            ("architecture/ARCHITECTURE.md", ""),
            ("notes.txt", "not markdown"),
        ]);
        assert_eq!(
            vault.list_markdown_files().unwrap(),
            vec!["architecture/ARCHITECTURE.md", "planning/now.md"]
        );
    }

    #[test]
    fn list_root_config_files_picks_up_compose_and_extensions() {
        let (_dir, vault) = vault_with(&[
            ("docker-compose.yml", ""),
            ("settings.json", ""),
            ("planning/nested.json", ""),
        ]);
        assert_eq!(
            vault.list_root_config_files().unwrap(),
            vec!["docker-compose.yml", "settings.json"]
        );
    }
}
