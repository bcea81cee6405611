mod path;

pub use path::{discover_root, ensure_folder, to_vault_absolute, to_vault_relative};

use async_trait::async_trait;
use std::collections::VecDeque;
use std::io;
use std::path::{Path, PathBuf};

/// Contents of one vault folder. Entries are vault-relative paths with
/// forward slashes, sorted.
#[derive(Debug, Default, Clone)]
pub struct Listing {
    pub files: Vec<String>,
    pub folders: Vec<String>,
}

#[async_trait]
pub trait VaultAdapter: Send + Sync {
    /// True when the vault-relative `path` exists.
    async fn exists(&self, path: &str) -> bool;

    /// Create the vault-relative folder `path`, intermediate segments included.
    async fn mkdir(&self, path: &str) -> io::Result<()>;

    /// List one folder, non-recursive.
    async fn list(&self, folder: &str) -> io::Result<Listing>;

    /// Absolute base path for local backends, `None` otherwise.
    fn base_path(&self) -> Option<&Path>;
}

/// Vault backed by a local directory, the only backend shipped.
pub struct LocalVault {
    root: PathBuf,
}

impl LocalVault {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn absolute(&self, relative: &str) -> PathBuf {
        let trimmed = relative.trim_start_matches('/');
        if trimmed.is_empty() {
            self.root.clone()
        } else {
            self.root.join(trimmed)
        }
    }
}

#[async_trait]
impl VaultAdapter for LocalVault {
    async fn exists(&self, path: &str) -> bool {
        tokio::fs::try_exists(self.absolute(path)).await.unwrap_or(false)
    }

    async fn mkdir(&self, path: &str) -> io::Result<()> {
        tokio::fs::create_dir_all(self.absolute(path)).await
    }

    async fn list(&self, folder: &str) -> io::Result<Listing> {
        let prefix = folder.trim_matches('/');
        let mut listing = Listing::default();
        let mut entries = tokio::fs::read_dir(self.absolute(folder)).await?;
        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name().to_string_lossy().into_owned();
            let relative = if prefix.is_empty() {
                name
            } else {
                format!("{}/{}", prefix, name)
            };
            if entry.file_type().await?.is_dir() {
                listing.folders.push(relative);
            } else {
                listing.files.push(relative);
            }
        }
        listing.files.sort();
        listing.folders.sort();
        Ok(listing)
    }

    fn base_path(&self) -> Option<&Path> {
        Some(&self.root)
    }
}

/// Every folder of the vault, recursive, sorted, the root (empty string)
/// first. Dot-folders and their subtrees are skipped.
pub async fn all_folders(vault: &dyn VaultAdapter) -> io::Result<Vec<String>> {
    let mut found = vec![String::new()];
    let mut queue = VecDeque::from([String::new()]);

    while let Some(folder) = queue.pop_front() {
        let listing = vault.list(&folder).await?;
        for sub in listing.folders {
            let name = sub.rsplit('/').next().unwrap_or(&sub);
            if name.starts_with('.') {
                continue;
            }
            found.push(sub.clone());
            queue.push_back(sub);
        }
    }

    found.sort();
    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_local_vault_exists_and_mkdir() {
        let dir = tempfile::tempdir().unwrap();
        let vault = LocalVault::new(dir.path());

        assert!(!vault.exists("Clips").await);
        vault.mkdir("Clips/Nested").await.unwrap();
        assert!(vault.exists("Clips").await);
        assert!(vault.exists("Clips/Nested").await);
        assert!(dir.path().join("Clips/Nested").is_dir());
    }

    #[tokio::test]
    async fn test_list_returns_vault_relative_paths() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("Clips/Old")).unwrap();
        std::fs::write(dir.path().join("Clips/b.mp4"), b"x").unwrap();
        std::fs::write(dir.path().join("Clips/a.mp4"), b"x").unwrap();

        let vault = LocalVault::new(dir.path());
        let listing = vault.list("Clips").await.unwrap();

        assert_eq!(listing.files, vec!["Clips/a.mp4", "Clips/b.mp4"]);
        assert_eq!(listing.folders, vec!["Clips/Old"]);
    }

    #[tokio::test]
    async fn test_list_root_uses_bare_names() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("note.md"), b"x").unwrap();

        let vault = LocalVault::new(dir.path());
        let listing = vault.list("").await.unwrap();

        assert_eq!(listing.files, vec!["note.md"]);
    }

    #[tokio::test]
    async fn test_all_folders_recursive_sorted_root_first() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("b/inner")).unwrap();
        std::fs::create_dir_all(dir.path().join("a")).unwrap();
        std::fs::create_dir_all(dir.path().join(".obsidian/plugins")).unwrap();

        let vault = LocalVault::new(dir.path());
        let folders = all_folders(&vault).await.unwrap();

        assert_eq!(folders, vec!["", "a", "b", "b/inner"]);
    }

    #[test]
    fn test_base_path() {
        let vault = LocalVault::new("/tmp/vault");
        assert_eq!(vault.base_path(), Some(Path::new("/tmp/vault")));
    }
}
