use super::VaultAdapter;
use std::io;
use std::path::{Path, PathBuf};

/// Create `folder` unless it is already there. The creation call is skipped
/// entirely for existing folders.
pub async fn ensure_folder(vault: &dyn VaultAdapter, folder: &str) -> io::Result<()> {
    let folder = folder.strip_suffix('/').unwrap_or(folder);
    if vault.exists(folder).await {
        return Ok(());
    }
    vault.mkdir(folder).await
}

/// Strip the vault root from an absolute path. Paths outside the root come
/// back unchanged.
pub fn to_vault_relative(path: &str, root: &str) -> String {
    let Some(stripped) = path.strip_prefix(root) else {
        return path.to_string();
    };
    let stripped = stripped.strip_prefix('/').unwrap_or(stripped);
    stripped.replace('\\', "/")
}

/// Join a vault-relative path onto the root.
pub fn to_vault_absolute(path: &str, root: &str) -> String {
    let cleaned = path.strip_prefix('/').unwrap_or(path).replace('\\', "/");
    format!("{}/{}", root.trim_end_matches('/'), cleaned)
}

/// Walk up from `start` looking for the directory holding an `.obsidian`
/// marker folder.
pub fn discover_root(start: &Path) -> Option<PathBuf> {
    let mut current = Some(start);
    while let Some(dir) = current {
        if dir.join(".obsidian").is_dir() {
            return Some(dir.to_path_buf());
        }
        current = dir.parent();
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vault::Listing;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct RecordingVault {
        existing: Vec<String>,
        mkdir_calls: Mutex<Vec<String>>,
    }

    impl RecordingVault {
        fn new(existing: &[&str]) -> Self {
            Self {
                existing: existing.iter().map(|s| s.to_string()).collect(),
                mkdir_calls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl VaultAdapter for RecordingVault {
        async fn exists(&self, path: &str) -> bool {
            self.existing.iter().any(|p| p == path)
        }

        async fn mkdir(&self, path: &str) -> io::Result<()> {
            self.mkdir_calls.lock().unwrap().push(path.to_string());
            Ok(())
        }

        async fn list(&self, _folder: &str) -> io::Result<Listing> {
            Ok(Listing::default())
        }

        fn base_path(&self) -> Option<&Path> {
            None
        }
    }

    #[tokio::test]
    async fn test_ensure_folder_skips_mkdir_when_present() {
        let vault = RecordingVault::new(&["Instagram Reels"]);
        ensure_folder(&vault, "Instagram Reels").await.unwrap();
        assert!(vault.mkdir_calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_ensure_folder_creates_when_absent() {
        let vault = RecordingVault::new(&[]);
        ensure_folder(&vault, "Clips/").await.unwrap();
        assert_eq!(*vault.mkdir_calls.lock().unwrap(), vec!["Clips"]);
    }

    #[test]
    fn test_to_vault_relative_strips_root_and_slash() {
        assert_eq!(
            to_vault_relative("/vault/Clips/a.mp4", "/vault"),
            "Clips/a.mp4"
        );
    }

    #[test]
    fn test_to_vault_relative_outside_root_unchanged() {
        assert_eq!(to_vault_relative("Clips/a.mp4", "/vault"), "Clips/a.mp4");
        assert_eq!(to_vault_relative("/other/a.mp4", "/vault"), "/other/a.mp4");
    }

    #[test]
    fn test_to_vault_relative_normalizes_backslashes() {
        assert_eq!(
            to_vault_relative("/vault/Clips\\a.mp4", "/vault"),
            "Clips/a.mp4"
        );
    }

    #[test]
    fn test_to_vault_absolute() {
        assert_eq!(
            to_vault_absolute("Clips/a.mp4", "/vault"),
            "/vault/Clips/a.mp4"
        );
        assert_eq!(
            to_vault_absolute("/Clips/a.mp4", "/vault/"),
            "/vault/Clips/a.mp4"
        );
    }

    #[test]
    fn test_discover_root_walks_up() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join(".obsidian")).unwrap();
        std::fs::create_dir_all(dir.path().join("notes/daily")).unwrap();

        let root = discover_root(&dir.path().join("notes/daily")).unwrap();
        assert_eq!(root, dir.path());
    }

    #[test]
    fn test_discover_root_none_without_marker() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(discover_root(dir.path()), None);
    }
}
