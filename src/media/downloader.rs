use super::error::DownloadError;
use crate::vault::VaultAdapter;
use async_trait::async_trait;
use std::path::PathBuf;

/// Where a download lands inside the vault.
#[derive(Debug, Clone)]
pub struct DownloadTarget {
    /// Vault-relative destination folder.
    pub folder: String,
    /// Derived artifact filename, extension included.
    pub filename: String,
    /// Absolute path handed to the external tool.
    pub output_path: PathBuf,
}

impl DownloadTarget {
    /// Vault-relative path the artifact is expected at.
    pub fn relative_path(&self) -> String {
        format!("{}/{}", self.folder, self.filename)
    }
}

#[async_trait]
pub trait Downloader: Send + Sync {
    /// Human-readable name of the downloader
    fn name(&self) -> &'static str;

    /// Fetch the media behind `url` into `target`, returning the
    /// vault-relative path of the artifact that actually materialized.
    async fn download(
        &self,
        url: &str,
        target: &DownloadTarget,
        vault: &dyn VaultAdapter,
    ) -> Result<String, DownloadError>;
}
