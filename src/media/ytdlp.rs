use super::downloader::{DownloadTarget, Downloader};
use super::error::{classify_ytdlp_failure, DownloadError};
use super::locate;
use crate::vault::VaultAdapter;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, info, warn};

/// Fixed wall-clock limit for one download.
const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(300);

pub struct YtDlpDownloader {
    executable: Option<PathBuf>,
    timeout: Duration,
}

impl YtDlpDownloader {
    /// Resolves the executable lazily, on first download.
    pub fn new() -> Self {
        Self {
            executable: None,
            timeout: DOWNLOAD_TIMEOUT,
        }
    }

    /// Pins the executable, skipping resolution.
    #[cfg(test)]
    pub fn with_executable(path: PathBuf) -> Self {
        Self {
            executable: Some(path),
            timeout: DOWNLOAD_TIMEOUT,
        }
    }

    /// Pins the executable and shrinks the time limit.
    #[cfg(test)]
    pub fn with_timeout(path: PathBuf, timeout: Duration) -> Self {
        Self {
            executable: Some(path),
            timeout,
        }
    }

    async fn run(
        &self,
        executable: &Path,
        url: &str,
        output_path: &Path,
    ) -> Result<std::process::Output, DownloadError> {
        debug!("Running {} for {}", executable.display(), url);

        let result = tokio::time::timeout(
            self.timeout,
            Command::new(executable)
                .arg("-f")
                .arg("best[ext=mp4]/best")
                .arg("-o")
                .arg(output_path)
                .arg(url)
                .kill_on_drop(true)
                .output(),
        )
        .await;

        match result {
            Err(_) => Err(DownloadError::Timeout),
            Ok(Err(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(DownloadError::CommandNotFound)
            }
            Ok(Err(e)) => Err(DownloadError::Failed(e.to_string())),
            Ok(Ok(output)) => Ok(output),
        }
    }
}

#[async_trait]
impl Downloader for YtDlpDownloader {
    fn name(&self) -> &'static str {
        "yt-dlp"
    }

    async fn download(
        &self,
        url: &str,
        target: &DownloadTarget,
        vault: &dyn VaultAdapter,
    ) -> Result<String, DownloadError> {
        let executable = match &self.executable {
            Some(path) => path.clone(),
            None => locate::locate_ytdlp()
                .await
                .ok_or(DownloadError::NotInstalled)?,
        };

        info!("Downloading {} to {}", url, target.output_path.display());
        let output = self.run(&executable, url, &target.output_path).await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            warn!("yt-dlp failed with {}: {}", output.status, stderr.trim());
            return Err(classify_ytdlp_failure(output.status.code(), &stderr));
        }

        let expected = match vault.base_path() {
            Some(root) => crate::vault::to_vault_relative(
                &target.output_path.to_string_lossy(),
                &root.to_string_lossy(),
            ),
            None => target.relative_path(),
        };
        confirm_artifact(vault, &expected, target).await
    }
}

/// yt-dlp occasionally renames its output. Accept the expected path, or any
/// file in the destination folder whose name carries the derived stem.
pub async fn confirm_artifact(
    vault: &dyn VaultAdapter,
    expected: &str,
    target: &DownloadTarget,
) -> Result<String, DownloadError> {
    if vault.exists(expected).await {
        return Ok(expected.to_string());
    }

    let stem = target
        .filename
        .strip_suffix(".mp4")
        .unwrap_or(&target.filename);
    let listing = vault
        .list(&target.folder)
        .await
        .map_err(|e| DownloadError::Failed(e.to_string()))?;
    if let Some(found) = listing.files.iter().find(|f| f.contains(stem)) {
        debug!("Expected {} missing, matched {} instead", expected, found);
        return Ok(found.clone());
    }

    Err(DownloadError::MissingArtifact)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vault::LocalVault;

    fn target_in(dir: &Path, folder: &str, filename: &str) -> DownloadTarget {
        DownloadTarget {
            folder: folder.to_string(),
            filename: filename.to_string(),
            output_path: dir.join(folder).join(filename),
        }
    }

    #[tokio::test]
    async fn test_confirm_artifact_expected_path() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("Clips")).unwrap();
        std::fs::write(dir.path().join("Clips/XYZ999.mp4"), b"video").unwrap();

        let vault = LocalVault::new(dir.path());
        let target = target_in(dir.path(), "Clips", "XYZ999.mp4");
        let found = confirm_artifact(&vault, "Clips/XYZ999.mp4", &target)
            .await
            .unwrap();
        assert_eq!(found, "Clips/XYZ999.mp4");
    }

    #[tokio::test]
    async fn test_confirm_artifact_falls_back_to_stem_match() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("Clips")).unwrap();
        std::fs::write(dir.path().join("Clips/XYZ999.f137.mp4"), b"video").unwrap();

        let vault = LocalVault::new(dir.path());
        let target = target_in(dir.path(), "Clips", "XYZ999.mp4");
        let found = confirm_artifact(&vault, "Clips/XYZ999.mp4", &target)
            .await
            .unwrap();
        assert_eq!(found, "Clips/XYZ999.f137.mp4");
    }

    #[tokio::test]
    async fn test_confirm_artifact_missing() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("Clips")).unwrap();

        let vault = LocalVault::new(dir.path());
        let target = target_in(dir.path(), "Clips", "XYZ999.mp4");
        let err = confirm_artifact(&vault, "Clips/XYZ999.mp4", &target)
            .await
            .unwrap_err();
        assert_eq!(err, DownloadError::MissingArtifact);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_slow_run_times_out() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("yt-dlp");
        std::fs::write(&script, "#!/bin/sh\nsleep 5\n").unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        let vault = LocalVault::new(dir.path());
        let target = target_in(dir.path(), "Clips", "AAA.mp4");
        let downloader = YtDlpDownloader::with_timeout(script, Duration::from_millis(100));

        let err = downloader
            .download("https://instagram.com/reel/AAA", &target, &vault)
            .await
            .unwrap_err();
        assert_eq!(err, DownloadError::Timeout);
    }

    #[tokio::test]
    async fn test_vanished_executable_maps_to_command_not_found() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("Clips")).unwrap();

        let vault = LocalVault::new(dir.path());
        let target = target_in(dir.path(), "Clips", "AAA.mp4");
        let downloader =
            YtDlpDownloader::with_executable(PathBuf::from("/nonexistent/bin/yt-dlp"));

        let err = downloader
            .download("https://instagram.com/reel/AAA", &target, &vault)
            .await
            .unwrap_err();
        assert_eq!(err, DownloadError::CommandNotFound);
    }
}
