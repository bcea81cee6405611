use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

/// Well-known install locations, checked after PATH resolution. Homebrew
/// directories come first since GUI-launched editors often miss them in PATH.
const FIXED_CANDIDATES: &[&str] = &[
    "/opt/homebrew/bin/yt-dlp",
    "/usr/local/bin/yt-dlp",
    "/usr/bin/yt-dlp",
];

/// Resolves the yt-dlp executable: PATH lookup first, then the fixed
/// candidates, then the bare command name.
pub async fn locate_ytdlp() -> Option<PathBuf> {
    locate_from(resolve_in_path().await).await
}

/// `path_hit` holds the PATH resolution result, split out so the candidate
/// ordering can be exercised without a real lookup.
async fn locate_from(path_hit: Option<PathBuf>) -> Option<PathBuf> {
    if let Some(path) = path_hit {
        if path.exists() {
            debug!("Found yt-dlp in PATH at {}", path.display());
            return Some(path);
        }
    }

    for candidate in FIXED_CANDIDATES {
        let path = PathBuf::from(candidate);
        if path.exists() && version_probe(&path).await {
            debug!("Found yt-dlp at {}", path.display());
            return Some(path);
        }
    }

    let bare = PathBuf::from("yt-dlp");
    if version_probe(&bare).await {
        return Some(bare);
    }

    None
}

async fn resolve_in_path() -> Option<PathBuf> {
    let finder = if cfg!(windows) { "where" } else { "which" };
    let output = Command::new(finder).arg("yt-dlp").output().await.ok()?;
    if !output.status.success() {
        return None;
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let first = stdout.lines().next()?.trim();
    if first.is_empty() {
        None
    } else {
        Some(PathBuf::from(first))
    }
}

async fn version_probe(path: &Path) -> bool {
    Command::new(path)
        .arg("--version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .await
        .map(|s| s.success())
        .unwrap_or(false)
}

/// Version string for diagnostics.
pub async fn ytdlp_version(path: &Path) -> Result<String> {
    let output = Command::new(path)
        .arg("--version")
        .output()
        .await
        .context("Failed to run yt-dlp --version")?;

    if !output.status.success() {
        return Err(anyhow::anyhow!(
            "yt-dlp --version failed with status {}",
            output.status
        ));
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}
