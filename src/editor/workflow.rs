use super::{Cursor, Document};
use crate::config::Settings;
use crate::media::{self, DownloadError, DownloadTarget, Downloader, UrlMatch};
use crate::vault::{self, VaultAdapter};
use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::{info, warn};

/// Receives the user-facing notices the editor surfaces.
pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str);
}

/// Terminal state of one download-at-cursor action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The matched span was replaced and the note saved.
    Embedded { filename: String, artifact: String },
    /// Nothing under the cursor looked like a reel URL.
    NoUrl,
    /// A URL was matched but failed validation.
    RejectedUrl,
    /// The download or rewrite failed after validation; the note is untouched.
    Failed(String),
}

/// Runs the whole action: match, validate, download, rewrite. Every exit
/// surfaces exactly one final notice, and the note is only written after the
/// download fully succeeded.
pub async fn download_at_cursor(
    document: &mut Document,
    cursor: Cursor,
    settings: &Settings,
    vault: &dyn VaultAdapter,
    downloader: &dyn Downloader,
    notifier: &dyn Notifier,
) -> Outcome {
    let matched = document
        .line(cursor.line)
        .and_then(|line| media::find_url_at_cursor(line, cursor.ch));
    let Some(matched) = matched else {
        notifier.notify(&DownloadError::NoUrlAtCursor.to_string());
        return Outcome::NoUrl;
    };

    let url = media::clean_url(&matched.text);
    if !media::is_supported_url(&url) {
        notifier.notify(&DownloadError::InvalidUrl.to_string());
        return Outcome::RejectedUrl;
    }

    notifier.notify("Downloading reel...");

    match attempt(document, cursor, &matched, &url, settings, vault, downloader).await {
        Ok((filename, artifact)) => {
            notifier.notify("Reel downloaded successfully!");
            Outcome::Embedded { filename, artifact }
        }
        Err(e) => {
            warn!("Download of {} failed: {:#}", url, e);
            let message = format!("{:#}", e);
            notifier.notify(&format!("Error: {}", message));
            Outcome::Failed(message)
        }
    }
}

async fn attempt(
    document: &mut Document,
    cursor: Cursor,
    matched: &UrlMatch,
    url: &str,
    settings: &Settings,
    vault: &dyn VaultAdapter,
    downloader: &dyn Downloader,
) -> Result<(String, String)> {
    vault::ensure_folder(vault, settings.download_folder())
        .await
        .context("Failed to create download folder")?;

    let root = vault.base_path().ok_or(DownloadError::NoVaultRoot)?;
    let root = root.to_string_lossy().into_owned();

    let folder = settings.download_folder().to_string();
    let filename = media::derive_filename(url);
    let relative = format!("{}/{}", folder, filename);
    let target = DownloadTarget {
        folder,
        filename,
        output_path: PathBuf::from(vault::to_vault_absolute(&relative, &root)),
    };

    info!("Downloading {} with {}", url, downloader.name());
    let artifact = downloader.download(url, &target, vault).await?;

    let filename = artifact
        .rsplit('/')
        .next()
        .filter(|name| !name.is_empty())
        .or_else(|| artifact.rsplit('\\').next().filter(|name| !name.is_empty()))
        .unwrap_or(&artifact);
    if !filename.contains('.') {
        return Err(DownloadError::BadArtifactName.into());
    }

    document.replace_span(
        cursor.line,
        matched.start,
        matched.end,
        &format!("![[{}]]", filename),
    )?;
    document.save().await?;

    info!("Embedded {}", filename);
    Ok((filename.to_string(), artifact))
}
