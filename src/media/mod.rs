mod downloader;
mod error;
mod filename;
mod locate;
mod matcher;
mod ytdlp;

pub use downloader::{DownloadTarget, Downloader};
pub use error::DownloadError;
pub use filename::derive_filename;
pub use locate::{locate_ytdlp, ytdlp_version};
pub use matcher::{clean_url, find_url_at_cursor, is_supported_url, UrlMatch};
pub use ytdlp::YtDlpDownloader;
