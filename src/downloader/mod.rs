pub mod models;
pub mod ytdlp;

use thiserror::Error;

pub use models::{DownloadOptions, DownloaderConfig, PostProcessor};
pub use ytdlp::YtDlp;

#[derive(Error, Debug)]
pub enum DownloaderError {
    #[error("{0} was not found; install it and make sure it is on PATH")]
    NotInstalled(String),

    #[error("Failed to run downloader: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Failed(String),
}

pub type Result<T> = std::result::Result<T, DownloaderError>;

/// Fetches one URL to disk. Calls block until the media is written.
pub trait Downloader: Send + Sync {
    fn download(&self, url: &str, options: &DownloadOptions) -> Result<()>;
}
