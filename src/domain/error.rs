use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AppError {
    #[error("You must provide at least one valid link.")]
    NoValidLinks,

    #[error("A download run is already in progress.")]
    RunInProgress,

    #[error("Error processing video {index}: {message}")]
    Download { index: usize, message: String },

    #[error("I/O error: {0}")]
    Io(String),
}
