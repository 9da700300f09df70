use std::path::PathBuf;

use super::AppError;

/// One user-specified link plus its audio-conversion flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRequest {
    pub url: String,
    pub convert_to_audio: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputConfiguration {
    pub directory: PathBuf,
}

impl Default for OutputConfiguration {
    fn default() -> Self {
        Self {
            directory: crate::utils::default_output_directory(),
        }
    }
}

/// Immutable snapshot of the form taken when a run starts.
///
/// The worker only ever sees this value, so edits made to the form while a
/// run is in flight never reach it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunPlan {
    requests: Vec<DownloadRequest>,
    output: OutputConfiguration,
}

impl RunPlan {
    pub fn new(
        requests: Vec<DownloadRequest>,
        output: OutputConfiguration,
    ) -> Result<Self, AppError> {
        if requests.is_empty() {
            return Err(AppError::NoValidLinks);
        }
        Ok(Self { requests, output })
    }

    pub fn requests(&self) -> &[DownloadRequest] {
        &self.requests
    }

    pub fn output(&self) -> &OutputConfiguration {
        &self.output
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    Idle,
    Running,
    Succeeded,
    Failed,
}

/// Messages sent from the download worker to the UI thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunEvent {
    Started { total: usize },
    /// `index` is 1-based.
    Processing { index: usize, total: usize },
    Completed { total: usize },
    Failed { index: usize, message: String },
}

impl RunEvent {
    pub fn is_terminal(&self) -> bool {
        matches!(self, RunEvent::Completed { .. } | RunEvent::Failed { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// A blocking dialog the UI should show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub body: String,
}

impl Notice {
    pub fn info(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            title: title.into(),
            body: body.into(),
        }
    }

    pub fn error(body: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            title: "Error".to_string(),
            body: body.into(),
        }
    }
}

impl From<&AppError> for Notice {
    fn from(error: &AppError) -> Self {
        Notice::error(error.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunStatus {
    pub phase: RunPhase,
    pub current_index: usize,
    pub total: usize,
    pub message: String,
    pub error: Option<String>,
}

impl Default for RunStatus {
    fn default() -> Self {
        Self {
            phase: RunPhase::Idle,
            current_index: 0,
            total: 0,
            message: "Status: Waiting for action...".to_string(),
            error: None,
        }
    }
}

impl RunStatus {
    pub fn is_running(&self) -> bool {
        self.phase == RunPhase::Running
    }

    /// Folds a worker event into the status. Terminal events return the
    /// dialog to show; the phase has already left `Running` by then.
    pub fn apply(&mut self, event: RunEvent) -> Option<Notice> {
        match event {
            RunEvent::Started { total } => {
                *self = Self {
                    phase: RunPhase::Running,
                    current_index: 0,
                    total,
                    message: "Status: Starting downloads...".to_string(),
                    error: None,
                };
                None
            }
            RunEvent::Processing { index, total } => {
                self.current_index = index;
                self.total = total;
                self.message = format!("Downloading video {}/{}...", index, total);
                None
            }
            RunEvent::Completed { total } => {
                self.phase = RunPhase::Succeeded;
                self.current_index = total;
                self.total = total;
                self.message = "Status: All downloads completed!".to_string();
                Some(Notice::info(
                    "Completed",
                    "All downloads completed successfully!",
                ))
            }
            RunEvent::Failed { index, message } => {
                let error = AppError::Download {
                    index,
                    message: message.clone(),
                };
                self.phase = RunPhase::Failed;
                self.current_index = index;
                self.message = "Status: Error during download.".to_string();
                self.error = Some(message);
                Some(Notice::from(&error))
            }
        }
    }
}
