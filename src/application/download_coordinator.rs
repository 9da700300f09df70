use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use tokio::sync::mpsc::{self, UnboundedReceiver};
use tracing::{error, info, warn};

use crate::{
    domain::{AppError, DownloadRequest, OutputConfiguration, RunEvent, RunPlan},
    downloader::{DownloadOptions, Downloader, DownloaderConfig, PostProcessor},
};

/// Builds the downloader configuration for the request at 1-based `index`.
pub fn build_options(
    index: usize,
    request: &DownloadRequest,
    output: &OutputConfiguration,
    config: &DownloaderConfig,
) -> DownloadOptions {
    let mut post_processors = Vec::new();
    if request.convert_to_audio {
        post_processors.push(PostProcessor::ExtractAudio {
            codec: config.audio_codec.clone(),
            quality: config.audio_quality.clone(),
        });
    }

    DownloadOptions {
        format: config.format.clone(),
        output_template: output
            .directory
            .join(format!("video_{}_%(title)s.%(ext)s", index)),
        post_processors,
    }
}

/// Processes every request of `plan` in order, stopping at the first failure.
pub fn execute_run(
    downloader: &dyn Downloader,
    config: &DownloaderConfig,
    plan: &RunPlan,
    mut emit: impl FnMut(RunEvent),
) {
    debug_assert!(!plan.is_empty());
    let total = plan.len();
    info!(total, directory = %plan.output().directory.display(), "starting run");
    emit(RunEvent::Started { total });

    for (offset, request) in plan.requests().iter().enumerate() {
        let index = offset + 1;
        emit(RunEvent::Processing { index, total });

        let options = build_options(index, request, plan.output(), config);
        info!(index, total, url = %request.url, audio = request.convert_to_audio, "downloading");

        if let Err(e) = downloader.download(&request.url, &options) {
            error!(index, url = %request.url, "download failed: {}", e);
            emit(RunEvent::Failed {
                index,
                message: e.to_string(),
            });
            return;
        }
    }

    info!(total, "run completed");
    emit(RunEvent::Completed { total });
}

/// Clears the running flag when the worker exits, even by unwinding.
struct RunningGuard(Arc<AtomicBool>);

impl Drop for RunningGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

#[derive(Clone)]
pub struct DownloadCoordinator {
    downloader: Arc<dyn Downloader>,
    config: DownloaderConfig,
    running: Arc<AtomicBool>,
}

impl DownloadCoordinator {
    pub fn new(downloader: Arc<dyn Downloader>, config: DownloaderConfig) -> Self {
        Self {
            downloader,
            config,
            running: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Starts one background worker for `plan`.
    ///
    /// Returns the queue the worker reports on. The running flag is cleared
    /// before the terminal event is queued, so a caller that has seen it can
    /// start the next run right away.
    pub fn start_run(&self, plan: RunPlan) -> Result<UnboundedReceiver<RunEvent>, AppError> {
        if self
            .running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            warn!("run requested while another is in progress");
            return Err(AppError::RunInProgress);
        }
        let guard = RunningGuard(self.running.clone());
        let running = self.running.clone();

        let (tx, rx) = mpsc::unbounded_channel();
        let downloader = self.downloader.clone();
        let config = self.config.clone();

        thread::Builder::new()
            .name("download-worker".to_string())
            .spawn(move || {
                let _guard = guard;
                execute_run(downloader.as_ref(), &config, &plan, |event| {
                    if event.is_terminal() {
                        running.store(false, Ordering::Release);
                    }
                    // The receiver is gone only if the UI has shut down.
                    let _ = tx.send(event);
                });
            })
            .map_err(|e| AppError::Io(format!("Failed to start download worker: {}", e)))?;

        Ok(rx)
    }
}
