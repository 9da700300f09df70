use crate::application::DownloadCoordinator;
use crate::domain::{Notice, NoticeLevel, RunEvent, RunPlan};
use crate::downloader::{Downloader, DownloaderConfig, YtDlp};
use crate::ui::{DownloadMessage, DownloadView};
use futures::Stream;
use iced::{window, Subscription, Task};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{info, warn};

const SPINNER_INTERVAL: Duration = Duration::from_millis(30);
const CLOSING_MESSAGE: &str = "Status: Closing once the current download finishes...";

pub struct DownloadApp {
    view: DownloadView,
    coordinator: DownloadCoordinator,
    // Set when the window was closed mid-run; we exit once the run ends.
    close_requested: bool,
}

impl Default for DownloadApp {
    fn default() -> Self {
        Self::new()
    }
}

impl DownloadApp {
    pub fn new() -> Self {
        let config = DownloaderConfig::default();
        Self::with_downloader(Arc::new(YtDlp::new(&config)), config)
    }

    pub fn with_downloader(downloader: Arc<dyn Downloader>, config: DownloaderConfig) -> Self {
        Self {
            view: DownloadView::default(),
            coordinator: DownloadCoordinator::new(downloader, config),
            close_requested: false,
        }
    }
}

#[derive(Debug, Clone)]
pub enum Message {
    UiMessage(DownloadMessage),
    /// Result of the folder picker, `None` when cancelled
    DirectorySelected(Option<PathBuf>),
    /// Drained from the worker's queue
    Run(RunEvent),
    SpinnerTick,
    CloseRequested,
    NoticeDismissed,
}

pub fn update(app: &mut DownloadApp, message: Message) -> Task<Message> {
    match message {
        Message::UiMessage(ui_msg) => {
            app.view.update(ui_msg.clone());

            match ui_msg {
                DownloadMessage::ChooseDirectoryPressed => {
                    return choose_directory(app.view.output_configuration().directory);
                }
                DownloadMessage::StartPressed => return start_run(app),
                _ => {}
            }
        }
        Message::DirectorySelected(selection) => {
            if let Some(directory) = selection {
                info!(directory = %directory.display(), "output directory selected");
                app.view.set_output_directory(directory);
            }
        }
        Message::Run(event) => {
            let finished = event.is_terminal();
            let notice = app.view.status.apply(event);

            if app.close_requested {
                if finished {
                    info!("run finished, closing");
                    return iced::exit();
                }
                app.view.status.message = CLOSING_MESSAGE.to_string();
            }
            if let Some(notice) = notice {
                return show_notice(notice);
            }
        }
        Message::SpinnerTick => {
            app.view.advance_spinner();
        }
        Message::CloseRequested => {
            if app.coordinator.is_running() || app.view.status.is_running() {
                info!("close requested during a run, deferring");
                app.close_requested = true;
                app.view.status.message = CLOSING_MESSAGE.to_string();
            } else {
                return iced::exit();
            }
        }
        Message::NoticeDismissed => {}
    }
    Task::none()
}

fn start_run(app: &mut DownloadApp) -> Task<Message> {
    if app.close_requested {
        return Task::none();
    }

    let plan = match RunPlan::new(
        app.view.collect_requests(),
        app.view.output_configuration(),
    ) {
        Ok(plan) => plan,
        Err(e) => {
            warn!("not starting run: {}", e);
            return show_notice(Notice::from(&e));
        }
    };

    match app.coordinator.start_run(plan) {
        Ok(events) => Task::stream(run_events(events)).map(Message::Run),
        Err(e) => show_notice(Notice::from(&e)),
    }
}

fn run_events(events: UnboundedReceiver<RunEvent>) -> impl Stream<Item = RunEvent> {
    futures::stream::unfold(events, |mut events| async move {
        events.recv().await.map(|event| (event, events))
    })
}

fn choose_directory(current: PathBuf) -> Task<Message> {
    Task::perform(
        async move {
            let mut dialog = rfd::AsyncFileDialog::new().set_title("Choose folder");
            if current.is_dir() {
                dialog = dialog.set_directory(&current);
            }
            dialog
                .pick_folder()
                .await
                .map(|handle| handle.path().to_path_buf())
        },
        Message::DirectorySelected,
    )
}

fn show_notice(notice: Notice) -> Task<Message> {
    let level = match notice.level {
        NoticeLevel::Info => rfd::MessageLevel::Info,
        NoticeLevel::Error => rfd::MessageLevel::Error,
    };

    Task::perform(
        async move {
            let _ = rfd::AsyncMessageDialog::new()
                .set_level(level)
                .set_title(notice.title)
                .set_description(notice.body)
                .set_buttons(rfd::MessageButtons::Ok)
                .show()
                .await;
        },
        |_| Message::NoticeDismissed,
    )
}

pub fn subscription(app: &DownloadApp) -> Subscription<Message> {
    let close_requests = window::close_requests().map(|_| Message::CloseRequested);

    if app.view.status.is_running() {
        Subscription::batch([
            close_requests,
            iced::time::every(SPINNER_INTERVAL).map(|_| Message::SpinnerTick),
        ])
    } else {
        close_requests
    }
}

pub fn view(app: &DownloadApp) -> iced::Element<'_, Message> {
    app.view.view().map(Message::UiMessage)
}
