use std::path::PathBuf;

use iced::{
    alignment,
    widget::{button, checkbox, column, pick_list, progress_bar, row, text, text_input, Column, Space},
    Element, Length,
};

use crate::domain::{DownloadRequest, OutputConfiguration, RunStatus};

pub const MIN_LINKS: u8 = 1;
pub const MAX_LINKS: u8 = 5;

const LINK_COUNTS: [u8; 5] = [1, 2, 3, 4, 5];
const SPINNER_STEP: f32 = 0.02;

/// One input row of the form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkRow {
    pub url: String,
    pub convert_to_audio: bool,
}

/// Main view state
pub struct DownloadView {
    pub selected_count: u8,
    pub rows: Vec<LinkRow>,
    pub output_directory: String,
    pub status: RunStatus,
    spinner_phase: f32,
}

impl Default for DownloadView {
    fn default() -> Self {
        Self {
            selected_count: MIN_LINKS,
            rows: Vec::new(),
            output_directory: OutputConfiguration::default()
                .directory
                .display()
                .to_string(),
            status: RunStatus::default(),
            spinner_phase: 0.0,
        }
    }
}

#[derive(Debug, Clone)]
pub enum DownloadMessage {
    LinkCountSelected(u8),
    ConfirmPressed,
    UrlChanged(usize, String),
    ConvertToggled(usize, bool),
    OutputDirectoryChanged(String),
    ChooseDirectoryPressed,
    StartPressed,
}

impl DownloadView {
    pub fn update(&mut self, message: DownloadMessage) {
        match message {
            DownloadMessage::LinkCountSelected(count) => {
                self.selected_count = count;
            }
            DownloadMessage::ConfirmPressed => {
                self.set_link_count(self.selected_count);
            }
            DownloadMessage::UrlChanged(index, url) => {
                if let Some(row) = self.rows.get_mut(index) {
                    row.url = url;
                }
            }
            DownloadMessage::ConvertToggled(index, checked) => {
                if let Some(row) = self.rows.get_mut(index) {
                    row.convert_to_audio = checked;
                }
            }
            DownloadMessage::OutputDirectoryChanged(directory) => {
                self.output_directory = directory;
            }
            DownloadMessage::ChooseDirectoryPressed | DownloadMessage::StartPressed => {
                // Will be handled by the app
            }
        }
    }

    /// Replaces the rows with `count` empty ones, clamped to 1..=5.
    pub fn set_link_count(&mut self, count: u8) {
        let count = count.clamp(MIN_LINKS, MAX_LINKS);
        self.selected_count = count;
        self.rows = vec![LinkRow::default(); count as usize];
    }

    pub fn set_output_directory(&mut self, directory: PathBuf) {
        self.output_directory = directory.display().to_string();
    }

    pub fn output_configuration(&self) -> OutputConfiguration {
        OutputConfiguration {
            directory: PathBuf::from(self.output_directory.trim()),
        }
    }

    /// Non-empty links in entry order, read from the fields as they are now.
    pub fn collect_requests(&self) -> Vec<DownloadRequest> {
        self.rows
            .iter()
            .filter_map(|row| {
                let url = row.url.trim();
                (!url.is_empty()).then(|| DownloadRequest {
                    url: url.to_string(),
                    convert_to_audio: row.convert_to_audio,
                })
            })
            .collect()
    }

    pub fn advance_spinner(&mut self) {
        self.spinner_phase = (self.spinner_phase + SPINNER_STEP) % 1.0;
    }

    fn spinner_value(&self) -> f32 {
        // Triangle wave so the bar sweeps back and forth.
        if self.spinner_phase < 0.5 {
            self.spinner_phase * 2.0
        } else {
            2.0 - self.spinner_phase * 2.0
        }
    }

    fn link_row(&self, index: usize, link: &LinkRow) -> Element<'_, DownloadMessage> {
        row![
            text(format!("Link {}:", index + 1)).size(14),
            text_input("Paste a video link...", &link.url)
                .on_input(move |url| DownloadMessage::UrlChanged(index, url))
                .padding(8)
                .width(Length::Fixed(360.0)),
            checkbox(link.convert_to_audio)
                .on_toggle(move |checked| DownloadMessage::ConvertToggled(index, checked)),
            text("Convert to MP3").size(14),
        ]
        .spacing(10)
        .align_y(alignment::Vertical::Center)
        .into()
    }

    pub fn view(&self) -> Element<'_, DownloadMessage> {
        let links = Column::with_children(
            self.rows
                .iter()
                .enumerate()
                .map(|(index, link)| self.link_row(index, link)),
        )
        .spacing(10);

        let start: Element<'_, DownloadMessage> = if self.rows.is_empty() {
            Space::new().height(Length::Fixed(0.0)).into()
        } else {
            button("Start download")
                .on_press(DownloadMessage::StartPressed)
                .padding([10, 20])
                .into()
        };

        let spinner: Element<'_, DownloadMessage> = if self.status.is_running() {
            progress_bar(0.0..=1.0, self.spinner_value()).into()
        } else {
            Space::new().height(Length::Fixed(0.0)).into()
        };

        column![
            text("Video Downloader").size(32),
            Space::new().height(Length::Fixed(10.0)),
            text("How many links do you want to download? Maximum of 5").size(16),
            row![
                pick_list(
                    &LINK_COUNTS[..],
                    Some(self.selected_count),
                    DownloadMessage::LinkCountSelected
                ),
                button("Confirm")
                    .on_press(DownloadMessage::ConfirmPressed)
                    .padding([6, 16]),
            ]
            .spacing(10)
            .align_y(alignment::Vertical::Center),
            text("Folder to save downloads:").size(16),
            row![
                text_input("Output folder...", &self.output_directory)
                    .on_input(DownloadMessage::OutputDirectoryChanged)
                    .padding(8),
                button("Choose folder")
                    .on_press(DownloadMessage::ChooseDirectoryPressed)
                    .padding([6, 16]),
            ]
            .spacing(10)
            .align_y(alignment::Vertical::Center),
            links,
            start,
            spinner,
            Space::new().height(Length::Fill),
            text(&self.status.message).size(14),
        ]
        .padding(20)
        .spacing(10)
        .into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled_view(urls: &[&str]) -> DownloadView {
        let mut view = DownloadView::default();
        view.set_link_count(urls.len() as u8);
        for (index, url) in urls.iter().enumerate() {
            view.update(DownloadMessage::UrlChanged(index, url.to_string()));
        }
        view
    }

    #[test]
    fn test_set_link_count_discards_entries() {
        for count in MIN_LINKS..=MAX_LINKS {
            let mut view = filled_view(&["old", "old"]);
            view.update(DownloadMessage::ConvertToggled(0, true));

            view.set_link_count(count);

            assert_eq!(view.rows.len(), count as usize);
            assert!(view.rows.iter().all(|row| *row == LinkRow::default()));
        }
    }

    #[test]
    fn test_set_link_count_is_clamped() {
        let mut view = DownloadView::default();
        view.set_link_count(0);
        assert_eq!(view.rows.len(), 1);
        view.set_link_count(9);
        assert_eq!(view.rows.len(), 5);
        assert_eq!(view.selected_count, 5);
    }

    #[test]
    fn test_confirm_applies_selected_count() {
        let mut view = DownloadView::default();
        assert!(view.rows.is_empty());

        view.update(DownloadMessage::LinkCountSelected(3));
        assert!(view.rows.is_empty());
        view.update(DownloadMessage::ConfirmPressed);
        assert_eq!(view.rows.len(), 3);
    }

    #[test]
    fn test_collect_requests_trims_and_skips_empty() {
        let mut view = filled_view(&["A", "", "B  ", "   "]);
        view.update(DownloadMessage::ConvertToggled(2, true));

        assert_eq!(
            view.collect_requests(),
            vec![
                DownloadRequest {
                    url: "A".to_string(),
                    convert_to_audio: false,
                },
                DownloadRequest {
                    url: "B".to_string(),
                    convert_to_audio: true,
                },
            ]
        );
    }

    #[test]
    fn test_collect_requests_reads_current_values() {
        let mut view = filled_view(&["A"]);
        assert_eq!(view.collect_requests()[0].url, "A");

        view.update(DownloadMessage::UrlChanged(0, "C".to_string()));
        assert_eq!(view.collect_requests()[0].url, "C");
    }

    #[test]
    fn test_stale_row_messages_are_ignored() {
        let mut view = filled_view(&["A"]);
        view.update(DownloadMessage::UrlChanged(4, "X".to_string()));
        view.update(DownloadMessage::ConvertToggled(4, true));
        assert_eq!(view.rows.len(), 1);
        assert_eq!(view.rows[0].url, "A");
    }

    #[test]
    fn test_output_directory_changes() {
        let mut view = DownloadView::default();
        view.set_output_directory(PathBuf::from("/tmp/media"));
        assert_eq!(
            view.output_configuration().directory,
            PathBuf::from("/tmp/media")
        );

        view.update(DownloadMessage::OutputDirectoryChanged(" typed ".to_string()));
        assert_eq!(view.output_configuration().directory, PathBuf::from("typed"));
    }

    #[test]
    fn test_spinner_stays_in_range() {
        let mut view = DownloadView::default();
        for _ in 0..200 {
            view.advance_spinner();
            let value = view.spinner_value();
            assert!((0.0..=1.0).contains(&value));
        }
    }
}
