use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use crossbeam_channel::Receiver;
use iced::widget::{button, column, container, pick_list, row, scrollable, text, toggler, Space};
use iced::{Element, Length, Subscription, Task, Theme};

use mediascribe_core::pipeline::transcribe_use_case::Phase;
use mediascribe_core::shared::media_type;
use mediascribe_core::shared::model_size::ModelSize;

use crate::settings::{Appearance, Settings};
use crate::theme;
use crate::workers::transcribe_worker::{self, TranscribeParams, WorkerMessage};

const POLL_INTERVAL: Duration = Duration::from_millis(100);

// ---------------------------------------------------------------------------
// Model dropdown entries
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelOption(pub ModelSize);

impl fmt::Display for ModelOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.0, self.0.memory_hint())
    }
}

// ---------------------------------------------------------------------------
// Message
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub enum Message {
    AddFiles,
    FilesSelected(Option<Vec<PathBuf>>),
    FileClicked(usize),
    RemoveSelected,
    SelectOutputDir,
    OutputDirSelected(Option<PathBuf>),
    ModelSelected(ModelOption),
    DarkModeToggled(bool),
    StartTranscription,
    PollWorker,
}

// ---------------------------------------------------------------------------
// Run state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
enum RunState {
    Idle,
    Preparing,
    Downloading(u64, u64),
    Processing {
        index: usize,
        total: usize,
        name: String,
        phase: Option<Phase>,
    },
}

struct Notice {
    message: String,
    error: bool,
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

pub struct App {
    settings: Settings,
    queue: Vec<PathBuf>,
    selected: Option<usize>,
    output_dir: Option<PathBuf>,
    run_state: RunState,
    worker_rx: Option<Receiver<WorkerMessage>>,
    notice: Option<Notice>,
}

impl App {
    pub fn new() -> (Self, Task<Message>) {
        (
            Self {
                settings: Settings::load(),
                queue: Vec::new(),
                selected: None,
                output_dir: None,
                run_state: RunState::Idle,
                worker_rx: None,
                notice: None,
            },
            Task::none(),
        )
    }

    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::AddFiles => {
                return Task::perform(
                    async {
                        rfd::AsyncFileDialog::new()
                            .set_title("Select Audio/Video Files")
                            .add_filter("Audio/Video Files", &["mp3", "mp4"])
                            .pick_files()
                            .await
                            .map(|handles| {
                                handles.iter().map(|h| h.path().to_path_buf()).collect()
                            })
                    },
                    Message::FilesSelected,
                );
            }
            Message::FilesSelected(Some(paths)) => {
                self.notice = None;
                for path in paths {
                    if !path.exists() {
                        self.show_error(format!("File does not exist:\n{}", path.display()));
                        continue;
                    }
                    if media_type::is_supported(&path) && !self.queue.contains(&path) {
                        self.queue.push(path);
                    }
                }
            }
            Message::FilesSelected(None) => {}
            Message::FileClicked(index) => {
                self.selected = if self.selected == Some(index) {
                    None
                } else {
                    Some(index)
                };
            }
            Message::RemoveSelected => {
                if let Some(index) = self.selected.take() {
                    if index < self.queue.len() {
                        self.queue.remove(index);
                    }
                }
            }
            Message::SelectOutputDir => {
                return Task::perform(
                    async {
                        rfd::AsyncFileDialog::new()
                            .set_title("Select Output Directory")
                            .pick_folder()
                            .await
                            .map(|h| h.path().to_path_buf())
                    },
                    Message::OutputDirSelected,
                );
            }
            Message::OutputDirSelected(Some(path)) => {
                self.output_dir = Some(path);
            }
            Message::OutputDirSelected(None) => {}
            Message::ModelSelected(option) => {
                self.settings.model_size = option.0.as_str().to_string();
                self.settings.save();
            }
            Message::DarkModeToggled(dark) => {
                self.settings.appearance = if dark {
                    Appearance::Dark
                } else {
                    Appearance::Light
                };
                self.settings.save();
            }
            Message::StartTranscription => {
                self.start_transcription();
            }
            Message::PollWorker => {
                self.drain_worker_messages();
            }
        }
        Task::none()
    }

    pub fn view(&self) -> Element<'_, Message> {
        let mut col = column![].spacing(10).padding(16);

        if let Some(ref notice) = self.notice {
            let label = text(notice.message.clone()).size(14);
            col = col.push(if notice.error {
                label.style(text::danger)
            } else {
                label.style(text::success)
            });
        }

        col = col.push(text("Input Files:").size(14));
        col = col.push(self.file_list());

        col = col.push(
            row![
                button(text("Add Files").size(14))
                    .on_press(Message::AddFiles)
                    .padding([6, 14]),
                button(text("Remove Selected").size(14))
                    .on_press_maybe(self.selected.map(|_| Message::RemoveSelected))
                    .padding([6, 14])
                    .style(button::secondary),
            ]
            .spacing(8),
        );

        col = col.push(self.conversion_row());
        col = col.push(self.output_row());

        let dark_toggle = toggler(self.settings.appearance == Appearance::Dark)
            .label("Dark mode")
            .text_size(12)
            .on_toggle(Message::DarkModeToggled);
        col = col.push(Space::new().height(Length::Fill));
        col = col.push(dark_toggle);

        col.into()
    }

    pub fn theme(&self) -> Theme {
        theme::resolve_theme(self.settings.appearance)
    }

    pub fn subscription(&self) -> Subscription<Message> {
        // The worker has no way to wake the UI, so poll its channel while
        // one is alive.
        if self.worker_rx.is_some() {
            iced::time::every(POLL_INTERVAL).map(|_| Message::PollWorker)
        } else {
            Subscription::none()
        }
    }

    // -----------------------------------------------------------------------
    // update helpers
    // -----------------------------------------------------------------------

    fn start_transcription(&mut self) {
        self.notice = None;

        let output_dir = match self.output_dir {
            Some(ref dir) => dir.clone(),
            None => {
                self.show_error("Output directory is required and must exist.".to_string());
                return;
            }
        };
        if !output_dir.is_dir() {
            self.show_error("Output directory does not exist.".to_string());
            return;
        }
        if self.queue.is_empty() {
            self.show_error("Please add some files.".to_string());
            return;
        }
        for path in &self.queue {
            if !path.exists() {
                self.show_error(format!("Input file does not exist:\n{}", path.display()));
                return;
            }
        }

        let rx = transcribe_worker::spawn(TranscribeParams {
            files: self.queue.clone(),
            output_dir,
            model_size: self.settings.model(),
        });
        self.worker_rx = Some(rx);
        self.run_state = RunState::Preparing;
    }

    fn drain_worker_messages(&mut self) {
        let Some(rx) = self.worker_rx.clone() else {
            return;
        };

        let mut finished = false;
        while let Ok(message) = rx.try_recv() {
            match message {
                WorkerMessage::DownloadProgress(downloaded, total) => {
                    self.run_state = RunState::Downloading(downloaded, total);
                }
                WorkerMessage::FileStarted { index, total, name } => {
                    self.run_state = RunState::Processing {
                        index,
                        total,
                        name,
                        phase: None,
                    };
                }
                WorkerMessage::PhaseChanged(phase) => {
                    if let RunState::Processing {
                        phase: ref mut current,
                        ..
                    } = self.run_state
                    {
                        *current = Some(phase);
                    }
                }
                WorkerMessage::Complete => {
                    self.queue.clear();
                    self.selected = None;
                    self.notice = Some(Notice {
                        message: "Transcription successful!".to_string(),
                        error: false,
                    });
                    finished = true;
                }
                WorkerMessage::Error(message) => {
                    self.notice = Some(Notice {
                        message,
                        error: true,
                    });
                    finished = true;
                }
            }
        }

        if finished {
            self.worker_rx = None;
            self.run_state = RunState::Idle;
        }
    }

    fn show_error(&mut self, message: String) {
        self.notice = Some(Notice {
            message,
            error: true,
        });
    }

    // -----------------------------------------------------------------------
    // view helpers
    // -----------------------------------------------------------------------

    fn file_list(&self) -> Element<'_, Message> {
        let mut rows = column![].spacing(2);
        for (index, path) in self.queue.iter().enumerate() {
            let label = text(path.display().to_string()).size(13);
            let entry = button(label)
                .on_press(Message::FileClicked(index))
                .padding([4, 8])
                .width(Length::Fill);
            let entry = if self.selected == Some(index) {
                entry.style(button::primary)
            } else {
                entry.style(button::text)
            };
            rows = rows.push(entry);
        }

        container(scrollable(rows).height(Length::Fill))
            .style(container::bordered_box)
            .padding(4)
            .width(Length::Fill)
            .height(200)
            .into()
    }

    fn conversion_row(&self) -> Element<'_, Message> {
        let running = self.worker_rx.is_some();

        let convert = button(text(self.convert_label()).size(15))
            .on_press_maybe((!running).then_some(Message::StartTranscription))
            .padding([10, 24])
            .width(Length::Fill);

        let options: Vec<ModelOption> = ModelSize::ALL.iter().map(|&s| ModelOption(s)).collect();
        let models = pick_list(
            options,
            Some(ModelOption(self.settings.model())),
            Message::ModelSelected,
        )
        .text_size(14)
        .padding([8, 10]);

        row![convert, models].spacing(8).into()
    }

    fn convert_label(&self) -> String {
        match self.run_state {
            RunState::Idle => "Convert".to_string(),
            RunState::Preparing => "Preparing\u{2026}".to_string(),
            RunState::Downloading(downloaded, total) => {
                if total > 0 {
                    let pct = (downloaded as f64 / total as f64 * 100.0) as u32;
                    format!("Downloading model \u{2014} {pct}%")
                } else {
                    format!("Downloading model\u{2026} {downloaded} bytes")
                }
            }
            RunState::Processing {
                index,
                total,
                ref name,
                phase,
            } => match phase {
                Some(Phase::Converting) => format!("Converting {name} to \".mp3\"\u{2026}"),
                Some(Phase::Transcribing) | None => {
                    format!("Transcribing audio\u{2026} ({}/{total})", index + 1)
                }
                Some(Phase::Writing) => "Saving transcript\u{2026}".to_string(),
            },
        }
    }

    fn output_row(&self) -> Element<'_, Message> {
        let display: Element<'_, Message> = match self.output_dir {
            Some(ref dir) => text(dir.display().to_string()).size(13).into(),
            None => text("Select output directory (required)")
                .size(13)
                .style(text::secondary)
                .into(),
        };

        row![
            text("Output Directory:").size(14),
            container(display).width(Length::Fill),
            button(text("Browse").size(13))
                .on_press(Message::SelectOutputDir)
                .padding([6, 14])
                .style(button::secondary),
        ]
        .spacing(8)
        .align_y(iced::Alignment::Center)
        .into()
    }
}
