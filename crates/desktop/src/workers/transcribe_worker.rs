use std::path::PathBuf;
use std::thread;

use crossbeam_channel::{Receiver, Sender};

use mediascribe_core::audio::infrastructure::whisper_recognizer::WhisperRecognizer;
use mediascribe_core::media::infrastructure::ffmpeg_audio_reader::FfmpegAudioReader;
use mediascribe_core::media::infrastructure::ffmpeg_transcoder::FfmpegTranscoder;
use mediascribe_core::media::infrastructure::text_file_writer::TextFileWriter;
use mediascribe_core::pipeline::transcribe_use_case::{Phase, TranscribeUseCase};
use mediascribe_core::shared::model_resolver;
use mediascribe_core::shared::model_size::ModelSize;

/// Messages sent from the worker thread to the UI.
#[derive(Debug, Clone)]
pub enum WorkerMessage {
    DownloadProgress(u64, u64),
    FileStarted {
        index: usize,
        total: usize,
        name: String,
    },
    PhaseChanged(Phase),
    Complete,
    Error(String),
}

/// Parameters for one queue run.
pub struct TranscribeParams {
    pub files: Vec<PathBuf>,
    pub output_dir: PathBuf,
    pub model_size: ModelSize,
}

/// Spawn the background transcription worker.
///
/// The queue is processed strictly one file after another on a single
/// thread. The first failure aborts the remaining files and is reported as
/// one `Error` message; `TranscribeError` already carries the friendly text
/// for the out-of-memory case, so the string can be shown as-is.
pub fn spawn(params: TranscribeParams) -> Receiver<WorkerMessage> {
    let (tx, rx) = crossbeam_channel::unbounded::<WorkerMessage>();

    thread::spawn(move || {
        if let Err(e) = run_queue(&tx, &params) {
            let _ = tx.send(WorkerMessage::Error(e.to_string()));
        }
    });

    rx
}

fn run_queue(
    tx: &Sender<WorkerMessage>,
    params: &TranscribeParams,
) -> Result<(), Box<dyn std::error::Error>> {
    let tx_download = tx.clone();
    let model_path = model_resolver::resolve(
        params.model_size,
        None,
        Some(Box::new(move |downloaded, total| {
            let _ = tx_download.send(WorkerMessage::DownloadProgress(downloaded, total));
        })),
    )?;

    let recognizer = WhisperRecognizer::new(&model_path, params.model_size)?;
    let tx_phase = tx.clone();
    let use_case = TranscribeUseCase::new(
        Box::new(FfmpegTranscoder),
        Box::new(FfmpegAudioReader),
        Box::new(recognizer),
        Box::new(TextFileWriter),
        Some(Box::new(move |phase| {
            let _ = tx_phase.send(WorkerMessage::PhaseChanged(phase));
        })),
    );

    let total = params.files.len();
    for (index, file) in params.files.iter().enumerate() {
        let name = file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let _ = tx.send(WorkerMessage::FileStarted { index, total, name });
        use_case.execute(file, &params.output_dir)?;
    }

    let _ = tx.send(WorkerMessage::Complete);
    Ok(())
}
