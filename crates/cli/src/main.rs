use std::path::{Path, PathBuf};
use std::process;
use std::str::FromStr;

use clap::Parser;

use mediascribe_core::audio::infrastructure::whisper_recognizer::WhisperRecognizer;
use mediascribe_core::media::infrastructure::ffmpeg_audio_reader::FfmpegAudioReader;
use mediascribe_core::media::infrastructure::ffmpeg_transcoder::FfmpegTranscoder;
use mediascribe_core::media::infrastructure::text_file_writer::TextFileWriter;
use mediascribe_core::pipeline::transcribe_use_case::{Phase, TranscribeUseCase};
use mediascribe_core::shared::media_type;
use mediascribe_core::shared::model_resolver;
use mediascribe_core::shared::model_size::ModelSize;
use mediascribe_core::shared::wsl_path;

/// Transcribe an ".mp4" or ".mp3" media file to text.
#[derive(Parser)]
#[command(name = "mediascribe")]
struct Cli {
    /// Input media file (".mp4" or ".mp3").
    input: String,

    /// Existing directory the transcript is written into.
    output_dir: String,

    /// Whisper model size (tiny.en ... turbo).
    #[arg(default_value = "medium")]
    model_size: String,
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let model_size = parse_model_size(&cli.model_size)?;
    let input = normalize(&cli.input);
    let output_dir = normalize(&cli.output_dir);
    validate(&input, &output_dir)?;

    log::info!("Resolving model: {model_size}");
    let model_path = model_resolver::resolve(model_size, None, Some(Box::new(download_progress)))?;
    eprintln!();

    let recognizer = WhisperRecognizer::new(&model_path, model_size)?;
    let use_case = TranscribeUseCase::new(
        Box::new(FfmpegTranscoder),
        Box::new(FfmpegAudioReader),
        Box::new(recognizer),
        Box::new(TextFileWriter),
        Some(Box::new(report_phase)),
    );

    let result = use_case.execute(&input, &output_dir)?;
    log::info!("Saved transcript to {}", result.transcript_path.display());
    println!("{}", result.text.trim());

    Ok(())
}

fn parse_model_size(raw: &str) -> Result<ModelSize, Box<dyn std::error::Error>> {
    ModelSize::from_str(raw).map_err(|_| {
        let names: Vec<&str> = ModelSize::ALL.iter().map(|m| m.as_str()).collect();
        format!("model size must be one of: {}", names.join(", ")).into()
    })
}

/// Rewrite Windows-style arguments into their WSL mounts; everything else
/// passes through untouched.
fn normalize(raw: &str) -> PathBuf {
    if wsl_path::looks_like_windows_path(raw) {
        PathBuf::from(wsl_path::windows_to_wsl(raw))
    } else {
        PathBuf::from(raw)
    }
}

fn validate(input: &Path, output_dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    if !media_type::is_supported(input) {
        return Err("the input file must be either a \".mp3\" or \".mp4\" file".into());
    }
    if !input.exists() {
        return Err(format!("Input file not found: {}", input.display()).into());
    }
    if !output_dir.is_dir() {
        return Err(format!("Output directory does not exist: {}", output_dir.display()).into());
    }
    Ok(())
}

fn report_phase(phase: Phase) {
    match phase {
        Phase::Converting => eprintln!("Converting file to \".mp3\"..."),
        Phase::Transcribing => eprintln!("Transcribing audio..."),
        Phase::Writing => eprintln!("Done!"),
    }
}

fn download_progress(downloaded: u64, total: u64) {
    if total > 0 {
        let pct = (downloaded as f64 / total as f64 * 100.0) as u32;
        eprint!("\rDownloading speech model... {pct}%");
    } else {
        eprint!("\rDownloading speech model... {downloaded} bytes");
    }
}
