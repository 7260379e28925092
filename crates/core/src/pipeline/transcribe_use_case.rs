use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::audio::domain::speech_recognizer::{RecognizeError, SpeechRecognizer};
use crate::media::domain::audio_reader::AudioReader;
use crate::media::domain::audio_transcoder::AudioTranscoder;
use crate::media::domain::transcript_writer::TranscriptWriter;
use crate::pipeline::scratch::ScratchDir;
use crate::shared::constants::WHISPER_SAMPLE_RATE;
use crate::shared::media_type::MediaType;
use crate::shared::naming::transcript_path;

#[derive(Error, Debug)]
pub enum TranscribeError {
    #[error("the input file must be either a \".mp3\" or \".mp4\" file: {}", .0.display())]
    UnsupportedFileType(PathBuf),
    #[error("output directory does not exist: {}", .0.display())]
    MissingOutputDir(PathBuf),
    #[error("failed to create scratch directory: {0}")]
    Scratch(#[source] std::io::Error),
    #[error("failed to stage {}: {source}", path.display())]
    Stage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{0}")]
    Transcode(Box<dyn std::error::Error>),
    #[error("{0}")]
    Decode(Box<dyn std::error::Error>),
    #[error(transparent)]
    Recognition(#[from] RecognizeError),
    #[error("{0}")]
    Write(Box<dyn std::error::Error>),
}

impl TranscribeError {
    /// True for the typed resource-exhaustion case, which front ends surface
    /// with a dedicated friendly message.
    pub fn is_memory_exhaustion(&self) -> bool {
        matches!(
            self,
            TranscribeError::Recognition(RecognizeError::ModelTooLarge)
        )
    }
}

/// Pipeline stages reported to the optional phase listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Extracting the audio stream of a video input.
    Converting,
    /// Running the speech model.
    Transcribing,
    /// Persisting the transcript.
    Writing,
}

/// Phase callback, invoked from whatever thread runs the pipeline.
pub type PhaseFn = Box<dyn Fn(Phase) + Send>;

pub struct TranscriptionResult {
    pub transcript_path: PathBuf,
    pub text: String,
}

/// The transcription pipeline: validate → stage → decode → recognize → persist.
///
/// One `execute` call handles one input file. Intermediate audio lives in a
/// per-run [`ScratchDir`] that is removed on every exit path. Failures are
/// terminal for the file; nothing is retried.
pub struct TranscribeUseCase {
    transcoder: Box<dyn AudioTranscoder>,
    reader: Box<dyn AudioReader>,
    recognizer: Box<dyn SpeechRecognizer>,
    writer: Box<dyn TranscriptWriter>,
    phase_listener: Option<PhaseFn>,
}

impl TranscribeUseCase {
    pub fn new(
        transcoder: Box<dyn AudioTranscoder>,
        reader: Box<dyn AudioReader>,
        recognizer: Box<dyn SpeechRecognizer>,
        writer: Box<dyn TranscriptWriter>,
        phase_listener: Option<PhaseFn>,
    ) -> Self {
        Self {
            transcoder,
            reader,
            recognizer,
            writer,
            phase_listener,
        }
    }

    pub fn execute(
        &self,
        input: &Path,
        output_dir: &Path,
    ) -> Result<TranscriptionResult, TranscribeError> {
        let media_type = MediaType::from_path(input)
            .ok_or_else(|| TranscribeError::UnsupportedFileType(input.to_path_buf()))?;
        if !output_dir.is_dir() {
            return Err(TranscribeError::MissingOutputDir(output_dir.to_path_buf()));
        }

        let scratch = ScratchDir::new().map_err(TranscribeError::Scratch)?;
        let staged = scratch.staged_path(input);

        match media_type {
            MediaType::Mp4 => {
                self.notify(Phase::Converting);
                log::info!("Extracting audio from {}", input.display());
                self.transcoder
                    .extract(input, &staged)
                    .map_err(TranscribeError::Transcode)?;
            }
            MediaType::Mp3 => {
                fs::copy(input, &staged).map_err(|e| TranscribeError::Stage {
                    path: input.to_path_buf(),
                    source: e,
                })?;
            }
        }

        self.notify(Phase::Transcribing);
        let audio = self
            .reader
            .read(&staged, WHISPER_SAMPLE_RATE)
            .map_err(TranscribeError::Decode)?;
        log::info!("Transcribing {:.1}s of audio", audio.duration());
        let text = self.recognizer.transcribe(&audio)?;

        self.notify(Phase::Writing);
        let transcript_path = transcript_path(output_dir, input);
        self.writer
            .write(&transcript_path, &text)
            .map_err(TranscribeError::Write)?;
        log::info!("Saved transcript to {}", transcript_path.display());

        Ok(TranscriptionResult {
            transcript_path,
            text,
        })
    }

    fn notify(&self, phase: Phase) {
        if let Some(ref listener) = self.phase_listener {
            listener(phase);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::domain::audio_segment::AudioSegment;
    use crate::media::infrastructure::text_file_writer::TextFileWriter;
    use std::sync::{Arc, Mutex};
    use tempfile::TempDir;

    // ─── Stubs ───

    struct StubTranscoder {
        calls: Arc<Mutex<Vec<(PathBuf, PathBuf)>>>,
    }

    impl AudioTranscoder for StubTranscoder {
        fn extract(&self, input: &Path, output: &Path) -> Result<(), Box<dyn std::error::Error>> {
            self.calls
                .lock()
                .unwrap()
                .push((input.to_path_buf(), output.to_path_buf()));
            fs::write(output, b"extracted audio")?;
            Ok(())
        }
    }

    struct FailingTranscoder;

    impl AudioTranscoder for FailingTranscoder {
        fn extract(&self, _: &Path, _: &Path) -> Result<(), Box<dyn std::error::Error>> {
            Err("transcoder exploded".into())
        }
    }

    /// Captures the staged path and its bytes at read time, before the
    /// scratch directory is torn down.
    struct StubReader {
        seen: Arc<Mutex<Option<(PathBuf, Vec<u8>)>>>,
    }

    impl AudioReader for StubReader {
        fn read(
            &self,
            path: &Path,
            target_sample_rate: u32,
        ) -> Result<AudioSegment, Box<dyn std::error::Error>> {
            let bytes = fs::read(path)?;
            *self.seen.lock().unwrap() = Some((path.to_path_buf(), bytes));
            Ok(AudioSegment::new(
                vec![0.0; target_sample_rate as usize],
                target_sample_rate,
            ))
        }
    }

    struct StubRecognizer {
        text: String,
    }

    impl SpeechRecognizer for StubRecognizer {
        fn transcribe(&self, _: &AudioSegment) -> Result<String, RecognizeError> {
            Ok(self.text.clone())
        }
    }

    struct FailingRecognizer {
        error: RecognizeError,
    }

    impl SpeechRecognizer for FailingRecognizer {
        fn transcribe(&self, _: &AudioSegment) -> Result<String, RecognizeError> {
            Err(self.error.clone())
        }
    }

    struct Fixture {
        transcoder_calls: Arc<Mutex<Vec<(PathBuf, PathBuf)>>>,
        reader_seen: Arc<Mutex<Option<(PathBuf, Vec<u8>)>>>,
        use_case: TranscribeUseCase,
    }

    fn fixture(text: &str) -> Fixture {
        let transcoder_calls = Arc::new(Mutex::new(Vec::new()));
        let reader_seen = Arc::new(Mutex::new(None));
        let use_case = TranscribeUseCase::new(
            Box::new(StubTranscoder {
                calls: transcoder_calls.clone(),
            }),
            Box::new(StubReader {
                seen: reader_seen.clone(),
            }),
            Box::new(StubRecognizer {
                text: text.to_string(),
            }),
            Box::new(TextFileWriter),
            None,
        );
        Fixture {
            transcoder_calls,
            reader_seen,
            use_case,
        }
    }

    #[test]
    fn test_mp3_input_is_copied_byte_for_byte() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("notes.mp3");
        fs::write(&input, b"ID3 fake mp3 payload").unwrap();
        let out = TempDir::new().unwrap();

        let f = fixture("hello from tiny");
        let result = f.use_case.execute(&input, out.path()).unwrap();

        let seen = f.reader_seen.lock().unwrap();
        let (staged, bytes) = seen.as_ref().unwrap();
        assert_eq!(staged.file_name().unwrap().to_string_lossy(), "notes.mp3");
        assert_eq!(bytes, b"ID3 fake mp3 payload");
        assert!(f.transcoder_calls.lock().unwrap().is_empty());
        assert_eq!(
            result.transcript_path,
            out.path().join("notes_transcript.txt")
        );
        assert_eq!(
            fs::read_to_string(&result.transcript_path).unwrap(),
            "hello from tiny"
        );
    }

    #[test]
    fn test_mp4_input_goes_through_the_transcoder() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("lecture.mp4");
        fs::write(&input, b"not really a video").unwrap();
        let out = TempDir::new().unwrap();

        let f = fixture("model text");
        let result = f.use_case.execute(&input, out.path()).unwrap();

        let calls = f.transcoder_calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        let (from, to) = &calls[0];
        assert_eq!(from, &input);
        assert_eq!(to.file_name().unwrap().to_string_lossy(), "lecture.mp3");
        assert_eq!(
            result.transcript_path,
            out.path().join("lecture_transcript.txt")
        );
        assert_eq!(fs::read_to_string(&result.transcript_path).unwrap(), "model text");
    }

    #[test]
    fn test_unsupported_extension_fails_before_any_io() {
        let out = TempDir::new().unwrap();
        let f = fixture("unused");
        let err = f
            .use_case
            .execute(Path::new("clip.wav"), out.path())
            .unwrap_err();

        assert!(matches!(err, TranscribeError::UnsupportedFileType(_)));
        assert!(f.transcoder_calls.lock().unwrap().is_empty());
        assert!(f.reader_seen.lock().unwrap().is_none());
        assert_eq!(fs::read_dir(out.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_missing_output_dir_is_rejected() {
        let f = fixture("unused");
        let err = f
            .use_case
            .execute(Path::new("notes.mp3"), Path::new("/no/such/dir"))
            .unwrap_err();
        assert!(matches!(err, TranscribeError::MissingOutputDir(_)));
        assert!(f.reader_seen.lock().unwrap().is_none());
    }

    #[test]
    fn test_missing_mp3_input_fails_during_staging() {
        let out = TempDir::new().unwrap();
        let f = fixture("unused");
        let err = f
            .use_case
            .execute(Path::new("/no/such/notes.mp3"), out.path())
            .unwrap_err();
        assert!(matches!(err, TranscribeError::Stage { .. }));
    }

    #[test]
    fn test_transcoder_failure_propagates_raw_message() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("lecture.mp4");
        fs::write(&input, b"x").unwrap();
        let out = TempDir::new().unwrap();

        let f = fixture("unused");
        let use_case = TranscribeUseCase::new(
            Box::new(FailingTranscoder),
            Box::new(StubReader {
                seen: f.reader_seen.clone(),
            }),
            Box::new(StubRecognizer {
                text: String::new(),
            }),
            Box::new(TextFileWriter),
            None,
        );
        let err = use_case.execute(&input, out.path()).unwrap_err();
        assert_eq!(err.to_string(), "transcoder exploded");
        assert!(!err.is_memory_exhaustion());
    }

    #[test]
    fn test_memory_exhaustion_keeps_its_exact_message() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("notes.mp3");
        fs::write(&input, b"x").unwrap();
        let out = TempDir::new().unwrap();

        let use_case = TranscribeUseCase::new(
            Box::new(FailingTranscoder),
            Box::new(StubReader {
                seen: Arc::new(Mutex::new(None)),
            }),
            Box::new(FailingRecognizer {
                error: RecognizeError::ModelTooLarge,
            }),
            Box::new(TextFileWriter),
            None,
        );
        let err = use_case.execute(&input, out.path()).unwrap_err();
        assert!(err.is_memory_exhaustion());
        assert_eq!(
            err.to_string(),
            "The selected model is too large for the available system memory."
        );
    }

    #[test]
    fn test_second_run_overwrites_previous_transcript() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("notes.mp3");
        fs::write(&input, b"payload").unwrap();
        let out = TempDir::new().unwrap();

        fixture("first pass").use_case.execute(&input, out.path()).unwrap();
        fixture("second pass").use_case.execute(&input, out.path()).unwrap();

        assert_eq!(
            fs::read_to_string(out.path().join("notes_transcript.txt")).unwrap(),
            "second pass"
        );
    }

    #[test]
    fn test_phases_for_mp4_input() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("lecture.mp4");
        fs::write(&input, b"x").unwrap();
        let out = TempDir::new().unwrap();

        let phases = Arc::new(Mutex::new(Vec::new()));
        let phases_clone = phases.clone();
        let use_case = TranscribeUseCase::new(
            Box::new(StubTranscoder {
                calls: Arc::new(Mutex::new(Vec::new())),
            }),
            Box::new(StubReader {
                seen: Arc::new(Mutex::new(None)),
            }),
            Box::new(StubRecognizer {
                text: String::new(),
            }),
            Box::new(TextFileWriter),
            Some(Box::new(move |phase| {
                phases_clone.lock().unwrap().push(phase);
            })),
        );
        use_case.execute(&input, out.path()).unwrap();
        assert_eq!(
            *phases.lock().unwrap(),
            vec![Phase::Converting, Phase::Transcribing, Phase::Writing]
        );
    }

    #[test]
    fn test_phases_for_mp3_input_skip_converting() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("notes.mp3");
        fs::write(&input, b"x").unwrap();
        let out = TempDir::new().unwrap();

        let phases = Arc::new(Mutex::new(Vec::new()));
        let phases_clone = phases.clone();
        let use_case = TranscribeUseCase::new(
            Box::new(StubTranscoder {
                calls: Arc::new(Mutex::new(Vec::new())),
            }),
            Box::new(StubReader {
                seen: Arc::new(Mutex::new(None)),
            }),
            Box::new(StubRecognizer {
                text: String::new(),
            }),
            Box::new(TextFileWriter),
            Some(Box::new(move |phase| {
                phases_clone.lock().unwrap().push(phase);
            })),
        );
        use_case.execute(&input, out.path()).unwrap();
        assert_eq!(
            *phases.lock().unwrap(),
            vec![Phase::Transcribing, Phase::Writing]
        );
    }

    #[test]
    fn test_scratch_is_removed_after_success() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("notes.mp3");
        fs::write(&input, b"payload").unwrap();
        let out = TempDir::new().unwrap();

        let f = fixture("text");
        f.use_case.execute(&input, out.path()).unwrap();
        let seen = f.reader_seen.lock().unwrap();
        let (staged, _) = seen.as_ref().unwrap();
        assert!(!staged.exists());
    }

    #[test]
    fn test_scratch_is_removed_after_failure() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("notes.mp3");
        fs::write(&input, b"payload").unwrap();
        let out = TempDir::new().unwrap();

        let seen = Arc::new(Mutex::new(None));
        let use_case = TranscribeUseCase::new(
            Box::new(FailingTranscoder),
            Box::new(StubReader { seen: seen.clone() }),
            Box::new(FailingRecognizer {
                error: RecognizeError::Backend("inference died".to_string()),
            }),
            Box::new(TextFileWriter),
            None,
        );
        use_case.execute(&input, out.path()).unwrap_err();
        let seen = seen.lock().unwrap();
        let (staged, _) = seen.as_ref().unwrap();
        assert!(!staged.exists());
        assert_eq!(fs::read_dir(out.path()).unwrap().count(), 0);
    }
}
