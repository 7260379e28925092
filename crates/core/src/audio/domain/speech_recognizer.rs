use thiserror::Error;

use super::audio_segment::AudioSegment;

/// Errors from a speech recognition backend.
///
/// Exhaustion of system memory while loading a model is its own variant so
/// callers can surface the friendly message without matching on backend
/// output text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecognizeError {
    #[error("The selected model is too large for the available system memory.")]
    ModelTooLarge,
    #[error("{0}")]
    Backend(String),
}

/// Domain interface for speech-to-text transcription.
///
/// Implementations run inference over the whole segment in one blocking call
/// and return the full transcript text. No streaming, no partial results.
pub trait SpeechRecognizer: Send {
    fn transcribe(&self, audio: &AudioSegment) -> Result<String, RecognizeError>;
}
