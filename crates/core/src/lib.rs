//! Core transcription pipeline: file-type validation, scratch staging,
//! audio extraction, Whisper inference, and transcript persistence.

pub mod audio;
pub mod media;
pub mod pipeline;
pub mod shared;
