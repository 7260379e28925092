use std::path::Path;

/// Domain interface for extracting the audio stream of a media file
/// into an MP3 at `output`.
///
/// Implementations overwrite an existing file at `output` and propagate
/// every failure unmodified; staging is never retried.
pub trait AudioTranscoder: Send {
    fn extract(&self, input: &Path, output: &Path) -> Result<(), Box<dyn std::error::Error>>;
}
