use std::path::Path;

/// Domain interface for persisting a finished transcript.
///
/// Implementations write UTF-8 text at `path`, overwriting any existing
/// file. The write is direct; there is no temp-file-then-rename atomicity.
pub trait TranscriptWriter: Send {
    fn write(&self, path: &Path, text: &str) -> Result<(), Box<dyn std::error::Error>>;
}
