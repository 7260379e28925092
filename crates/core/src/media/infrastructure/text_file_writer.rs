use std::fs;
use std::path::Path;

use crate::media::domain::transcript_writer::TranscriptWriter;

/// Writes transcripts as plain UTF-8 text files.
pub struct TextFileWriter;

impl TranscriptWriter for TextFileWriter {
    fn write(&self, path: &Path, text: &str) -> Result<(), Box<dyn std::error::Error>> {
        fs::write(path, text)?;
        Ok(())
    }
}
