use std::path::Path;

use crate::audio::domain::audio_segment::AudioSegment;

/// Domain interface for decoding a staged audio file.
///
/// Decodes the whole file to a mono PCM segment at the given sample rate.
/// A file without an audio stream is an error: by the time the pipeline
/// reads, staging has already produced (or copied) an audio artifact.
pub trait AudioReader: Send {
    fn read(
        &self,
        path: &Path,
        target_sample_rate: u32,
    ) -> Result<AudioSegment, Box<dyn std::error::Error>>;
}
