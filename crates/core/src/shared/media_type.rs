use std::path::Path;

/// The two media types the pipeline accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaType {
    /// Video container; audio must be extracted before transcription.
    Mp4,
    /// Audio file; staged by plain copy.
    Mp3,
}

impl MediaType {
    /// Classify a path by its last four characters.
    ///
    /// This is deliberately a fixed-width, case-sensitive suffix check
    /// (`.mp4` / `.mp3`), not a general extension parser. Anything else,
    /// including paths shorter than four characters, is rejected.
    pub fn from_path(path: &Path) -> Option<MediaType> {
        let name = path.to_string_lossy();
        if name.ends_with(".mp4") {
            Some(MediaType::Mp4)
        } else if name.ends_with(".mp3") {
            Some(MediaType::Mp3)
        } else {
            None
        }
    }
}

/// True iff the path names a supported media file.
pub fn is_supported(path: &Path) -> bool {
    MediaType::from_path(path).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::path::PathBuf;

    #[rstest]
    #[case::plain_mp4("lecture.mp4", Some(MediaType::Mp4))]
    #[case::plain_mp3("notes.mp3", Some(MediaType::Mp3))]
    #[case::upper_stem("LECTURE NOTES.mp4", Some(MediaType::Mp4))]
    #[case::mixed_case_stem("My.Weird.File.mp3", Some(MediaType::Mp3))]
    #[case::wav("clip.wav", None)]
    #[case::truncated_extension("clip.mp", None)]
    #[case::upper_extension("clip.MP4", None)]
    #[case::empty("", None)]
    #[case::too_short("mp4", None)]
    #[case::extension_only(".mp4", Some(MediaType::Mp4))]
    fn test_from_path(#[case] name: &str, #[case] expected: Option<MediaType>) {
        assert_eq!(MediaType::from_path(&PathBuf::from(name)), expected);
    }

    #[test]
    fn test_is_supported_matches_classification() {
        assert!(is_supported(Path::new("/videos/talk.mp4")));
        assert!(is_supported(Path::new("/audio/talk.mp3")));
        assert!(!is_supported(Path::new("/audio/talk.flac")));
    }

    #[test]
    fn test_suffix_must_be_final() {
        // ".mp4" somewhere in the middle does not count.
        assert!(!is_supported(Path::new("movie.mp4.bak")));
    }
}
