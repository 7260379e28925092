use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// Scratch area holding the staged audio for one pipeline run.
///
/// Each run gets its own directory under the system temp location, passed
/// explicitly to the staging code. Dropping the value removes the directory
/// and everything in it, on success and on failure alike, so a run can never
/// see another run's leftovers.
pub struct ScratchDir {
    dir: TempDir,
}

impl ScratchDir {
    pub fn new() -> std::io::Result<Self> {
        Ok(Self {
            dir: tempfile::tempdir()?,
        })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Where the staged MP3 for `input` lives inside the scratch area.
    ///
    /// An `.mp4` input swaps its extension for `.mp3`; an `.mp3` input keeps
    /// its file name.
    pub fn staged_path(&self, input: &Path) -> PathBuf {
        let name = input
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let stem = name
            .strip_suffix(".mp4")
            .or_else(|| name.strip_suffix(".mp3"))
            .unwrap_or(&name);
        self.dir.path().join(format!("{stem}.mp3"))
    }
}
