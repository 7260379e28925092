use std::path::{Path, PathBuf};

use super::constants::TRANSCRIPT_SUFFIX;

/// Compute the transcript path for an input media file.
///
/// The output file name is the input file name with its four-character
/// extension sliced off and `_transcript.txt` appended, so dotted base names
/// survive intact (`a.b.mp4` → `a.b_transcript.txt`).
pub fn transcript_path(output_dir: &Path, input: &Path) -> PathBuf {
    let file_name = input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let base = match file_name.char_indices().nth_back(3) {
        Some((idx, _)) => &file_name[..idx],
        None => file_name.as_str(),
    };
    output_dir.join(format!("{base}{TRANSCRIPT_SUFFIX}"))
}
