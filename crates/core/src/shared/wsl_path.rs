/// True iff the string starts with a Windows drive-letter prefix
/// (`C:\...` or `C:/...`).
pub fn looks_like_windows_path(path: &str) -> bool {
    let bytes = path.as_bytes();
    bytes.len() >= 3
        && bytes[0].is_ascii_alphabetic()
        && bytes[1] == b':'
        && (bytes[2] == b'\\' || bytes[2] == b'/')
}

/// Rewrite a Windows-style path into its WSL mount equivalent.
///
/// `C:\Users\me\talk.mp4` and `C:/Users/me/talk.mp4` both become
/// `/mnt/c/Users/me/talk.mp4`. Callers should gate on
/// [`looks_like_windows_path`]; input without a drive prefix is returned
/// unchanged.
pub fn windows_to_wsl(path: &str) -> String {
    if !looks_like_windows_path(path) {
        return path.to_string();
    }
    let normalized = path.replace('\\', "/");
    let drive = normalized
        .chars()
        .next()
        .map(|c| c.to_ascii_lowercase())
        .unwrap_or('c');
    let rest = &normalized[3..];
    format!("/mnt/{drive}/{rest}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::backslashes("C:\\Users\\me\\talk.mp4", "/mnt/c/Users/me/talk.mp4")]
    #[case::forward_slashes("C:/Users/me/talk.mp4", "/mnt/c/Users/me/talk.mp4")]
    #[case::lowercase_drive("d:/media/clip.mp3", "/mnt/d/media/clip.mp3")]
    fn test_windows_to_wsl(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(windows_to_wsl(input), expected);
    }

    #[test]
    fn test_unix_path_passes_through() {
        assert_eq!(windows_to_wsl("/home/me/talk.mp4"), "/home/me/talk.mp4");
        assert!(!looks_like_windows_path("/home/me/talk.mp4"));
    }

    #[test]
    fn test_relative_path_passes_through() {
        assert_eq!(windows_to_wsl("talk.mp4"), "talk.mp4");
    }

    #[test]
    fn test_drive_prefix_detection() {
        assert!(looks_like_windows_path("C:\\x"));
        assert!(looks_like_windows_path("z:/x"));
        assert!(!looks_like_windows_path("C:"));
        assert!(!looks_like_windows_path("1:/x"));
    }
}
