/// Sample rate Whisper models expect.
pub const WHISPER_SAMPLE_RATE: u32 = 16000;

/// Fixed bitrate for staged MP3 audio.
pub const MP3_BITRATE: usize = 192_000;

/// Base URL for ggml model files (whisper.cpp release hosting).
pub const MODEL_BASE_URL: &str = "https://huggingface.co/ggerganov/whisper.cpp/resolve/main";

/// Suffix appended to the input base name when writing the transcript.
pub const TRANSCRIPT_SUFFIX: &str = "_transcript.txt";
