use std::fs;
use std::path::{Path, PathBuf};

use whisper_rs::{FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters};

use crate::audio::domain::audio_segment::AudioSegment;
use crate::audio::domain::speech_recognizer::{RecognizeError, SpeechRecognizer};
use crate::shared::model_size::ModelSize;

/// Loading a ggml checkpoint costs roughly the file size again in compute
/// buffers and KV state, so a model is only considered loadable when twice
/// its file size fits in the currently available memory.
const MODEL_LOAD_FACTOR: u64 = 2;

/// Speech recognizer backed by whisper.cpp via whisper-rs.
///
/// The model is loaded fresh on every call and released when inference
/// finishes, matching the one-model-invocation-per-file pipeline. Before
/// loading, the checkpoint size is checked against the available system
/// memory; an oversized model is rejected with a typed error instead of
/// letting the host kill the process.
pub struct WhisperRecognizer {
    model_path: PathBuf,
    size: ModelSize,
}

impl WhisperRecognizer {
    pub fn new(model_path: &Path, size: ModelSize) -> Result<Self, RecognizeError> {
        if !model_path.exists() {
            return Err(RecognizeError::Backend(format!(
                "Whisper model not found at: {}",
                model_path.display()
            )));
        }
        Ok(Self {
            model_path: model_path.to_path_buf(),
            size,
        })
    }

    pub fn model_path(&self) -> &Path {
        &self.model_path
    }

    fn check_memory(&self) -> Result<(), RecognizeError> {
        let model_bytes = fs::metadata(&self.model_path)
            .map(|m| m.len())
            .map_err(|e| RecognizeError::Backend(format!("cannot stat model file: {e}")))?;
        let available = available_memory_bytes();
        if !model_fits_in_memory(model_bytes, available) {
            log::warn!(
                "Model {} needs ~{} MB but only {} MB are available",
                self.size,
                model_bytes * MODEL_LOAD_FACTOR / (1024 * 1024),
                available / (1024 * 1024)
            );
            return Err(RecognizeError::ModelTooLarge);
        }
        Ok(())
    }
}

impl SpeechRecognizer for WhisperRecognizer {
    fn transcribe(&self, audio: &AudioSegment) -> Result<String, RecognizeError> {
        self.check_memory()?;

        let path = self
            .model_path
            .to_str()
            .ok_or_else(|| RecognizeError::Backend("invalid model path".to_string()))?;
        let ctx = WhisperContext::new_with_params(path, WhisperContextParameters::default())
            .map_err(|e| RecognizeError::Backend(format!("Failed to load Whisper model: {e}")))?;

        let mut state = ctx
            .create_state()
            .map_err(|e| RecognizeError::Backend(format!("Failed to create Whisper state: {e}")))?;

        let mut params = FullParams::new(SamplingStrategy::Greedy { best_of: 0 });
        // English-only checkpoints reject other languages; multilingual ones
        // auto-detect when no language is pinned.
        if self.size.as_str().ends_with(".en") {
            params.set_language(Some("en"));
        } else {
            params.set_language(None);
        }
        params.set_translate(false);
        params.set_print_special(false);
        params.set_print_progress(false);
        params.set_print_realtime(false);
        params.set_print_timestamps(false);
        params.set_n_threads(num_cpus().min(4) as i32);

        state
            .full(params, audio.samples())
            .map_err(|e| RecognizeError::Backend(format!("Whisper inference failed: {e}")))?;

        let mut text = String::new();
        for seg_idx in 0..state.full_n_segments() {
            let segment = match state.get_segment(seg_idx) {
                Some(s) => s,
                None => continue,
            };
            match segment.to_str() {
                Ok(s) => text.push_str(s),
                Err(_) => continue,
            }
        }

        Ok(text)
    }
}

/// True iff a checkpoint of `model_bytes` can be loaded into `available_bytes`.
fn model_fits_in_memory(model_bytes: u64, available_bytes: u64) -> bool {
    model_bytes.saturating_mul(MODEL_LOAD_FACTOR) <= available_bytes
}

fn available_memory_bytes() -> u64 {
    let mut system = sysinfo::System::new();
    system.refresh_memory();
    system.available_memory()
}

fn num_cpus() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_nonexistent_path_returns_error() {
        let result = WhisperRecognizer::new(Path::new("/nonexistent/model.bin"), ModelSize::Tiny);
        let err = result.err().unwrap();
        assert!(
            err.to_string().contains("not found"),
            "Expected 'not found' in error, got: {err}"
        );
    }

    #[test]
    fn test_model_fits_when_headroom_exists() {
        // 100 MB model, 1 GB available
        assert!(model_fits_in_memory(100 << 20, 1 << 30));
    }

    #[test]
    fn test_model_rejected_without_headroom() {
        // 3 GB model, 4 GB available: 2x footprint does not fit
        assert!(!model_fits_in_memory(3 << 30, 4 << 30));
    }

    #[test]
    fn test_exact_boundary_fits() {
        assert!(model_fits_in_memory(512, 1024));
        assert!(!model_fits_in_memory(513, 1024));
    }

    #[test]
    fn test_huge_model_does_not_overflow() {
        assert!(!model_fits_in_memory(u64::MAX, u64::MAX));
    }

    #[test]
    fn test_memory_check_passes_for_tiny_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        let model = tmp.path().join("ggml-tiny.bin");
        fs::write(&model, b"tiny fake weights").unwrap();
        let recognizer = WhisperRecognizer::new(&model, ModelSize::Tiny).unwrap();
        assert!(recognizer.check_memory().is_ok());
    }
}
