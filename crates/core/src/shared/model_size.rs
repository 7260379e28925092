use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use super::constants::MODEL_BASE_URL;

/// The pretrained Whisper model variants the pipeline accepts.
///
/// Names match the upstream catalog; `large` and `turbo` are aliases for the
/// latest `large-v3` and `large-v3-turbo` checkpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelSize {
    TinyEn,
    Tiny,
    BaseEn,
    Base,
    SmallEn,
    Small,
    MediumEn,
    Medium,
    LargeV1,
    LargeV2,
    LargeV3,
    Large,
    LargeV3Turbo,
    Turbo,
}

#[derive(Error, Debug)]
#[error("unknown model size '{0}'")]
pub struct UnknownModelSize(pub String);

impl ModelSize {
    pub const ALL: &[ModelSize] = &[
        ModelSize::TinyEn,
        ModelSize::Tiny,
        ModelSize::BaseEn,
        ModelSize::Base,
        ModelSize::SmallEn,
        ModelSize::Small,
        ModelSize::MediumEn,
        ModelSize::Medium,
        ModelSize::LargeV1,
        ModelSize::LargeV2,
        ModelSize::LargeV3,
        ModelSize::Large,
        ModelSize::LargeV3Turbo,
        ModelSize::Turbo,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ModelSize::TinyEn => "tiny.en",
            ModelSize::Tiny => "tiny",
            ModelSize::BaseEn => "base.en",
            ModelSize::Base => "base",
            ModelSize::SmallEn => "small.en",
            ModelSize::Small => "small",
            ModelSize::MediumEn => "medium.en",
            ModelSize::Medium => "medium",
            ModelSize::LargeV1 => "large-v1",
            ModelSize::LargeV2 => "large-v2",
            ModelSize::LargeV3 => "large-v3",
            ModelSize::Large => "large",
            ModelSize::LargeV3Turbo => "large-v3-turbo",
            ModelSize::Turbo => "turbo",
        }
    }

    /// File name of the ggml checkpoint for this size.
    ///
    /// The alias sizes resolve to the checkpoints they point at upstream, so
    /// `large` and `large-v3` share one cached file.
    pub fn ggml_file_name(self) -> &'static str {
        match self {
            ModelSize::TinyEn => "ggml-tiny.en.bin",
            ModelSize::Tiny => "ggml-tiny.bin",
            ModelSize::BaseEn => "ggml-base.en.bin",
            ModelSize::Base => "ggml-base.bin",
            ModelSize::SmallEn => "ggml-small.en.bin",
            ModelSize::Small => "ggml-small.bin",
            ModelSize::MediumEn => "ggml-medium.en.bin",
            ModelSize::Medium => "ggml-medium.bin",
            ModelSize::LargeV1 => "ggml-large-v1.bin",
            ModelSize::LargeV2 => "ggml-large-v2.bin",
            ModelSize::LargeV3 | ModelSize::Large => "ggml-large-v3.bin",
            ModelSize::LargeV3Turbo | ModelSize::Turbo => "ggml-large-v3-turbo.bin",
        }
    }

    pub fn download_url(self) -> String {
        format!("{MODEL_BASE_URL}/{}", self.ggml_file_name())
    }

    /// Rough resident-memory cost, shown next to each size in the GUI.
    pub fn memory_hint(self) -> &'static str {
        match self {
            ModelSize::TinyEn | ModelSize::Tiny | ModelSize::BaseEn | ModelSize::Base => "~1 GB",
            ModelSize::SmallEn | ModelSize::Small => "~2 GB",
            ModelSize::MediumEn | ModelSize::Medium => "~5 GB",
            ModelSize::LargeV1 | ModelSize::LargeV2 | ModelSize::LargeV3 | ModelSize::Large => {
                "~10 GB"
            }
            ModelSize::LargeV3Turbo | ModelSize::Turbo => "~6 GB",
        }
    }
}

impl fmt::Display for ModelSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelSize {
    type Err = UnknownModelSize;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ModelSize::ALL
            .iter()
            .copied()
            .find(|size| size.as_str() == s)
            .ok_or_else(|| UnknownModelSize(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_has_fourteen_sizes() {
        assert_eq!(ModelSize::ALL.len(), 14);
    }

    #[test]
    fn test_every_size_round_trips_through_from_str() {
        for &size in ModelSize::ALL {
            assert_eq!(size.as_str().parse::<ModelSize>().unwrap(), size);
        }
    }

    #[test]
    fn test_unknown_size_is_rejected() {
        let err = "huge".parse::<ModelSize>().unwrap_err();
        assert!(err.to_string().contains("huge"));
    }

    #[test]
    fn test_aliases_share_checkpoints() {
        assert_eq!(
            ModelSize::Large.ggml_file_name(),
            ModelSize::LargeV3.ggml_file_name()
        );
        assert_eq!(
            ModelSize::Turbo.ggml_file_name(),
            ModelSize::LargeV3Turbo.ggml_file_name()
        );
    }

    #[test]
    fn test_download_url_points_at_ggml_file() {
        let url = ModelSize::SmallEn.download_url();
        assert!(url.ends_with("/ggml-small.en.bin"));
        assert!(url.starts_with("https://"));
    }

    #[test]
    fn test_parse_is_case_sensitive() {
        assert!("Tiny".parse::<ModelSize>().is_err());
    }
}
