use std::fs;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use mediascribe_core::shared::model_size::ModelSize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Appearance {
    Light,
    Dark,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Stored as the catalog name so the file stays readable by hand.
    pub model_size: String,
    pub appearance: Appearance,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            model_size: ModelSize::Small.as_str().to_string(),
            appearance: Appearance::Light,
        }
    }
}

impl Settings {
    fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("MediaScribe").join("settings.json"))
    }

    pub fn load() -> Self {
        Self::config_path()
            .and_then(|path| fs::read_to_string(path).ok())
            .and_then(|json| serde_json::from_str(&json).ok())
            .unwrap_or_default()
    }

    pub fn save(&self) {
        if let Some(path) = Self::config_path() {
            if let Some(parent) = path.parent() {
                let _ = fs::create_dir_all(parent);
            }
            if let Ok(json) = serde_json::to_string_pretty(self) {
                let _ = fs::write(path, json);
            }
        }
    }

    /// The persisted model size, falling back to the default when the stored
    /// name is stale or hand-edited into something unknown.
    pub fn model(&self) -> ModelSize {
        ModelSize::from_str(&self.model_size).unwrap_or(ModelSize::Small)
    }
}
