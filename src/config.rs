use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::export::ExportCase;
use crate::normalize::LetterPolicy;
use crate::ocr::LanguageHint;
use crate::stopwords::FilterLevel;

/// Session settings. Every field has a default, so `{}` is a valid config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub language: LanguageHint,
    pub collation_locale: String,
    pub letters: LetterPolicy,
    pub filter_level: FilterLevel,
    pub clear_raw_text_on_clear: bool,
    pub copy_notice_secs: u64,
    pub export_case: ExportCase,
    pub preprocess_images: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            language: LanguageHint::new("sv"),
            collation_locale: "sv".to_string(),
            letters: LetterPolicy::default(),
            filter_level: FilterLevel::LOWEST,
            clear_raw_text_on_clear: false,
            copy_notice_secs: 3,
            export_case: ExportCase::AsIs,
            preprocess_images: true,
        }
    }
}

impl SessionConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&content)
    }

    pub fn copy_notice_duration(&self) -> Duration {
        Duration::from_secs(self.copy_notice_secs)
    }
}
