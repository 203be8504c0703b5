//! Image-to-text: decode, enhance, recognize, clean.
//!
//! The recognizer itself is a black box behind [`OcrEngine`]. Its output is
//! accepted as-is apart from [`clean_ocr_text`]; no confidence scores are
//! consulted.

use std::fmt;
use std::future::Future;
use std::io::Cursor;
use std::process::Stdio;

use image::{DynamicImage, ImageFormat};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::cleanup::clean_ocr_text;
use crate::config::SessionConfig;
use crate::error::OcrError;
use crate::preprocess::{Binarize, ImagePreprocessor, Passthrough};

const TESSERACT_EXECUTABLE: &str = "tesseract";
const TESSERACT_INPUT_SOURCE: &str = "stdin";
const TESSERACT_OUTPUT_TARGET: &str = "stdout";
const TESSERACT_PAGE_SEGMENT_MODE: &str = "3";

/// ISO 639-1 codes joined with `+`, e.g. `sv` or `sv+en`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct LanguageHint(String);

impl From<String> for LanguageHint {
    fn from(hint: String) -> Self {
        LanguageHint::new(&hint)
    }
}

impl From<LanguageHint> for String {
    fn from(hint: LanguageHint) -> String {
        hint.0
    }
}

impl LanguageHint {
    pub fn new(hint: &str) -> Self {
        Self(hint.trim().to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Tesseract's three-letter codes for each language in the hint.
    /// Unknown codes pass through unchanged.
    pub fn tesseract_code(&self) -> String {
        self.0
            .split('+')
            .map(str::trim)
            .filter(|code| !code.is_empty())
            .map(|code| match code {
                "sv" => "swe",
                "en" => "eng",
                "de" => "deu",
                "fr" => "fra",
                "es" => "spa",
                "it" => "ita",
                "nl" => "nld",
                "da" => "dan",
                "no" | "nb" => "nor",
                "fi" => "fin",
                "pl" => "pol",
                "pt" => "por",
                "ru" => "rus",
                other => other,
            })
            .collect::<Vec<_>>()
            .join("+")
    }
}

impl fmt::Display for LanguageHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub trait OcrEngine {
    fn recognize(
        &self,
        image: &DynamicImage,
        language: &LanguageHint,
    ) -> impl Future<Output = Result<String, OcrError>> + Send;
}

/// Runs the `tesseract` executable, feeding a PNG on stdin.
#[derive(Debug, Clone)]
pub struct TesseractEngine {
    executable: String,
    page_segment_mode: String,
}

impl Default for TesseractEngine {
    fn default() -> Self {
        Self {
            executable: TESSERACT_EXECUTABLE.to_string(),
            page_segment_mode: TESSERACT_PAGE_SEGMENT_MODE.to_string(),
        }
    }
}

impl TesseractEngine {
    pub fn with_executable(mut self, executable: impl Into<String>) -> Self {
        self.executable = executable.into();
        self
    }

    pub fn with_page_segment_mode(mut self, mode: impl Into<String>) -> Self {
        self.page_segment_mode = mode.into();
        self
    }
}

impl OcrEngine for TesseractEngine {
    async fn recognize(
        &self,
        image: &DynamicImage,
        language: &LanguageHint,
    ) -> Result<String, OcrError> {
        let mut png = Vec::new();
        image.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;

        let mut child = Command::new(&self.executable)
            .arg(TESSERACT_INPUT_SOURCE)
            .arg(TESSERACT_OUTPUT_TARGET)
            .arg("-l")
            .arg(language.tesseract_code())
            .arg("--psm")
            .arg(&self.page_segment_mode)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(OcrError::Io)?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(&png).await.map_err(OcrError::Io)?;
        }
        let output = child.wait_with_output().await.map_err(OcrError::Io)?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            if stderr.trim().is_empty() {
                return Err(OcrError::Recognition(format!(
                    "tesseract exited with status {}",
                    output.status
                )));
            }
            return Err(OcrError::Recognition(stderr.trim().to_string()));
        }

        let text = String::from_utf8(output.stdout)?;
        Ok(text.trim().to_string())
    }
}

/// The whole image-to-text round trip as one awaitable operation.
pub struct ImageToText<E> {
    engine: E,
    preprocessor: Box<dyn ImagePreprocessor + Send + Sync>,
    language: LanguageHint,
}

impl<E: OcrEngine> ImageToText<E> {
    pub fn new(
        engine: E,
        preprocessor: Box<dyn ImagePreprocessor + Send + Sync>,
        language: LanguageHint,
    ) -> Self {
        Self {
            engine,
            preprocessor,
            language,
        }
    }

    pub fn from_config(engine: E, config: &SessionConfig) -> Self {
        let preprocessor: Box<dyn ImagePreprocessor + Send + Sync> = if config.preprocess_images {
            Box::new(Binarize)
        } else {
            Box::new(Passthrough)
        };
        Self::new(engine, preprocessor, config.language.clone())
    }

    pub fn language(&self) -> &LanguageHint {
        &self.language
    }

    /// Decode `bytes`, enhance, recognize, and clean the recognized text.
    pub async fn recognize(&self, bytes: &[u8]) -> Result<String, OcrError> {
        let image = image::load_from_memory(bytes)?;
        debug!("Recognizing {}x{} image ({})", image.width(), image.height(), self.language);
        let enhanced = self.preprocessor.preprocess(image);
        let text = self
            .engine
            .recognize(&enhanced, &self.language)
            .await
            .inspect_err(|e| warn!("OCR failed: {}", e))?;
        let (cleaned, subs) = clean_ocr_text(&text);
        debug!("Recognized {} chars, {} cleanup substitutions", cleaned.len(), subs);
        Ok(cleaned)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use image::{GrayImage, Luma};

    /// Returns fixed text, or fails when `text` is `None`.
    pub(crate) struct FakeEngine {
        pub text: Option<String>,
    }

    impl OcrEngine for FakeEngine {
        async fn recognize(
            &self,
            _image: &DynamicImage,
            _language: &LanguageHint,
        ) -> Result<String, OcrError> {
            self.text
                .clone()
                .ok_or_else(|| OcrError::Recognition("unreadable page".to_string()))
        }
    }

    pub(crate) fn png_bytes() -> Vec<u8> {
        let image = DynamicImage::ImageLuma8(GrayImage::from_pixel(8, 8, Luma([200])));
        let mut bytes = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn test_tesseract_codes() {
        assert_eq!(LanguageHint::new("sv").tesseract_code(), "swe");
        assert_eq!(LanguageHint::new("SV+en").tesseract_code(), "swe+eng");
        assert_eq!(LanguageHint::new("sv+ukr").tesseract_code(), "swe+ukr");
    }

    #[tokio::test]
    async fn test_recognized_text_is_cleaned() {
        let pipeline = ImageToText::from_config(
            FakeEngine {
                text: Some("röda bi-\nlen".to_string()),
            },
            &SessionConfig::default(),
        );
        assert_eq!(pipeline.recognize(&png_bytes()).await.unwrap(), "röda bilen");
    }

    #[tokio::test]
    async fn test_invalid_image() {
        let pipeline = ImageToText::from_config(
            FakeEngine {
                text: Some("text".to_string()),
            },
            &SessionConfig::default(),
        );
        let result = pipeline.recognize(b"not an image").await;
        assert!(matches!(result, Err(OcrError::InvalidImage(_))));
    }

    #[tokio::test]
    async fn test_engine_failure_propagates() {
        let pipeline = ImageToText::from_config(FakeEngine { text: None }, &SessionConfig::default());
        let result = pipeline.recognize(&png_bytes()).await;
        assert!(matches!(result, Err(OcrError::Recognition(_))));
    }

    #[tokio::test]
    async fn test_missing_executable() {
        let engine = TesseractEngine::default().with_executable("/nonexistent/tesseract");
        let image = DynamicImage::ImageLuma8(GrayImage::from_pixel(2, 2, Luma([0])));
        let result = engine.recognize(&image, &LanguageHint::new("sv")).await;
        assert!(matches!(result, Err(OcrError::Io(_))));
    }
}
