use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum NormalizeError {
    #[error("invalid letter class `{class}`: {source}")]
    InvalidLetterClass {
        class: String,
        #[source]
        source: regex::Error,
    },
}

#[derive(Error, Debug)]
pub enum StopwordError {
    #[error("failed to read stop-word reference {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed stop-word reference: {0}")]
    Json(#[from] serde_json::Error),

    /// Keys must be integers starting at 1.
    #[error("invalid filter level key `{0}`")]
    InvalidLevel(String),

    #[error("failed to fetch stop-word reference: {0}")]
    Fetch(#[from] reqwest::Error),
}

#[derive(Error, Debug)]
pub enum CollateError {
    #[error("invalid locale `{locale}`: {reason}")]
    InvalidLocale { locale: String, reason: String },

    #[error("no collation data for `{locale}`: {reason}")]
    Unsupported { locale: String, reason: String },
}

#[derive(Error, Debug)]
pub enum OcrError {
    #[error("invalid image: {0}")]
    InvalidImage(#[from] image::ImageError),

    #[error("OCR engine I/O failed: {0}")]
    Io(#[source] std::io::Error),

    #[error("OCR recognition failed: {0}")]
    Recognition(String),

    #[error("failed to decode OCR output: {0}")]
    Decode(#[from] std::string::FromUtf8Error),
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SessionError {
    #[error("an image is already being recognized")]
    OcrInFlight,

    #[error("OCR ticket {0} does not match the pending submission")]
    StaleTicket(u64),

    #[error("filter level must be at least 1, got {0}")]
    InvalidFilterLevel(u32),
}

#[derive(Error, Debug)]
pub enum ClipboardError {
    #[error("clipboard access denied")]
    Denied,

    #[error("clipboard unavailable: {0}")]
    Unavailable(String),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed config: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum SetupError {
    #[error(transparent)]
    Normalize(#[from] NormalizeError),

    #[error(transparent)]
    Collate(#[from] CollateError),
}

#[derive(Error, Debug)]
pub enum SubmitError {
    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Ocr(#[from] OcrError),
}
