//! Vocabulary extraction: free-form text (typed, pasted or recognized from a
//! photographed page) in, a deduplicated word list out, optionally filtered
//! against tiered stop-words and sorted in locale order.

pub mod cleanup;
pub mod collate;
pub mod config;
pub mod dedupe;
pub mod error;
pub mod export;
pub mod extract;
pub mod normalize;
pub mod ocr;
pub mod preprocess;
pub mod session;
pub mod stopwords;

#[cfg(feature = "python")]
mod python;

pub use cleanup::clean_ocr_text;
pub use collate::Collation;
pub use config::SessionConfig;
pub use dedupe::{dedupe, remove_word, subtract_case_insensitive};
pub use export::{Clipboard, ExportCase, NoticeKind};
pub use extract::{extract, extract_pages};
pub use normalize::{normalize, LetterPolicy, Normalizer, Token};
pub use ocr::{ImageToText, LanguageHint, OcrEngine, TesseractEngine};
pub use preprocess::{Binarize, ImagePreprocessor, Passthrough};
pub use session::{FilterOutcome, OcrTicket, SessionState, VocabularySession};
pub use stopwords::{filter, FilterLevel, StopwordReference};
