//! The vocabulary session: the single source of truth the host shell owns
//! and re-renders from.
//!
//! ```text
//! Empty --extract--> Extracted --filter/sort/remove--> Derived
//!   ^                    |  ^                             |
//!   +------clear---------+  +---------extract-------------+
//! ```
//!
//! Every operation is synchronous except image submission, which is guarded
//! so that at most one recognition is in flight.

use std::sync::Arc;
use std::time::Instant;

use log::{debug, info, warn};

use crate::collate::Collation;
use crate::config::SessionConfig;
use crate::dedupe::remove_word;
use crate::error::{ClipboardError, OcrError, SessionError, SetupError, SubmitError};
use crate::export::{self, Clipboard, Notice, NoticeKind};
use crate::extract::{extract, extract_pages};
use crate::normalize::{Normalizer, Token};
use crate::ocr::{ImageToText, OcrEngine};
use crate::stopwords::{self, FilterLevel, StopwordReference};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No list yet, or cleared.
    Empty,
    /// List freshly computed from the latest raw text.
    Extracted,
    /// Filter, sort or remove applied since the last extraction.
    Derived,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOutcome {
    Applied { removed: usize },
    /// The stop-word reference has not arrived yet; nothing changed.
    ReferenceUnavailable,
    EmptyList,
}

/// Proof of the single pending image submission.
#[derive(Debug, PartialEq, Eq)]
pub struct OcrTicket(u64);

impl OcrTicket {
    pub fn id(&self) -> u64 {
        self.0
    }
}

pub struct VocabularySession {
    config: SessionConfig,
    normalizer: Normalizer,
    collation: Collation,
    raw_text: String,
    words: Vec<Token>,
    state: SessionState,
    filter_level: FilterLevel,
    stopwords: Option<Arc<StopwordReference>>,
    pending_ocr: Option<u64>,
    next_ticket: u64,
    notice: Option<Notice>,
}

impl VocabularySession {
    pub fn new(config: SessionConfig) -> Result<Self, SetupError> {
        let normalizer = Normalizer::new(&config.letters)?;
        let collation = Collation::new(&config.collation_locale)?;
        Ok(Self {
            filter_level: config.filter_level,
            config,
            normalizer,
            collation,
            raw_text: String::new(),
            words: Vec::new(),
            state: SessionState::Empty,
            stopwords: None,
            pending_ocr: None,
            next_ticket: 0,
            notice: None,
        })
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn words(&self) -> &[Token] {
        &self.words
    }

    pub fn raw_text(&self) -> &str {
        &self.raw_text
    }

    /// Replace the raw text wholesale. The list is untouched until the next
    /// extraction.
    pub fn set_raw_text(&mut self, text: impl Into<String>) {
        self.raw_text = text.into();
    }

    /// Recompute the list from the current raw text, discarding any earlier
    /// filtering, sorting or removal.
    pub fn extract(&mut self) -> &[Token] {
        self.words = extract(&self.normalizer, &self.raw_text);
        self.state = SessionState::Extracted;
        debug!("Extracted {} words", self.words.len());
        &self.words
    }

    pub fn extract_text(&mut self, raw: impl Into<String>) -> &[Token] {
        self.set_raw_text(raw);
        self.extract()
    }

    /// Extract from several page texts; the raw text becomes the pages
    /// joined by blank lines.
    pub fn extract_pages<S>(&mut self, pages: &[S]) -> &[Token]
    where
        S: AsRef<str> + Sync,
    {
        self.raw_text = pages
            .iter()
            .map(|page| page.as_ref())
            .collect::<Vec<&str>>()
            .join("\n\n");
        self.words = extract_pages(&self.normalizer, pages);
        self.state = SessionState::Extracted;
        debug!("Extracted {} words from {} pages", self.words.len(), pages.len());
        &self.words
    }

    /// Drop `word` (case-insensitively). Returns how many entries went.
    pub fn remove(&mut self, word: &str) -> usize {
        if self.state == SessionState::Empty {
            return 0;
        }
        let before = self.words.len();
        self.words = remove_word(&self.words, word);
        self.state = SessionState::Derived;
        before - self.words.len()
    }

    pub fn filter_level(&self) -> FilterLevel {
        self.filter_level
    }

    pub fn select_filter_level(&mut self, level: FilterLevel) {
        self.filter_level = level;
    }

    /// Install the stop-word reference. Only the first one is kept; returns
    /// whether this call installed it.
    pub fn install_stopwords(&mut self, reference: Arc<StopwordReference>) -> bool {
        if self.stopwords.is_some() {
            warn!("Stop-word reference already installed, ignoring");
            return false;
        }
        info!("Stop-word reference installed ({})", reference.stats());
        self.stopwords = Some(reference);
        true
    }

    pub fn filtering_available(&self) -> bool {
        self.stopwords.is_some()
    }

    /// Apply the selected filter level.
    pub fn filter(&mut self) -> FilterOutcome {
        if self.words.is_empty() {
            return FilterOutcome::EmptyList;
        }
        let Some(reference) = self.stopwords.as_deref() else {
            debug!("Filter requested before stop-word reference loaded");
            return FilterOutcome::ReferenceUnavailable;
        };
        let before = self.words.len();
        self.words = stopwords::filter(&self.words, self.filter_level, reference);
        self.state = SessionState::Derived;
        FilterOutcome::Applied {
            removed: before - self.words.len(),
        }
    }

    pub fn sort(&mut self) {
        if self.words.is_empty() {
            return;
        }
        self.words = self.collation.sort(&self.words);
        self.state = SessionState::Derived;
    }

    pub fn clear(&mut self) {
        self.words.clear();
        if self.config.clear_raw_text_on_clear {
            self.raw_text.clear();
        }
        self.state = SessionState::Empty;
    }

    /// The list as clipboard text.
    pub fn export(&self) -> String {
        export::render(&self.words, self.config.export_case)
    }

    /// Put the export on `clipboard` and raise a transient notice either way.
    /// The list is kept whatever the clipboard does.
    pub fn copy_to<C: Clipboard + ?Sized>(
        &mut self,
        clipboard: &mut C,
        now: Instant,
    ) -> Result<(), ClipboardError> {
        let duration = self.config.copy_notice_duration();
        match clipboard.set_text(&self.export()) {
            Ok(()) => {
                self.notice = Some(Notice::new(NoticeKind::Copied, now, duration));
                Ok(())
            }
            Err(e) => {
                warn!("Copy to clipboard failed: {}", e);
                self.notice = Some(Notice::new(NoticeKind::CopyFailed, now, duration));
                Err(e)
            }
        }
    }

    /// The notice to show at `now`, if any. Expired notices are dropped.
    pub fn notice(&mut self, now: Instant) -> Option<NoticeKind> {
        match self.notice {
            Some(notice) if notice.is_active(now) => Some(notice.kind),
            Some(_) => {
                self.notice = None;
                None
            }
            None => None,
        }
    }

    /// True while an image is being recognized; the shell disables new
    /// submissions meanwhile.
    pub fn is_recognizing(&self) -> bool {
        self.pending_ocr.is_some()
    }

    pub fn begin_image_submission(&mut self) -> Result<OcrTicket, SessionError> {
        if self.pending_ocr.is_some() {
            return Err(SessionError::OcrInFlight);
        }
        self.next_ticket += 1;
        self.pending_ocr = Some(self.next_ticket);
        Ok(OcrTicket(self.next_ticket))
    }

    /// Resolve the pending submission. Recognized text replaces the raw
    /// text; on failure the raw text and list keep their prior values.
    pub fn finish_image_submission(
        &mut self,
        ticket: OcrTicket,
        result: Result<String, OcrError>,
    ) -> Result<(), SubmitError> {
        if self.pending_ocr != Some(ticket.0) {
            return Err(SessionError::StaleTicket(ticket.0).into());
        }
        self.pending_ocr = None;
        let text = result?;
        debug!("Committing {} chars of recognized text", text.len());
        self.raw_text = text;
        Ok(())
    }

    /// Abandon the pending submission without touching the raw text.
    pub fn cancel_image_submission(&mut self, ticket: OcrTicket) -> Result<(), SessionError> {
        if self.pending_ocr != Some(ticket.0) {
            return Err(SessionError::StaleTicket(ticket.0));
        }
        debug!("Image submission {} cancelled", ticket.0);
        self.pending_ocr = None;
        Ok(())
    }

    /// Recognize `image` and commit the text as raw text.
    ///
    /// Dropping the returned future before it resolves cancels the
    /// submission. Shells that need to read the session while recognition
    /// runs use the ticket methods directly.
    pub async fn submit_image<E: OcrEngine>(
        &mut self,
        pipeline: &ImageToText<E>,
        image: &[u8],
    ) -> Result<(), SubmitError> {
        let ticket = self.begin_image_submission()?;
        let mut pending = PendingSubmission {
            session: self,
            ticket: Some(ticket),
        };
        let result = pipeline.recognize(image).await;
        match pending.ticket.take() {
            Some(ticket) => pending.session.finish_image_submission(ticket, result),
            None => Ok(()),
        }
    }
}

/// Clears the in-flight guard if a submission is dropped mid-await.
struct PendingSubmission<'a> {
    session: &'a mut VocabularySession,
    ticket: Option<OcrTicket>,
}

impl Drop for PendingSubmission<'_> {
    fn drop(&mut self) {
        if let Some(ticket) = self.ticket.take() {
            let _ = self.session.cancel_image_submission(ticket);
        }
    }
}
