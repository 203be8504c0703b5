//! Python bindings for host shells written in Python.

use std::sync::Arc;

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use crate::cleanup;
use crate::config::SessionConfig;
use crate::extract::extract;
use crate::normalize::{Normalizer, Token};
use crate::session::{FilterOutcome, SessionState, VocabularySession};
use crate::stopwords::{FilterLevel, StopwordReference};

fn to_strings(words: &[Token]) -> Vec<String> {
    words.iter().map(Token::to_string).collect()
}

#[pyclass(name = "Session", unsendable)]
struct PySession {
    inner: VocabularySession,
}

#[pymethods]
impl PySession {
    #[new]
    #[pyo3(signature = (config_json=None))]
    fn new(config_json: Option<&str>) -> PyResult<Self> {
        let config = match config_json {
            Some(json) => SessionConfig::from_json_str(json)
                .map_err(|e| PyValueError::new_err(e.to_string()))?,
            None => SessionConfig::default(),
        };
        let inner =
            VocabularySession::new(config).map_err(|e| PyValueError::new_err(e.to_string()))?;
        Ok(Self { inner })
    }

    fn set_raw_text(&mut self, text: String) {
        self.inner.set_raw_text(text);
    }

    #[pyo3(signature = (text=None))]
    fn extract(&mut self, text: Option<String>) -> Vec<String> {
        match text {
            Some(text) => to_strings(self.inner.extract_text(text)),
            None => to_strings(self.inner.extract()),
        }
    }

    fn extract_pages(&mut self, pages: Vec<String>) -> Vec<String> {
        to_strings(self.inner.extract_pages(pages.as_slice()))
    }

    fn remove(&mut self, word: &str) -> usize {
        self.inner.remove(word)
    }

    fn select_filter_level(&mut self, level: u32) -> PyResult<()> {
        let level = FilterLevel::new(level).map_err(|e| PyValueError::new_err(e.to_string()))?;
        self.inner.select_filter_level(level);
        Ok(())
    }

    /// Install the stop-word reference from its JSON form.
    fn load_stopwords(&mut self, json: &str) -> PyResult<bool> {
        let reference = StopwordReference::from_json_str(json)
            .map_err(|e| PyValueError::new_err(e.to_string()))?;
        Ok(self.inner.install_stopwords(Arc::new(reference)))
    }

    /// Returns the number of words removed. Before the stop-word reference
    /// is loaded nothing is removed; check `filtering_available`.
    fn filter(&mut self) -> usize {
        match self.inner.filter() {
            FilterOutcome::Applied { removed } => removed,
            FilterOutcome::EmptyList | FilterOutcome::ReferenceUnavailable => 0,
        }
    }

    #[getter]
    fn filtering_available(&self) -> bool {
        self.inner.filtering_available()
    }

    fn sort(&mut self) {
        self.inner.sort();
    }

    fn clear(&mut self) {
        self.inner.clear();
    }

    fn export(&self) -> String {
        self.inner.export()
    }

    #[getter]
    fn words(&self) -> Vec<String> {
        to_strings(self.inner.words())
    }

    #[getter]
    fn raw_text(&self) -> String {
        self.inner.raw_text().to_string()
    }

    #[getter]
    fn state(&self) -> &'static str {
        match self.inner.state() {
            SessionState::Empty => "empty",
            SessionState::Extracted => "extracted",
            SessionState::Derived => "derived",
        }
    }
}

/// Normalize and dedupe `text` with the default letter policy.
#[pyfunction]
fn extract_words(text: &str) -> Vec<String> {
    to_strings(&extract(&Normalizer::default(), text))
}

/// Clean recognized text. Returns: (cleaned_text, substitution_count)
#[pyfunction]
fn clean_ocr_text(text: &str) -> (String, u64) {
    cleanup::clean_ocr_text(text)
}

#[pymodule]
fn ordlista(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(extract_words, m)?)?;
    m.add_function(wrap_pyfunction!(clean_ocr_text, m)?)?;
    m.add_class::<PySession>()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_without_reference_is_noop() {
        let mut session = PySession::new(None).unwrap();
        session.extract(Some("den stora bilen".to_string()));
        assert!(!session.filtering_available());
        assert_eq!(session.filter(), 0);
        assert_eq!(session.words(), vec!["den", "stora", "bilen"]);

        assert!(session.load_stopwords(r#"{ "1": ["den"] }"#).unwrap());
        assert!(session.filtering_available());
        assert_eq!(session.filter(), 1);
    }
}
