//! Text normalization: raw text in, case-folded letter-run tokens out.
//!
//! Input is NFKC-normalized first so that decomposed accents, typographic
//! ligatures and full-width forms produce the same tokens as their canonical
//! spellings. Everything that is not a letter (per the active
//! [`LetterPolicy`]) is a separator.

use std::fmt;
use std::ops::Deref;

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;

use crate::dedupe::fold_case;
use crate::error::NormalizeError;

lazy_static! {
    static ref LETTER_RUN: Regex = Regex::new(r"\p{L}+").unwrap();
    static ref LETTER_MARK_RUN: Regex = Regex::new(r"[\p{L}\p{M}]+").unwrap();
}

/// A case-folded run of letters. Never empty, never contains whitespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Token(String);

impl Token {
    /// Fold `word` and wrap it, rejecting empty or whitespace-bearing input.
    pub fn new(word: &str) -> Option<Self> {
        if word.is_empty() || word.chars().any(char::is_whitespace) {
            return None;
        }
        Some(Token(fold_case(word)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl Deref for Token {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Token {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<&str> for Token {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// What counts as a letter when splitting text into tokens.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum LetterPolicy {
    /// Any alphabetic code point (`\p{L}`).
    #[default]
    UnicodeLetters,
    /// Letters plus combining marks, for scripts whose vowel signs do not
    /// compose into a single letter.
    LettersAndMarks,
    /// The body of a regex character class, e.g. `a-zåäö`.
    Custom { class: String },
}

#[derive(Debug, Clone)]
pub struct Normalizer {
    letter_run: Regex,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self {
            letter_run: LETTER_RUN.clone(),
        }
    }
}

impl Normalizer {
    pub fn new(policy: &LetterPolicy) -> Result<Self, NormalizeError> {
        let letter_run = match policy {
            LetterPolicy::UnicodeLetters => LETTER_RUN.clone(),
            LetterPolicy::LettersAndMarks => LETTER_MARK_RUN.clone(),
            LetterPolicy::Custom { class } => Regex::new(&format!("[{class}]+")).map_err(
                |source| NormalizeError::InvalidLetterClass {
                    class: class.clone(),
                    source,
                },
            )?,
        };
        Ok(Self { letter_run })
    }

    /// Split `raw` into tokens in source order, duplicates retained.
    pub fn normalize(&self, raw: &str) -> Vec<Token> {
        let canonical: String = raw.nfkc().collect();
        self.letter_run
            .find_iter(&canonical)
            .filter_map(|m| Token::new(m.as_str()))
            .collect()
    }
}

/// [`Normalizer::normalize`] with the default `\p{L}` policy.
pub fn normalize(raw: &str) -> Vec<Token> {
    Normalizer::default().normalize(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(tokens: &[Token]) -> Vec<&str> {
        tokens.iter().map(Token::as_str).collect()
    }

    #[test]
    fn test_splits_on_punctuation_and_folds_case() {
        let tokens = normalize("Den stora, röda bilen. Bilen var röd.");
        assert_eq!(
            words(&tokens),
            vec!["den", "stora", "röda", "bilen", "bilen", "var", "röd"]
        );
    }

    #[test]
    fn test_separator_only_input_is_empty() {
        assert!(normalize("").is_empty());
        assert!(normalize("  \n\t 12, 3.4 -- !? ").is_empty());
    }

    #[test]
    fn test_digits_split_words() {
        assert_eq!(words(&normalize("abc123def 4x")), vec!["abc", "def", "x"]);
    }

    #[test]
    fn test_non_latin_scripts() {
        assert_eq!(
            words(&normalize("Привет, МИР! Καλημέρα")),
            vec!["привет", "мир", "καλημέρα"]
        );
    }

    #[test]
    fn test_decomposed_accents_match_precomposed() {
        let decomposed = "ro\u{0308}d";
        assert_eq!(words(&normalize(decomposed)), vec!["röd"]);
    }

    #[test]
    fn test_ligatures_expand() {
        assert_eq!(words(&normalize("ﬁsk")), vec!["fisk"]);
    }

    #[test]
    fn test_letters_and_marks_keeps_vowel_signs() {
        let text = "हिन्दी";
        assert!(normalize(text).len() > 1);
        let normalizer = Normalizer::new(&LetterPolicy::LettersAndMarks).unwrap();
        assert_eq!(normalizer.normalize(text).len(), 1);
    }

    #[test]
    fn test_custom_class() {
        let normalizer = Normalizer::new(&LetterPolicy::Custom {
            class: "a-zåäöA-ZÅÄÖ".to_string(),
        })
        .unwrap();
        assert_eq!(words(&normalizer.normalize("Åsa och Ωmega")), vec!["åsa", "och", "mega"]);
    }

    #[test]
    fn test_invalid_custom_class() {
        let result = Normalizer::new(&LetterPolicy::Custom {
            class: "\\p{Nope}".to_string(),
        });
        assert!(matches!(result, Err(NormalizeError::InvalidLetterClass { .. })));
    }

    #[test]
    fn test_token_invariants() {
        assert!(Token::new("").is_none());
        assert!(Token::new("two words").is_none());
        assert_eq!(Token::new("Bilen").unwrap().as_str(), "bilen");
    }
}
