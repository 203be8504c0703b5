//! Locale-aware alphabetical ordering.

use std::cmp::Ordering;

use icu::collator::options::CollatorOptions;
use icu::collator::{Collator, CollatorBorrowed};
use icu::locale::Locale;

use crate::error::CollateError;
use crate::normalize::Token;

/// An ICU collator for one locale, e.g. `sv` sorts å, ä, ö after z.
pub struct Collation {
    locale: String,
    collator: CollatorBorrowed<'static>,
}

impl Collation {
    pub fn new(locale_tag: &str) -> Result<Self, CollateError> {
        let locale = locale_tag
            .parse::<Locale>()
            .map_err(|e| CollateError::InvalidLocale {
                locale: locale_tag.to_string(),
                reason: e.to_string(),
            })?;
        let collator = Collator::try_new(locale.into(), CollatorOptions::default()).map_err(
            |e| CollateError::Unsupported {
                locale: locale_tag.to_string(),
                reason: e.to_string(),
            },
        )?;
        Ok(Self {
            locale: locale_tag.to_string(),
            collator,
        })
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// Collation order, falling back to code-point order so that distinct
    /// strings never compare equal.
    pub fn compare(&self, a: &str, b: &str) -> Ordering {
        self.collator.compare(a, b).then_with(|| a.cmp(b))
    }

    /// A sorted copy of `list`; the input is left untouched.
    pub fn sort(&self, list: &[Token]) -> Vec<Token> {
        let mut sorted = list.to_vec();
        sorted.sort_by(|a, b| self.compare(a, b));
        sorted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(words: &[&str]) -> Vec<Token> {
        words.iter().filter_map(|w| Token::new(w)).collect()
    }

    #[test]
    fn test_swedish_letters_sort_after_z() {
        let collation = Collation::new("sv").unwrap();
        let list = tokens(&["öl", "zebra", "ål", "apa", "äpple"]);
        assert_eq!(
            collation.sort(&list),
            tokens(&["apa", "zebra", "ål", "äpple", "öl"])
        );
    }

    #[test]
    fn test_german_folds_umlaut_onto_base_letter() {
        let collation = Collation::new("de").unwrap();
        let list = tokens(&["zug", "öl", "ofen"]);
        assert_eq!(collation.sort(&list), tokens(&["ofen", "öl", "zug"]));
    }

    #[test]
    fn test_sort_leaves_input_untouched() {
        let collation = Collation::new("sv").unwrap();
        let list = tokens(&["stora", "röda", "bilen", "röd"]);
        let sorted = collation.sort(&list);
        assert_eq!(list, tokens(&["stora", "röda", "bilen", "röd"]));
        assert_eq!(sorted, tokens(&["bilen", "röd", "röda", "stora"]));
    }

    #[test]
    fn test_sort_is_idempotent_and_order_independent() {
        let collation = Collation::new("sv").unwrap();
        let list = tokens(&["hus", "ärta", "bok", "åka", "ö", "a"]);
        let sorted = collation.sort(&list);
        assert_eq!(collation.sort(&sorted), sorted);

        let mut reversed = list.clone();
        reversed.reverse();
        assert_eq!(collation.sort(&reversed), sorted);
    }

    #[test]
    fn test_invalid_locale() {
        assert!(matches!(
            Collation::new("not a locale!"),
            Err(CollateError::InvalidLocale { .. })
        ));
    }
}
