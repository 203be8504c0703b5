//! Order-preserving deduplication and case-insensitive set difference.

use std::collections::HashSet;

use crate::normalize::Token;

/// Canonical lower form used for every equality test on words.
pub fn fold_case(word: &str) -> String {
    word.to_lowercase()
}

/// Keep the first occurrence of each token, in first-seen order.
pub fn dedupe(tokens: &[Token]) -> Vec<Token> {
    let mut seen: HashSet<&str> = HashSet::with_capacity(tokens.len());
    let mut unique = Vec::with_capacity(tokens.len());
    for token in tokens {
        if seen.insert(token.as_str()) {
            unique.push(token.clone());
        }
    }
    unique
}

/// Every entry of `list` whose folded form is absent from `exclusion`.
///
/// `exclusion` must already hold folded words.
pub fn subtract_case_insensitive(list: &[Token], exclusion: &HashSet<String>) -> Vec<Token> {
    if exclusion.is_empty() {
        return list.to_vec();
    }
    list.iter()
        .filter(|token| !exclusion.contains(&fold_case(token)))
        .cloned()
        .collect()
}

pub fn remove_word(list: &[Token], word: &str) -> Vec<Token> {
    let exclusion = HashSet::from([fold_case(word)]);
    subtract_case_insensitive(list, &exclusion)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize;

    fn tokens(words: &[&str]) -> Vec<Token> {
        words.iter().filter_map(|w| Token::new(w)).collect()
    }

    #[test]
    fn test_first_occurrence_wins() {
        let list = dedupe(&normalize("Cat dog cat bird dog"));
        assert_eq!(list, tokens(&["cat", "dog", "bird"]));
    }

    #[test]
    fn test_extraction_is_idempotent() {
        let text = "Den stora, röda bilen. Bilen var röd.";
        assert_eq!(dedupe(&normalize(text)), dedupe(&normalize(text)));
        let once = dedupe(&normalize(text));
        assert_eq!(dedupe(&once), once);
    }

    #[test]
    fn test_case_insensitive_uniqueness() {
        let list = dedupe(&normalize("Hus HUS hus hUs båt BÅT"));
        for (i, a) in list.iter().enumerate() {
            for b in &list[i + 1..] {
                assert_ne!(fold_case(a), fold_case(b));
            }
        }
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn test_remove_is_case_insensitive() {
        let list = tokens(&["den", "stora", "röda", "bilen"]);
        let removed = remove_word(&list, "RÖDA");
        assert_eq!(removed, tokens(&["den", "stora", "bilen"]));
    }

    #[test]
    fn test_remove_missing_word_keeps_everything() {
        let list = tokens(&["a", "b"]);
        assert_eq!(remove_word(&list, "c"), list);
    }

    #[test]
    fn test_subtract_with_empty_exclusion() {
        let list = tokens(&["ett", "två"]);
        assert_eq!(subtract_case_insensitive(&list, &HashSet::new()), list);
    }
}
