//! Raw text to vocabulary list: normalize, then dedupe.

use rayon::prelude::*;

use crate::dedupe::dedupe;
use crate::normalize::{Normalizer, Token};

pub fn extract(normalizer: &Normalizer, raw: &str) -> Vec<Token> {
    dedupe(&normalizer.normalize(raw))
}

/// Extract several pages at once, e.g. one text per photographed page.
///
/// Pages are normalized in parallel; the result is the same list as
/// extracting the pages joined by newlines.
pub fn extract_pages<S>(normalizer: &Normalizer, pages: &[S]) -> Vec<Token>
where
    S: AsRef<str> + Sync,
{
    let per_page: Vec<Vec<Token>> = pages
        .par_iter()
        .map(|page| extract(normalizer, page.as_ref()))
        .collect();
    let merged: Vec<Token> = per_page.into_iter().flatten().collect();
    dedupe(&merged)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_follows_first_occurrence() {
        let list = extract(&Normalizer::default(), "Cat dog cat bird dog");
        let words: Vec<&str> = list.iter().map(Token::as_str).collect();
        assert_eq!(words, vec!["cat", "dog", "bird"]);
    }

    #[test]
    fn test_pages_match_joined_text() {
        let normalizer = Normalizer::default();
        let pages = vec![
            "Den stora, röda bilen.".to_string(),
            "Bilen var röd.".to_string(),
            String::new(),
            "Huset var stort; bilen också".to_string(),
        ];
        let joined = pages.join("\n");
        assert_eq!(
            extract_pages(&normalizer, &pages),
            extract(&normalizer, &joined)
        );
    }

    #[test]
    fn test_no_pages() {
        let pages: [&str; 0] = [];
        assert!(extract_pages(&Normalizer::default(), &pages).is_empty());
    }
}
