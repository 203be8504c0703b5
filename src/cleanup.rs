//! Cleanup of recognized text before it becomes raw text.
//!
//! Page scans break words across lines with a hyphen and carry typographic
//! ligatures the recognizer passes through verbatim. Left alone, "bi-\nlen"
//! would tokenize as two words.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref OCR_PATTERNS: Vec<(Regex, &'static str)> = {
        vec![
            // Word hyphenated across a line break, continued in lower case
            (Regex::new(r"(\p{L})-[ \t]*\r?\n[ \t]*(\p{Ll})").unwrap(), "${1}${2}"),
            // Soft hyphen
            (Regex::new("\u{00AD}").unwrap(), ""),

            // Ligatures
            (Regex::new(r"ﬁ").unwrap(), "fi"),
            (Regex::new(r"ﬂ").unwrap(), "fl"),
            (Regex::new(r"ﬀ").unwrap(), "ff"),
            (Regex::new(r"ﬃ").unwrap(), "ffi"),
            (Regex::new(r"ﬄ").unwrap(), "ffl"),
            (Regex::new(r"ﬆ").unwrap(), "st"),

            // Long s
            (Regex::new(r"ſ").unwrap(), "s"),
        ]
    };
}

/// Returns the cleaned text and the number of substitutions made.
pub fn clean_ocr_text(text: &str) -> (String, u64) {
    let mut result = text.to_string();
    let mut total_subs: u64 = 0;

    // Repeat until stable: a one-letter segment between two line-end
    // hyphens is consumed by the first join.
    for (pattern, replacement) in OCR_PATTERNS.iter() {
        loop {
            let count = pattern.find_iter(&result).count();
            if count == 0 {
                break;
            }
            result = pattern.replace_all(&result, *replacement).into_owned();
            total_subs += count as u64;
        }
    }

    (result, total_subs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_joins_hyphenated_line_break() {
        let (cleaned, subs) = clean_ocr_text("Den röda bi-\nlen stod still.");
        assert_eq!(cleaned, "Den röda bilen stod still.");
        assert_eq!(subs, 1);
    }

    #[test]
    fn test_joins_chained_line_breaks() {
        assert_eq!(clean_ocr_text("a-\nb-\nc"), ("abc".to_string(), 2));
    }

    #[test]
    fn test_keeps_capitalized_continuation() {
        let (cleaned, subs) = clean_ocr_text("Nord-\nAmerika");
        assert_eq!(cleaned, "Nord-\nAmerika");
        assert_eq!(subs, 0);
    }

    #[test]
    fn test_handles_crlf_and_indent() {
        let (cleaned, _) = clean_ocr_text("sko-\r\n   lan");
        assert_eq!(cleaned, "skolan");
    }

    #[test]
    fn test_ligatures_and_soft_hyphens() {
        let (cleaned, subs) = clean_ocr_text("ﬁsk och ﬂod, ord\u{00AD}lista");
        assert_eq!(cleaned, "fisk och flod, ordlista");
        assert_eq!(subs, 3);
    }

    #[test]
    fn test_clean_text_untouched() {
        let text = "Bilen var röd.";
        assert_eq!(clean_ocr_text(text), (text.to_string(), 0));
    }
}
