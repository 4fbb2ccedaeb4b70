//! Stable, punctuation-aware token split shared by the ranker and the
//! entity detector. Works for both scripts.

use std::sync::LazyLock;

use regex::Regex;

static TOKEN_SPLIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\x{0900}-\x{097F}]+").unwrap());

/// Lowercases and splits on anything that is neither a word character nor a
/// Devanagari code point; keeps tokens of at least two characters.
pub fn tokenize_query(q: &str) -> Vec<String> {
    let lower = q.to_lowercase();
    TOKEN_SPLIT
        .split(&lower)
        .filter(|t| t.chars().count() >= 2)
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_punctuation_and_drops_short_tokens() {
        assert_eq!(
            tokenize_query("Asha-workers, in Bihar!"),
            vec!["asha", "workers", "in", "bihar"]
        );
    }

    #[test]
    fn keeps_devanagari_tokens() {
        assert_eq!(tokenize_query("बिहार स्वास्थ्य"), vec!["बिहार", "स्वास्थ्य"]);
    }

    #[test]
    fn single_char_tokens_are_dropped() {
        assert_eq!(tokenize_query("a b कup"), vec!["कup"]);
    }
}
