//! Conservative Devanagari text normalization.
//!
//! The transform is idempotent and never alters meaning: encoding repair,
//! NFKC, zero-width removal, whitespace canonicalization and punctuation
//! spacing only.

use std::sync::LazyLock;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

use crate::is_devanagari;

static SPACE_TAB_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[ \t]+").unwrap());
static NEWLINE_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{3,}").unwrap());

/// Punctuation that takes spacing rules in Devanagari prose.
const SPACED_PUNCT: [char; 6] = ['।', ',', ';', ':', '!', '?'];

/// Normalizes a raw article or query string.
///
/// Steps, in order: mojibake repair, NFKC, zero-width removal, newline
/// canonicalization, space/tab collapse, newline-run collapse, trim,
/// punctuation spacing. Empty input stays empty.
pub fn normalize(s: &str) -> String {
    if s.is_empty() {
        return String::new();
    }

    let repaired = repair_mojibake(s);
    let mut t: String = repaired.nfkc().collect();

    for zw in ['\u{200b}', '\u{200c}', '\u{200d}', '\u{feff}'] {
        if t.contains(zw) {
            t = t.replace(zw, "");
        }
    }

    let t = t.replace("\r\n", "\n").replace('\r', "\n");
    let t = SPACE_TAB_RUN.replace_all(&t, " ");
    let t = NEWLINE_RUN.replace_all(&t, "\n\n");

    space_punctuation(t.trim())
}

/// Repairs UTF-8 text that was decoded as Latin-1 somewhere upstream.
///
/// Devanagari mojibake shows up as `à¤`/`à¥` clusters. The repair is applied
/// only when the whole string fits a Latin-1 round trip and decoding strictly
/// increases the Devanagari character count; anything else passes through.
fn repair_mojibake(s: &str) -> String {
    if !s.contains('\u{00e0}') {
        return s.to_string();
    }

    let bytes: Option<Vec<u8>> = s
        .chars()
        .map(|c| {
            let u = c as u32;
            if u <= 0xFF { Some(u as u8) } else { None }
        })
        .collect();

    let Some(bytes) = bytes else {
        return s.to_string();
    };

    match String::from_utf8(bytes) {
        Ok(decoded) if devanagari_count(&decoded) > devanagari_count(s) => decoded,
        _ => s.to_string(),
    }
}

fn devanagari_count(s: &str) -> usize {
    s.chars().filter(|c| is_devanagari(*c)).count()
}

/// Applies the punctuation spacing rules: no whitespace before `। , ; : ! ?`,
/// exactly one space after when the next character is neither whitespace nor
/// another spaced punctuation mark.
fn space_punctuation(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut out = String::with_capacity(s.len());

    for (i, &c) in chars.iter().enumerate() {
        if SPACED_PUNCT.contains(&c) {
            while out.ends_with(' ') || out.ends_with('\t') {
                out.pop();
            }
            out.push(c);
            match chars.get(i + 1) {
                Some(&next) if !next.is_whitespace() && !SPACED_PUNCT.contains(&next) => {
                    out.push(' ');
                }
                _ => {}
            }
            continue;
        }
        out.push(c);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_stays_empty() {
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn collapses_whitespace_runs() {
        assert_eq!(normalize("स्वास्थ्य   केंद्र\t\tबिहार"), "स्वास्थ्य केंद्र बिहार");
    }

    #[test]
    fn collapses_newline_runs_to_paragraph_break() {
        assert_eq!(normalize("पहला\n\n\n\nदूसरा"), "पहला\n\nदूसरा");
    }

    #[test]
    fn strips_zero_width_characters() {
        assert_eq!(normalize("हि\u{200b}न्\u{200d}दी"), "हिन्दी");
    }

    #[test]
    fn spaces_danda_correctly() {
        assert_eq!(normalize("पहला वाक्य ।दूसरा"), "पहला वाक्य। दूसरा");
        assert_eq!(normalize("पहला वाक्य।दूसरा"), "पहला वाक्य। दूसरा");
    }

    #[test]
    fn repairs_devanagari_mojibake() {
        // "हिन्दी" encoded as UTF-8 and read back as Latin-1.
        let broken: String = "हिन्दी".bytes().map(|b| b as char).collect();
        assert_eq!(normalize(&broken), "हिन्दी");
    }

    #[test]
    fn leaves_clean_latin_text_alone() {
        assert_eq!(normalize("asha workers"), "asha workers");
    }

    #[test]
    fn idempotent() {
        for raw in [
            "  स्वास्थ्य   ।केंद्र  \n\n\nबिहार ",
            "क्या हाल?ठीक!",
            "plain roman text, with commas",
        ] {
            let once = normalize(raw);
            assert_eq!(normalize(&once), once);
        }
    }
}
