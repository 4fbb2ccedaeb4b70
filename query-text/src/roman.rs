//! Devanagari romanization and roman normal forms.
//!
//! Two distinct normal forms exist on purpose:
//! - [`roman_normalize`] is the aggressive index-time form (single vowels,
//!   `v` -> `w`, drift rules). Both the indexed roman fields and roman-mode
//!   queries go through it, so the two sides always agree.
//! - [`roman_match_norm`] is the lighter form used for gazetteer values and
//!   roman entity matching; it keeps double vowels so metadata strings that
//!   are already roman-ish stay recognizable.

use std::sync::LazyLock;

use regex::Regex;

const VIRAMA: char = '\u{094D}';
const NUKTA: char = '\u{093C}';

/// Deterministic Devanagari -> Harvard-Kyoto transliteration.
///
/// Consonants carry the inherent `a` unless followed by a matra or virama.
/// Characters outside the mapping pass through unchanged; the function never
/// fails.
pub fn devanagari_to_roman(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut out = String::with_capacity(s.len());
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        if let Some(base) = consonant(c) {
            let mut base = base;
            if chars.get(i + 1) == Some(&NUKTA) {
                base = nukta_variant(c).unwrap_or(base);
                i += 1;
            }
            out.push_str(base);
            match chars.get(i + 1) {
                Some(&VIRAMA) => {
                    i += 2;
                }
                Some(&m) if matra(m).is_some() => {
                    out.push_str(matra(m).unwrap());
                    i += 2;
                }
                _ => {
                    out.push('a');
                    i += 1;
                }
            }
            continue;
        }

        if let Some(v) = independent_vowel(c) {
            out.push_str(v);
            i += 1;
            continue;
        }

        if let Some(sign) = sign(c) {
            out.push_str(sign);
            i += 1;
            continue;
        }

        out.push(c);
        i += 1;
    }

    out
}

fn consonant(c: char) -> Option<&'static str> {
    Some(match c {
        'क' => "k",
        'ख' => "kh",
        'ग' => "g",
        'घ' => "gh",
        'ङ' => "G",
        'च' => "c",
        'छ' => "ch",
        'ज' => "j",
        'झ' => "jh",
        'ञ' => "J",
        'ट' => "T",
        'ठ' => "Th",
        'ड' => "D",
        'ढ' => "Dh",
        'ण' => "N",
        'त' => "t",
        'थ' => "th",
        'द' => "d",
        'ध' => "dh",
        'न' => "n",
        'प' => "p",
        'फ' => "ph",
        'ब' => "b",
        'भ' => "bh",
        'म' => "m",
        'य' => "y",
        'र' => "r",
        'ल' => "l",
        'ळ' => "L",
        'व' => "v",
        'श' => "z",
        'ष' => "S",
        'स' => "s",
        'ह' => "h",
        // Precomposed nukta consonants common in Hindi loanwords.
        '\u{958}' => "q",
        '\u{959}' => "kh",
        '\u{95a}' => "g",
        '\u{95b}' => "z",
        '\u{95c}' => "r",
        '\u{95d}' => "rh",
        '\u{95e}' => "f",
        '\u{95f}' => "y",
        _ => return None,
    })
}

/// Loanword variant selected when a combining nukta follows the base letter.
fn nukta_variant(c: char) -> Option<&'static str> {
    Some(match c {
        'क' => "q",
        'ख' => "kh",
        'ग' => "g",
        'ज' => "z",
        'ड' => "r",
        'ढ' => "rh",
        'फ' => "f",
        'य' => "y",
        _ => return None,
    })
}

fn independent_vowel(c: char) -> Option<&'static str> {
    Some(match c {
        'अ' => "a",
        'आ' => "A",
        'इ' => "i",
        'ई' => "I",
        'उ' => "u",
        'ऊ' => "U",
        'ऋ' => "R",
        'ॠ' => "RR",
        'ऌ' => "lR",
        'ॡ' => "lRR",
        'ए' => "e",
        'ऐ' => "ai",
        'ओ' => "o",
        'औ' => "au",
        'ऑ' => "o",
        _ => return None,
    })
}

fn matra(c: char) -> Option<&'static str> {
    Some(match c {
        'ा' => "A",
        'ि' => "i",
        'ी' => "I",
        'ु' => "u",
        'ू' => "U",
        'ृ' => "R",
        'ॄ' => "RR",
        'ॢ' => "lR",
        'ॣ' => "lRR",
        'े' => "e",
        'ै' => "ai",
        'ो' => "o",
        'ौ' => "au",
        'ॉ' => "o",
        _ => return None,
    })
}

fn sign(c: char) -> Option<&'static str> {
    Some(match c {
        'ं' => "M",
        'ः' => "H",
        'ँ' => "~",
        'ऽ' => "'",
        'ॐ' => "OM",
        '।' => ".",
        '॥' => "..",
        NUKTA => "",
        '०' => "0",
        '१' => "1",
        '२' => "2",
        '३' => "3",
        '४' => "4",
        '५' => "5",
        '६' => "6",
        '७' => "7",
        '८' => "8",
        '९' => "9",
        _ => return None,
    })
}

static NON_ALNUM: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^a-z0-9\s]+").unwrap());
static WS_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());
static YOJANA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(yojna|yojana|yojnaa)\b").unwrap());

/// Index-time roman normal form.
///
/// Lowercase, non-alphanumerics to space, vowel runs collapsed to a single
/// vowel, `v` -> `w`, whole-word yojana variants unified, whitespace
/// collapsed.
pub fn roman_normalize(s: &str) -> String {
    let t = s.to_lowercase();
    let t = NON_ALNUM.replace_all(t.trim(), " ");
    let t = WS_RUN.replace_all(&t, " ");
    let t = collapse_vowel_runs(t.trim(), 1);
    let t = t.replace('v', "w");
    let t = YOJANA.replace_all(&t, "yojana");
    WS_RUN.replace_all(t.trim(), " ").into_owned()
}

/// Matching-time roman normal form for gazetteer values and roman queries.
///
/// Keeps vowel runs at up to two characters and does not touch consonants, so
/// `karoonga`/`karunga` style variance still collapses without rewriting
/// already-roman metadata.
pub fn roman_match_norm(s: &str) -> String {
    let t = s.trim().to_lowercase();
    let t = WS_RUN.replace_all(&t, " ");
    collapse_vowel_runs(&t, 2)
}

fn collapse_vowel_runs(s: &str, keep: usize) -> String {
    let mut out = String::with_capacity(s.len());
    let mut run_char = '\0';
    let mut run_len = 0usize;

    for c in s.chars() {
        if matches!(c, 'a' | 'e' | 'i' | 'o' | 'u') {
            if c == run_char {
                run_len += 1;
                if run_len > keep {
                    continue;
                }
            } else {
                run_char = c;
                run_len = 1;
            }
        } else {
            run_char = '\0';
            run_len = 0;
        }
        out.push(c);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transliterates_simple_words() {
        assert_eq!(devanagari_to_roman("हिन्दी"), "hindI");
        assert_eq!(devanagari_to_roman("बिहार"), "bihAra");
        assert_eq!(devanagari_to_roman("योजना"), "yojanA");
    }

    #[test]
    fn handles_virama_and_matras() {
        assert_eq!(devanagari_to_roman("स्वास्थ्य"), "svAsthya");
    }

    #[test]
    fn anusvara_and_digits() {
        assert_eq!(devanagari_to_roman("गंगा"), "gaMgA");
        assert_eq!(devanagari_to_roman("२०२४"), "2024");
    }

    #[test]
    fn nukta_loanwords() {
        assert_eq!(devanagari_to_roman("ज़िला"), "zilA");
        assert_eq!(devanagari_to_roman("फ़सल"), "fasala");
    }

    #[test]
    fn unknown_characters_pass_through() {
        assert_eq!(devanagari_to_roman("abc हाल xyz"), "abc hAla xyz");
    }

    #[test]
    fn roman_normalize_collapses_spelling_variants() {
        assert_eq!(roman_normalize("Yojnaa"), "yojana");
        assert_eq!(roman_normalize("yojana"), "yojana");
        assert_eq!(roman_normalize("yojna"), "yojana");
    }

    #[test]
    fn roman_normalize_v_to_w() {
        assert_eq!(roman_normalize("vikas"), "wikas");
        assert_eq!(roman_normalize("wikas"), "wikas");
    }

    #[test]
    fn roman_normalize_strips_punctuation() {
        assert_eq!(roman_normalize("Asha-workers, Bihar!"), "asha workers bihar");
    }

    #[test]
    fn roman_normalize_idempotent() {
        for raw in ["Yojnaa ke baare mein", "ASHA   didi", "vikas yatra"] {
            let once = roman_normalize(raw);
            assert_eq!(roman_normalize(&once), once);
        }
    }

    #[test]
    fn match_norm_keeps_double_vowels() {
        assert_eq!(roman_match_norm("karooonga"), "karoonga");
        assert_eq!(roman_match_norm("bihar"), "bihar");
        assert_eq!(roman_match_norm("  Sita  Devi "), "sita devi");
    }
}
