//! Query canonicalization: script detection plus the per-mode lexical query
//! string.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{is_devanagari, normalize, roman_normalize};

/// Script mode of a query, decided by Devanagari density.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryMode {
    Dev,
    Roman,
}

impl fmt::Display for QueryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryMode::Dev => f.write_str("dev"),
            QueryMode::Roman => f.write_str("roman"),
        }
    }
}

/// Canonical form of a raw user query.
#[derive(Clone, Debug, PartialEq)]
pub struct CanonicalQuery {
    /// Query exactly as the user typed it; the semantic branch embeds this.
    pub raw: String,
    pub mode: QueryMode,
    /// Lexical query string for the mode (`normalize` in dev,
    /// `roman_normalize` in roman).
    pub q: String,
    /// Roman normal form; empty in dev mode.
    pub roman_norm: String,
}

/// Fraction of Devanagari code points in the string, over all chars.
pub fn devanagari_fraction(s: &str) -> f64 {
    let total = s.chars().count();
    if total == 0 {
        return 0.0;
    }
    let dev = s.chars().filter(|c| is_devanagari(*c)).count();
    dev as f64 / total as f64
}

/// Devanagari density threshold above which a query routes to dev mode.
const DEV_MODE_THRESHOLD: f64 = 0.02;

/// Classifies the query and produces the lexical query string for its mode.
pub fn canonicalize(raw_query: &str) -> CanonicalQuery {
    let raw = raw_query.to_string();

    if devanagari_fraction(&raw) > DEV_MODE_THRESHOLD {
        let normalized = normalize(&raw);
        let q = if normalized.is_empty() {
            raw.clone()
        } else {
            normalized
        };
        return CanonicalQuery {
            raw,
            mode: QueryMode::Dev,
            q,
            roman_norm: String::new(),
        };
    }

    let roman_norm = roman_normalize(&raw);
    CanonicalQuery {
        raw,
        mode: QueryMode::Roman,
        q: roman_norm.clone(),
        roman_norm,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn devanagari_query_routes_to_dev_mode() {
        let canon = canonicalize("बिहार स्वास्थ्य");
        assert_eq!(canon.mode, QueryMode::Dev);
        assert_eq!(canon.q, "बिहार स्वास्थ्य");
        assert!(canon.roman_norm.is_empty());
    }

    #[test]
    fn latin_query_routes_to_roman_mode() {
        let canon = canonicalize("asha workers   training Bihar");
        assert_eq!(canon.mode, QueryMode::Roman);
        assert_eq!(canon.q, "asha workers training bihar");
        assert_eq!(canon.roman_norm, canon.q);
    }

    #[test]
    fn sparse_devanagari_still_trips_threshold() {
        // One Devanagari char out of ~20 is > 2%.
        let canon = canonicalize("latest data on गंगा");
        assert_eq!(canon.mode, QueryMode::Dev);
    }

    #[test]
    fn canonicalization_is_idempotent_in_both_modes() {
        for raw in ["बिहार  स्वास्थ्य ।केंद्र", "Asha Workers Bihar", "Yojnaa vikas"] {
            let once = canonicalize(raw);
            let twice = canonicalize(&once.q);
            assert_eq!(twice.q, once.q);
        }
    }

    #[test]
    fn empty_query_is_roman_with_empty_forms() {
        let canon = canonicalize("");
        assert_eq!(canon.mode, QueryMode::Roman);
        assert!(canon.q.is_empty());
    }
}
