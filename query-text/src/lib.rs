//! Query-side text handling for the bilingual (Devanagari + roman) search
//! pipeline.
//!
//! The crate is a set of pure functions, split into focused modules:
//! - [`normalize`] — conservative Devanagari text cleanup (mojibake repair,
//!   NFKC, whitespace and punctuation spacing).
//! - [`roman`] — Harvard-Kyoto transliteration and the roman normal forms
//!   used by the lexical index and the gazetteer.
//! - [`canonicalize`] — script detection and per-mode lexical query strings.
//! - [`tokenize`] — punctuation-aware token split shared by the ranker and
//!   the entity detector.

mod canonicalize;
mod normalize;
mod roman;
mod tokenize;

pub use canonicalize::{CanonicalQuery, QueryMode, canonicalize, devanagari_fraction};
pub use normalize::normalize;
pub use roman::{devanagari_to_roman, roman_match_norm, roman_normalize};
pub use tokenize::tokenize_query;

/// Devanagari Unicode block check shared across modules.
pub(crate) fn is_devanagari(c: char) -> bool {
    ('\u{0900}'..='\u{097F}').contains(&c)
}
