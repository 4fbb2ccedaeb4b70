//! Longest-first entity detection over the gazetteer.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use query_text::{roman_match_norm, tokenize_query, QueryMode};

use crate::filter::build_in_filter;
use crate::model::Gazetteer;

static WS_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Cap on matches lifted per field; the filter stays selective instead of
/// enumerating half the vocabulary on broad queries.
const MAX_PER_FIELD: usize = 3;

/// Confidence scoring: a phrase hit is worth two token hits.
const PHRASE_SCORE: i32 = 2;
const TOKEN_SCORE: i32 = 1;

/// Structured result of entity detection.
#[derive(Clone, Debug, Default)]
pub struct DetectedEntities {
    /// Matched display values per field, longest first.
    pub matches: BTreeMap<String, Vec<String>>,
    /// Accumulated confidence per field.
    pub confidence: BTreeMap<String, i32>,
    /// Auto filter in lexical-store syntax; `None` when nothing was lifted.
    pub filter_by_auto: Option<String>,
}

/// Scans the query against the gazetteer vocabularies.
///
/// Phrase matches (substring of the whitespace-normalized query; in roman
/// mode also of its roman match form) score +2. Token matches score +1 and
/// are enabled for every field except contributors, where single tokens
/// would alias first names.
pub fn detect_entities(query_used: &str, mode: QueryMode, gaz: &Gazetteer) -> DetectedEntities {
    let q_used = norm_ws(query_used);
    let q_tokens: BTreeSet<String> = tokenize_query(&q_used).into_iter().collect();
    let q_roman = match mode {
        QueryMode::Roman => roman_match_norm(&q_used),
        QueryMode::Dev => String::new(),
    };

    let mut matches: BTreeMap<String, Vec<String>> = BTreeMap::new();
    let mut confidence: BTreeMap<String, i32> = BTreeMap::new();

    let mut scan = |field: &str, allow_token: bool| {
        let Some(entry) = gaz.field(field) else {
            return;
        };

        let mut got: Vec<String> = Vec::new();
        let mut score = 0i32;

        // Phrase pass; values are already ordered longest-first.
        for (i, v) in entry.values.iter().enumerate() {
            if got.len() >= MAX_PER_FIELD {
                break;
            }
            let v_norm = norm_ws(v);
            if v_norm.is_empty() {
                continue;
            }

            if q_used.contains(&v_norm) {
                got.push(v.clone());
                score += PHRASE_SCORE;
            } else if mode == QueryMode::Roman {
                let vr = entry
                    .values_roman_norm
                    .get(i)
                    .cloned()
                    .unwrap_or_else(|| roman_match_norm(&v_norm));
                if !vr.is_empty() && q_roman.contains(&vr) {
                    got.push(v.clone());
                    score += PHRASE_SCORE;
                }
            }
        }

        // Token fallback.
        if allow_token && got.len() < MAX_PER_FIELD {
            for v in &entry.values {
                if got.len() >= MAX_PER_FIELD {
                    break;
                }
                let vtok: BTreeSet<String> = tokenize_query(v).into_iter().collect();
                if vtok.is_empty() {
                    continue;
                }
                if q_tokens.intersection(&vtok).next().is_some() && !got.contains(v) {
                    got.push(v.clone());
                    score += TOKEN_SCORE;
                }
            }
        }

        if !got.is_empty() {
            matches.insert(field.to_string(), got);
            confidence.insert(field.to_string(), score);
        }
    };

    // Locations are a strong signal; contributors are phrase-only.
    scan("locations_norm", true);
    scan("contributors_norm", false);
    scan("categories_norm", true);
    scan("tags_norm", true);

    let filter_by_auto = emit_filter(&matches, &confidence);
    debug!(
        "entity detection: fields={} filter={:?}",
        matches.len(),
        filter_by_auto
    );

    DetectedEntities {
        matches,
        confidence,
        filter_by_auto,
    }
}

/// Conservative filter emission: locations whenever matched, contributors
/// only on a phrase hit, categories/tags only on multiple phrase hits.
fn emit_filter(
    matches: &BTreeMap<String, Vec<String>>,
    confidence: &BTreeMap<String, i32>,
) -> Option<String> {
    let conf = |field: &str| confidence.get(field).copied().unwrap_or(0);

    let mut filters: Vec<String> = Vec::new();

    if let Some(values) = matches.get("locations_norm") {
        filters.extend(build_in_filter("locations_norm", values));
    }
    if let Some(values) = matches.get("contributors_norm") {
        if conf("contributors_norm") >= 2 {
            filters.extend(build_in_filter("contributors_norm", values));
        }
    }
    if let Some(values) = matches.get("categories_norm") {
        if conf("categories_norm") >= 4 {
            filters.extend(build_in_filter("categories_norm", values));
        }
    }
    if let Some(values) = matches.get("tags_norm") {
        if conf("tags_norm") >= 4 {
            filters.extend(build_in_filter("tags_norm", values));
        }
    }

    if filters.is_empty() {
        None
    } else {
        Some(filters.join(" && "))
    }
}

fn norm_ws(s: &str) -> String {
    WS_RUN.replace_all(s.trim(), " ").to_lowercase()
}
