//! Ranker v1: min-max normalized signals fused with metadata overlap and
//! recency under fixed hand-tuned weights.

use std::collections::HashSet;

use serde::Serialize;
use tracing::debug;

use crate::merge::Candidate;

// Lexical dominates the top ranks; the semantic chunk signal carries the
// long-tail recall; metadata overlap rewards detected entities without
// double-counting the hard filter.
const W_LEX: f64 = 1.00;
const W_SC: f64 = 0.40;
const W_SA: f64 = 0.18;
const W_TAG: f64 = 0.12;
const W_CAT: f64 = 0.10;
const W_LOC: f64 = 0.15;
const W_CONTRIB: f64 = 0.06;
const W_REC: f64 = 0.08;

/// Upper bound of any candidate score: the sum of all weights.
pub const SCORE_UPPER_BOUND: f64 =
    W_LEX + W_SC + W_SA + W_TAG + W_CAT + W_LOC + W_CONTRIB + W_REC;

const EXPLANATION_TOP_N: usize = 4;

/// Articles older than three years get no recency credit.
const RECENCY_HORIZON_DAYS: f64 = 1095.0;

/// Full feature vector logged per candidate for later learning-to-rank.
#[derive(Clone, Debug, Serialize)]
pub struct Features {
    pub lexical_score_raw: f64,
    pub sem_article_raw: f64,
    pub sem_chunk_raw: f64,
    pub lex_norm: f64,
    pub sem_article_norm: f64,
    pub sem_chunk_norm: f64,
    pub tag_overlap_count: usize,
    pub cat_overlap_count: usize,
    pub loc_overlap_count: usize,
    pub contrib_overlap_count: usize,
    pub recency: f64,
    pub best_chunk_id: Option<String>,
    pub src_lexical: bool,
    pub src_sem_article: bool,
    pub src_sem_chunk: bool,
}

/// One ranked candidate with its score decomposition.
#[derive(Clone, Debug)]
pub struct RankedCandidate {
    pub candidate: Candidate,
    /// Dense 1-based rank after the stable sort.
    pub rank: usize,
    pub score: f64,
    pub features: Features,
    /// Top contributions by value, `(component, weighted contribution)`.
    pub explanation: Vec<(String, f64)>,
}

/// Scores and sorts the merged candidates.
///
/// The sort is stable, so candidates with equal scores keep the merger's
/// pre-sorted order and the ranking is deterministic for fixed inputs.
pub fn rank_candidates(
    candidates: Vec<Candidate>,
    query_tokens: &[String],
    now_ts: i64,
) -> Vec<RankedCandidate> {
    let lex_n = minmax_norm(&collect(&candidates, |c| c.lexical_score));
    let sa_n = minmax_norm(&collect(&candidates, |c| c.sem_article));
    let sc_n = minmax_norm(&collect(&candidates, |c| c.sem_chunk));

    let q_tokens: HashSet<&str> = query_tokens.iter().map(String::as_str).collect();

    let mut out: Vec<RankedCandidate> = candidates
        .into_iter()
        .enumerate()
        .map(|(i, c)| score_candidate(c, lex_n[i], sa_n[i], sc_n[i], &q_tokens, now_ts))
        .collect();

    out.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    for (i, item) in out.iter_mut().enumerate() {
        item.rank = i + 1;
    }

    debug!("ranked {} candidates", out.len());
    out
}

fn score_candidate(
    c: Candidate,
    lex_n: f64,
    sa_n: f64,
    sc_n: f64,
    q_tokens: &HashSet<&str>,
    now_ts: i64,
) -> RankedCandidate {
    let tag_ov = overlap_count(q_tokens, &c.tags_norm);
    let cat_ov = overlap_count(q_tokens, &c.categories_norm);
    let loc_ov = overlap_count(q_tokens, &c.locations_norm);
    let con_ov = overlap_count(q_tokens, &c.contributors_norm);

    let tag_feat = (tag_ov as f64 / 2.0).min(1.0);
    let cat_feat = (cat_ov as f64 / 2.0).min(1.0);
    let loc_feat = (loc_ov as f64).min(1.0);
    let con_feat = (con_ov as f64).min(1.0);

    let rec = recency_score(c.published_ts, now_ts);

    let parts = [
        ("lex", W_LEX * lex_n),
        ("sem_chunk", W_SC * sc_n),
        ("sem_article", W_SA * sa_n),
        ("tag_overlap", W_TAG * tag_feat),
        ("cat_overlap", W_CAT * cat_feat),
        ("loc_overlap", W_LOC * loc_feat),
        ("contrib_overlap", W_CONTRIB * con_feat),
        ("recency", W_REC * rec),
    ];
    let score: f64 = parts.iter().map(|(_, v)| v).sum();

    let mut explanation: Vec<(String, f64)> =
        parts.iter().map(|(k, v)| (k.to_string(), *v)).collect();
    explanation.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    explanation.truncate(EXPLANATION_TOP_N);

    let features = Features {
        lexical_score_raw: c.lexical_score,
        sem_article_raw: c.sem_article,
        sem_chunk_raw: c.sem_chunk,
        lex_norm: lex_n,
        sem_article_norm: sa_n,
        sem_chunk_norm: sc_n,
        tag_overlap_count: tag_ov,
        cat_overlap_count: cat_ov,
        loc_overlap_count: loc_ov,
        contrib_overlap_count: con_ov,
        recency: rec,
        best_chunk_id: c.best_chunk_id.clone(),
        src_lexical: c.src_lexical,
        src_sem_article: c.src_sem_article,
        src_sem_chunk: c.src_sem_chunk,
    };

    RankedCandidate {
        candidate: c,
        rank: 0,
        score,
        features,
        explanation,
    }
}

fn collect(candidates: &[Candidate], f: impl Fn(&Candidate) -> f64) -> Vec<f64> {
    candidates.iter().map(f).collect()
}

/// Min-max normalization; a degenerate range maps everything to zero.
pub fn minmax_norm(values: &[f64]) -> Vec<f64> {
    if values.is_empty() {
        return Vec::new();
    }
    let lo = values.iter().cloned().fold(f64::INFINITY, f64::min);
    let hi = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    if hi - lo < 1e-9 {
        return vec![0.0; values.len()];
    }
    values.iter().map(|v| (v - lo) / (hi - lo)).collect()
}

/// Linear recency decay to zero over the horizon; unknown publish dates get
/// no credit.
pub fn recency_score(published_ts: i64, now_ts: i64) -> f64 {
    if published_ts <= 0 || now_ts <= 0 {
        return 0.0;
    }
    let age_days = ((now_ts - published_ts) as f64 / 86_400.0).max(0.0);
    (1.0 - age_days / RECENCY_HORIZON_DAYS).max(0.0)
}

fn overlap_count(q_tokens: &HashSet<&str>, field_values: &[String]) -> usize {
    if q_tokens.is_empty() || field_values.is_empty() {
        return 0;
    }
    let fs: HashSet<&str> = field_values.iter().map(String::as_str).collect();
    q_tokens.intersection(&fs).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cand(id: &str) -> Candidate {
        Candidate {
            article_id: id.to_string(),
            ..Default::default()
        }
    }

    fn tokens(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn minmax_degenerate_range_maps_to_zero() {
        assert_eq!(minmax_norm(&[3.0, 3.0]), vec![0.0, 0.0]);
        assert_eq!(minmax_norm(&[5.0]), vec![0.0]);
        assert!(minmax_norm(&[]).is_empty());
    }

    #[test]
    fn minmax_spans_unit_interval() {
        let n = minmax_norm(&[0.0, 5.0, 10.0]);
        assert_eq!(n, vec![0.0, 0.5, 1.0]);
    }

    #[test]
    fn recency_boundaries() {
        let now = 1_700_000_000;
        assert_eq!(recency_score(0, now), 0.0);
        assert_eq!(recency_score(-5, now), 0.0);
        assert_eq!(recency_score(now, now), 1.0);
        // Older than the three-year horizon.
        assert_eq!(recency_score(now - 1200 * 86_400, now), 0.0);
        // Future timestamps clamp to full credit.
        assert_eq!(recency_score(now + 86_400, now), 1.0);
    }

    #[test]
    fn recency_breaks_signal_ties() {
        let now = 1_700_000_000;
        let mut a = cand("A");
        a.lexical_score = 3.0;
        a.sem_chunk = 0.7;
        a.published_ts = now - 30 * 86_400;
        let mut b = cand("B");
        b.lexical_score = 3.0;
        b.sem_chunk = 0.7;
        b.published_ts = now - 1200 * 86_400;

        let ranked = rank_candidates(vec![a, b], &[], now);
        assert_eq!(ranked[0].candidate.article_id, "A");
        assert_eq!(ranked[0].rank, 1);
        assert_eq!(ranked[1].candidate.article_id, "B");
        assert_eq!(ranked[1].rank, 2);
        assert!(ranked[0].score > ranked[1].score);
    }

    #[test]
    fn single_candidate_gets_zero_norms_but_still_ranks() {
        let mut c = cand("a42");
        c.sem_chunk = 0.83;
        c.best_chunk_id = Some("c17".into());
        c.src_sem_chunk = true;

        let ranked = rank_candidates(vec![c], &[], 1_700_000_000);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].rank, 1);
        assert_eq!(ranked[0].features.sem_chunk_norm, 0.0);
        assert_eq!(ranked[0].features.lex_norm, 0.0);
        assert_eq!(ranked[0].score, 0.0);
        assert_eq!(ranked[0].features.best_chunk_id.as_deref(), Some("c17"));
    }

    #[test]
    fn metadata_overlap_rewards_matching_tokens() {
        let mut with_loc = cand("A");
        with_loc.locations_norm = vec!["bihar".into()];
        let without = cand("B");

        let ranked = rank_candidates(vec![without, with_loc], &tokens(&["bihar"]), 0);
        assert_eq!(ranked[0].candidate.article_id, "A");
        assert_eq!(ranked[0].features.loc_overlap_count, 1);
        assert!((ranked[0].score - 0.15).abs() < 1e-12);
    }

    #[test]
    fn overlap_features_saturate() {
        let mut c = cand("A");
        c.tags_norm = vec!["स्वास्थ्य".into(), "बिहार".into(), "शिक्षा".into()];
        let ranked = rank_candidates(
            vec![c],
            &tokens(&["स्वास्थ्य", "बिहार", "शिक्षा"]),
            0,
        );
        assert_eq!(ranked[0].features.tag_overlap_count, 3);
        // tag_feat saturates at 1.0 -> contribution equals the tag weight.
        assert!((ranked[0].score - 0.12).abs() < 1e-12);
    }

    #[test]
    fn scores_stay_within_weight_budget() {
        let now = 1_700_000_000;
        let mut c = cand("A");
        c.lexical_score = 100.0;
        c.sem_article = 0.9;
        c.sem_chunk = 0.95;
        c.published_ts = now;
        c.tags_norm = vec!["bihar".into(), "health".into()];
        c.categories_norm = vec!["bihar".into(), "health".into()];
        c.locations_norm = vec!["bihar".into()];
        c.contributors_norm = vec!["health".into()];
        let mut d = cand("B");
        d.lexical_score = 1.0;

        let ranked = rank_candidates(vec![c, d], &tokens(&["bihar", "health"]), now);
        for r in &ranked {
            assert!(r.score >= 0.0);
            assert!(r.score <= SCORE_UPPER_BOUND + 1e-12);
        }
        assert!((SCORE_UPPER_BOUND - 2.09).abs() < 1e-12);
    }

    #[test]
    fn explanation_lists_top_four_components() {
        let now = 1_700_000_000;
        let mut c = cand("A");
        c.lexical_score = 10.0;
        c.locations_norm = vec!["bihar".into()];
        c.published_ts = now;
        let mut d = cand("B");
        d.lexical_score = 1.0;

        let ranked = rank_candidates(vec![c, d], &tokens(&["bihar"]), now);
        let explanation = &ranked[0].explanation;
        assert_eq!(explanation.len(), 4);
        assert_eq!(explanation[0].0, "lex");
        // Sorted by contribution, descending.
        for pair in explanation.windows(2) {
            assert!(pair[0].1 >= pair[1].1);
        }
    }

    #[test]
    fn equal_scores_keep_input_order() {
        let ranked = rank_candidates(vec![cand("first"), cand("second"), cand("third")], &[], 0);
        let ids: Vec<&str> = ranked.iter().map(|r| r.candidate.article_id.as_str()).collect();
        assert_eq!(ids, vec!["first", "second", "third"]);
        let ranks: Vec<usize> = ranked.iter().map(|r| r.rank).collect();
        assert_eq!(ranks, vec![1, 2, 3]);
    }
}
