//! Candidate fusion and hand-weighted ranking (ranker v1).
//!
//! [`merge_candidates`] unions the lexical and semantic result sets at the
//! article granularity with max-aggregation per signal. [`rank_candidates`]
//! min-max normalizes the signals per query, adds metadata overlap and
//! recency features, and produces a deterministic, explained ranking.

mod merge;
mod rank;

pub use merge::{merge_candidates, Candidate};
pub use rank::{
    minmax_norm, rank_candidates, recency_score, Features, RankedCandidate, SCORE_UPPER_BOUND,
};
