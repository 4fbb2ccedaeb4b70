//! Closed-world entity vocabulary and query-time entity detection.
//!
//! The gazetteer maps each metadata field to its corpus vocabulary, values
//! sorted longest-first so a greedy scan finds the most specific phrase
//! first. Detection lifts locations, contributors, categories and tags out
//! of the query into a structured lexical filter.

mod detect;
mod filter;
mod model;

pub use detect::{detect_entities, DetectedEntities};
pub use filter::{build_in_filter, merge_filters};
pub use model::{Gazetteer, GazetteerBuilder, GazetteerField};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GazetteerError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("missing gazetteer file: {0}")]
    MissingFile(String),
}
