//! Canonical article and chunk records as they appear in the JSONL dumps.

use serde::{Deserialize, Serialize};

/// One article row of the canonical metadata table.
///
/// Display fields keep their original casing for response assembly; the
/// `*_norm` counterparts are lowercased + NFKC and feed the ranker's overlap
/// features and the gazetteer.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Article {
    pub id: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub title_hi: Option<String>,
    #[serde(default)]
    pub summary_hi: Option<String>,
    #[serde(default)]
    pub content_hi: Option<String>,
    #[serde(default)]
    pub published_date: Option<String>,
    /// Epoch seconds; 0 when the publish date is unknown.
    #[serde(default)]
    pub published_ts: i64,

    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub locations: Vec<String>,
    #[serde(default)]
    pub contributors: Vec<String>,

    #[serde(default)]
    pub categories_norm: Vec<String>,
    #[serde(default)]
    pub tags_norm: Vec<String>,
    #[serde(default)]
    pub locations_norm: Vec<String>,
    #[serde(default)]
    pub contributors_norm: Vec<String>,

    #[serde(default)]
    pub partner_label: Option<String>,
    #[serde(default)]
    pub article_type: Option<String>,
    #[serde(default)]
    pub multimedia_type: Option<String>,
}

impl Article {
    /// First category, used as the display category of a hit.
    pub fn primary_category(&self) -> Option<&str> {
        self.categories.first().map(String::as_str)
    }
}

/// One chunk row of the chunk table.
///
/// Display metadata is denormalized onto the chunk so snippets never need an
/// article join.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChunkRecord {
    pub chunk_id: String,
    pub article_id: String,
    pub chunk_index: u32,
    pub chunk_text: String,
    #[serde(default)]
    pub chunk_tokens: u32,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub title_hi: Option<String>,
    #[serde(default)]
    pub published_date: Option<String>,
    #[serde(default)]
    pub published_ts: i64,
}
