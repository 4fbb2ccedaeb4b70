//! Search client for the lexical index.

use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info};

use query_text::QueryMode;

use crate::config::LexicalConfig;
use crate::LexicalError;

/// Fields and relative weights for Devanagari queries.
pub const QUERY_BY_DEV: &str = "title_hi,summary_hi,content_hi";
/// Fields and relative weights for roman queries.
pub const QUERY_BY_ROMAN: &str = "title_roman_norm,summary_roman_norm,content_roman_norm";

const QUERY_BY_WEIGHTS: &str = "6,3,1";
const NUM_TYPOS: &str = "1";

/// One lexical candidate: the article and its text-match score.
#[derive(Clone, Debug, PartialEq)]
pub struct LexicalHit {
    pub article_id: String,
    pub lexical_score: f64,
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    hits: Vec<ResponseHit>,
}

#[derive(Deserialize)]
struct ResponseHit {
    document: ResponseDocument,
    #[serde(default)]
    text_match: f64,
}

#[derive(Deserialize)]
struct ResponseDocument {
    id: String,
}

/// Thin client over the Typesense documents search endpoint.
pub struct LexicalClient {
    http: Client,
    cfg: LexicalConfig,
}

impl LexicalClient {
    pub fn new(cfg: LexicalConfig) -> Result<Self, LexicalError> {
        let http = Client::builder().timeout(cfg.timeout).build()?;
        Ok(Self { http, cfg })
    }

    /// Issues one bounded keyword query.
    ///
    /// `query_by` fields follow the mode; weights are fixed at title 6,
    /// summary 3, content 1 with one typo tolerated.
    pub async fn search(
        &self,
        query_used: &str,
        mode: QueryMode,
        filter_by: Option<&str>,
        per_page: usize,
    ) -> Result<Vec<LexicalHit>, LexicalError> {
        let query_by = match mode {
            QueryMode::Dev => QUERY_BY_DEV,
            QueryMode::Roman => QUERY_BY_ROMAN,
        };

        let url = format!(
            "{}/collections/{}/documents/search",
            self.cfg.base_url(),
            self.cfg.collection
        );

        let per_page = per_page.to_string();
        let mut params: Vec<(&str, &str)> = vec![
            ("q", query_used),
            ("query_by", query_by),
            ("query_by_weights", QUERY_BY_WEIGHTS),
            ("per_page", per_page.as_str()),
            ("page", "1"),
            ("num_typos", NUM_TYPOS),
        ];
        if let Some(f) = filter_by {
            params.push(("filter_by", f));
        }

        debug!("lexical search: mode={} filter={:?}", mode, filter_by);

        let resp = self
            .http
            .get(&url)
            .header("X-TYPESENSE-API-KEY", &self.cfg.api_key)
            .query(&params)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(LexicalError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: SearchResponse = resp.json().await?;
        let hits: Vec<LexicalHit> = parsed
            .hits
            .into_iter()
            .map(|h| LexicalHit {
                article_id: h.document.id,
                lexical_score: h.text_match,
            })
            .collect();

        info!("lexical search returned {} hits", hits.len());
        Ok(hits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_parsing_tolerates_missing_text_match() {
        let raw = r#"{"hits":[{"document":{"id":"42"},"text_match":125.0},{"document":{"id":"43"}}]}"#;
        let parsed: SearchResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.hits.len(), 2);
        assert_eq!(parsed.hits[0].document.id, "42");
        assert_eq!(parsed.hits[0].text_match, 125.0);
        assert_eq!(parsed.hits[1].text_match, 0.0);
    }

    #[test]
    fn empty_hits_key_parses_to_empty() {
        let parsed: SearchResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.hits.is_empty());
    }
}
