use serde::Serialize;
use serde_json::Value;

/// One ranked hit of the search response.
///
/// `features` and `explanation` are populated only when the caller asked for
/// an explained response.
#[derive(Debug, Serialize)]
pub struct SearchHit {
    pub rank: usize,
    pub id: String,
    pub title: Option<String>,
    pub date: Option<String>,
    pub summary: Option<String>,
    pub url: Option<String>,

    pub primary_category: Option<String>,
    pub categories: Vec<String>,
    pub tags: Vec<String>,
    pub location: Vec<String>,
    pub partner_label: Option<String>,
    pub contributors: Vec<String>,

    pub score: f64,
    pub snippet: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub features: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub query_id: i64,
    pub mode: String,
    pub query_used: String,
    pub query_semantic: String,
    pub results: Vec<SearchHit>,
}
