use serde::Deserialize;

/// Relevance feedback for one (query, article) pair.
#[derive(Debug, Deserialize)]
pub struct LabelRequest {
    pub query_id: i64,
    pub article_id: Option<String>,
    pub label: i32,
    #[serde(default)]
    pub note: Option<String>,
}

/// Query-level feedback; only "nothing relevant" (label 0) is accepted.
#[derive(Debug, Deserialize)]
pub struct QueryLabelRequest {
    pub query_id: i64,
    pub label: i32,
    #[serde(default)]
    pub note: Option<String>,
}
