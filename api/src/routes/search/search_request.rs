use serde::Deserialize;

fn default_per_page() -> usize {
    10
}

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    pub query: String,
    #[serde(default)]
    pub filter_by: Option<String>,
    #[serde(default = "default_per_page")]
    pub per_page: usize,
    #[serde(default)]
    pub explain: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_body_uses_defaults() {
        let req: SearchRequest = serde_json::from_str(r#"{"query":"बिहार"}"#).unwrap();
        assert_eq!(req.per_page, 10);
        assert!(!req.explain);
        assert!(req.filter_by.is_none());
    }
}
