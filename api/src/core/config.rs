//! Service configuration from environment variables.

use crate::error_handler::AppError;

/// Settings owned by the API layer: bind address, versions, retrieval depths
/// and startup artifact paths. Store- and index-level settings live with
/// their own crates.
#[derive(Clone, Debug)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,

    pub ranker_version: String,
    pub retrieval_version: String,

    pub lexical_topk: usize,
    pub sem_article_topk: usize,
    pub sem_chunk_topk: usize,
    pub candidate_cap: usize,
    pub log_candidates_topn: usize,

    pub database_url: String,
    pub articles_path: String,
    pub chunks_path: String,
    pub gazetteer_path: String,
}

impl ApiConfig {
    /// Builds the config from environment variables.
    ///
    /// Required: DATABASE_URL, ARTICLES_PATH, CHUNKS_PATH, GAZETTEER_PATH.
    /// Optional with defaults: API_HOST (0.0.0.0), API_PORT (8000),
    /// RANKER_VERSION (ranker_v1), RETRIEVAL_VERSION (retrieval_v1),
    /// LEXICAL_TOPK (80), SEM_ARTICLE_TOPK (40), SEM_CHUNK_TOPK (80),
    /// CANDIDATE_CAP (200), LOG_CANDIDATES_TOPN (200).
    pub fn from_env() -> Result<Self, AppError> {
        Ok(Self {
            host: env_or("API_HOST", "0.0.0.0"),
            port: env_parsed("API_PORT", 8000),
            ranker_version: env_or("RANKER_VERSION", "ranker_v1"),
            retrieval_version: env_or("RETRIEVAL_VERSION", "retrieval_v1"),
            lexical_topk: env_parsed("LEXICAL_TOPK", 80),
            sem_article_topk: env_parsed("SEM_ARTICLE_TOPK", 40),
            sem_chunk_topk: env_parsed("SEM_CHUNK_TOPK", 80),
            candidate_cap: env_parsed("CANDIDATE_CAP", 200),
            log_candidates_topn: env_parsed("LOG_CANDIDATES_TOPN", 200),
            database_url: env_required("DATABASE_URL")?,
            articles_path: env_required("ARTICLES_PATH")?,
            chunks_path: env_required("CHUNKS_PATH")?,
            gazetteer_path: env_required("GAZETTEER_PATH")?,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_parsed<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|s| s.parse::<T>().ok())
        .unwrap_or(default)
}

fn env_required(key: &'static str) -> Result<String, AppError> {
    std::env::var(key).map_err(|_| AppError::MissingEnv(key))
}
