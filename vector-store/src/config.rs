//! Vector index and embedding endpoint configuration.

use crate::VectorError;

/// Connection settings for the vector index and the embedding service.
#[derive(Clone, Debug)]
pub struct VectorConfig {
    pub qdrant_host: String,
    pub qdrant_port: u16,
    pub collection_articles: String,
    pub collection_chunks: String,
    pub embedding_url: String,
    pub embedding_model: String,
    /// Expected embedding dimensionality; when set, provider output is
    /// validated against it.
    pub embedding_dim: Option<usize>,
}

impl VectorConfig {
    /// Builds the config from environment variables.
    ///
    /// Recognized vars:
    /// - QDRANT_HOST (default: localhost), QDRANT_PORT (default: 6334, gRPC)
    /// - QDRANT_COLLECTION_ARTICLES (default: articles_vec_v1)
    /// - QDRANT_COLLECTION_CHUNKS (default: chunks_vec_v1)
    /// - EMBEDDING_URL (required), EMBEDDING_MODEL (default:
    ///   intfloat/multilingual-e5-large), EMBEDDING_DIM (optional)
    pub fn from_env() -> Result<Self, VectorError> {
        use std::env;

        let embedding_url = env::var("EMBEDDING_URL")
            .map_err(|_| VectorError::Config("EMBEDDING_URL is required".into()))?;

        let qdrant_port = env::var("QDRANT_PORT")
            .ok()
            .and_then(|s| s.parse::<u16>().ok())
            .unwrap_or(6334);

        Ok(Self {
            qdrant_host: env::var("QDRANT_HOST").unwrap_or_else(|_| "localhost".into()),
            qdrant_port,
            collection_articles: env::var("QDRANT_COLLECTION_ARTICLES")
                .unwrap_or_else(|_| "articles_vec_v1".into()),
            collection_chunks: env::var("QDRANT_COLLECTION_CHUNKS")
                .unwrap_or_else(|_| "chunks_vec_v1".into()),
            embedding_url,
            embedding_model: env::var("EMBEDDING_MODEL")
                .unwrap_or_else(|_| "intfloat/multilingual-e5-large".into()),
            embedding_dim: env::var("EMBEDDING_DIM")
                .ok()
                .and_then(|s| s.parse::<usize>().ok()),
        })
    }

    pub fn qdrant_url(&self) -> String {
        format!("http://{}:{}", self.qdrant_host, self.qdrant_port)
    }

    /// E5-family models expect a `query: ` prefix on the query side.
    pub fn query_prefix(&self) -> Option<&'static str> {
        if self.embedding_model.contains("e5") {
            Some("query: ")
        } else {
            None
        }
    }
}
