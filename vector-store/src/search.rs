//! Query-side semantic retrieval over the article and chunk collections.

use std::sync::Arc;

use tracing::{debug, info};

use crate::config::VectorConfig;
use crate::embed::EmbeddingsProvider;
use crate::qdrant_facade::QdrantFacade;
use crate::VectorError;

/// One semantic chunk hit: chunk, owning article, cosine score.
#[derive(Clone, Debug, PartialEq)]
pub struct SemanticHit {
    pub chunk_id: String,
    pub article_id: String,
    pub score: f32,
}

/// Semantic search client: encodes queries once and fans out to the two
/// cosine collections.
pub struct SemanticClient {
    cfg: VectorConfig,
    facade: QdrantFacade,
    embedder: Arc<dyn EmbeddingsProvider>,
}

impl SemanticClient {
    pub fn new(
        cfg: VectorConfig,
        embedder: Arc<dyn EmbeddingsProvider>,
    ) -> Result<Self, VectorError> {
        let facade = QdrantFacade::new(&cfg)?;
        Ok(Self {
            cfg,
            facade,
            embedder,
        })
    }

    /// Encodes the raw query and L2-normalizes the vector.
    ///
    /// The raw user text is embedded unchanged (the model is robust to
    /// script); e5-family models get their `query: ` prefix.
    pub async fn encode_query(&self, raw_query: &str) -> Result<Vec<f32>, VectorError> {
        let text = match self.cfg.query_prefix() {
            Some(prefix) => format!("{prefix}{raw_query}"),
            None => raw_query.to_string(),
        };

        let mut vector = self.embedder.embed(&text).await?;
        if let Some(want) = self.cfg.embedding_dim {
            if vector.len() != want {
                return Err(VectorError::VectorSizeMismatch {
                    got: vector.len(),
                    want,
                });
            }
        }
        l2_normalize(&mut vector);
        debug!("encoded query to {} dims", vector.len());
        Ok(vector)
    }

    /// Article-vector top-K. Point ids are the numeric article ids, so no
    /// payload is needed.
    pub async fn search_articles(
        &self,
        query_vector: Vec<f32>,
        limit: usize,
    ) -> Result<Vec<(String, f32)>, VectorError> {
        let hits = self
            .facade
            .search(
                &self.cfg.collection_articles,
                query_vector,
                limit as u64,
                false,
            )
            .await?;

        let out: Vec<(String, f32)> = hits
            .into_iter()
            .filter_map(|p| p.id_num.map(|n| (n.to_string(), p.score)))
            .collect();

        info!("semantic article search returned {} hits", out.len());
        Ok(out)
    }

    /// Chunk-vector top-K with payload; rows without the readable ids are
    /// skipped.
    pub async fn search_chunks(
        &self,
        query_vector: Vec<f32>,
        limit: usize,
    ) -> Result<Vec<SemanticHit>, VectorError> {
        let hits = self
            .facade
            .search(&self.cfg.collection_chunks, query_vector, limit as u64, true)
            .await?;

        let out: Vec<SemanticHit> = hits
            .into_iter()
            .filter_map(|p| {
                let chunk_id = p.payload.get("chunk_id")?.as_str()?.to_string();
                let article_id = p.payload.get("article_id")?.as_str()?.to_string();
                Some(SemanticHit {
                    chunk_id,
                    article_id,
                    score: p.score,
                })
            })
            .collect();

        info!("semantic chunk search returned {} hits", out.len());
        Ok(out)
    }
}

/// In-place L2 normalization; zero vectors stay zero.
pub fn l2_normalize(v: &mut [f32]) {
    let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for x in v.iter_mut() {
            *x /= norm;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn l2_normalize_produces_unit_vector() {
        let mut v = vec![3.0f32, 4.0];
        l2_normalize(&mut v);
        assert!((v[0] - 0.6).abs() < 1e-6);
        assert!((v[1] - 0.8).abs() < 1e-6);
        let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-6);
    }

    #[test]
    fn l2_normalize_leaves_zero_vector_alone() {
        let mut v = vec![0.0f32; 4];
        l2_normalize(&mut v);
        assert!(v.iter().all(|x| *x == 0.0));
    }
}
