//! Offline vector ingest: precomputed article/chunk vectors from JSONL dumps
//! into the two cosine collections.
//!
//! Embedding computation stays outside the service; this path only validates
//! dimensions, assigns the stable point ids and batches the upserts.

use std::collections::HashMap;
use std::path::Path;

use qdrant_client::qdrant::{
    point_id, vectors, PointId, PointStruct, Value as QValue, Vector, Vectors,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use corpus_store::read_jsonl_records;

use crate::config::VectorConfig;
use crate::point_id::{article_point_id, chunk_point_id};
use crate::qdrant_facade::QdrantFacade;
use crate::VectorError;

const UPSERT_BATCH: usize = 128;
const MAX_CAPTURED_FAILURES: usize = 50;

/// One precomputed article vector row.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ArticleVectorRecord {
    pub id: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub published_date: Option<String>,
    #[serde(default)]
    pub published_ts: i64,
    pub vector: Vec<f32>,
}

/// One precomputed chunk vector row; display metadata is denormalized so the
/// search payload can serve snippets directly.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChunkVectorRecord {
    pub chunk_id: String,
    pub article_id: String,
    #[serde(default)]
    pub chunk_index: u32,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub published_date: Option<String>,
    #[serde(default)]
    pub published_ts: i64,
    #[serde(default)]
    pub title_hi: Option<String>,
    #[serde(default)]
    pub chunk_tokens: u32,
    pub vector: Vec<f32>,
}

/// Outcome of one ingest run.
#[derive(Clone, Debug, Default, Serialize)]
pub struct IngestReport {
    pub articles_rows: usize,
    pub chunks_rows: usize,
    pub articles_upserted: usize,
    pub chunks_upserted: usize,
    pub failures: Vec<String>,
}

/// Ingests both dumps, creating the collections if needed.
pub async fn ingest_vectors(
    cfg: &VectorConfig,
    articles_path: impl AsRef<Path>,
    chunks_path: impl AsRef<Path>,
) -> Result<IngestReport, VectorError> {
    let articles: Vec<ArticleVectorRecord> = read_jsonl_records(articles_path)
        .map_err(|e| VectorError::Parse(e.to_string()))?;
    let chunks: Vec<ChunkVectorRecord> =
        read_jsonl_records(chunks_path).map_err(|e| VectorError::Parse(e.to_string()))?;

    let dim = articles
        .first()
        .map(|r| r.vector.len())
        .or_else(|| chunks.first().map(|r| r.vector.len()))
        .ok_or_else(|| VectorError::Parse("no vector records to ingest".into()))?;

    if let Some(want) = cfg.embedding_dim {
        if dim != want {
            return Err(VectorError::VectorSizeMismatch { got: dim, want });
        }
    }

    let facade = QdrantFacade::new(cfg)?;
    facade.ensure_collection(&cfg.collection_articles, dim).await?;
    facade.ensure_collection(&cfg.collection_chunks, dim).await?;

    let mut report = IngestReport {
        articles_rows: articles.len(),
        chunks_rows: chunks.len(),
        ..Default::default()
    };

    for batch in articles.chunks(UPSERT_BATCH) {
        let mut points = Vec::with_capacity(batch.len());
        for r in batch {
            match article_point(r, dim) {
                Ok(p) => points.push(p),
                Err(e) => capture_failure(&mut report, format!("article {}: {e}", r.id)),
            }
        }
        match facade.upsert_points(&cfg.collection_articles, points).await {
            Ok(n) => report.articles_upserted += n,
            Err(e) => capture_failure(&mut report, format!("articles batch: {e}")),
        }
    }

    for batch in chunks.chunks(UPSERT_BATCH) {
        let mut points = Vec::with_capacity(batch.len());
        for r in batch {
            match chunk_point(r, dim) {
                Ok(p) => points.push(p),
                Err(e) => capture_failure(&mut report, format!("chunk {}: {e}", r.chunk_id)),
            }
        }
        match facade.upsert_points(&cfg.collection_chunks, points).await {
            Ok(n) => report.chunks_upserted += n,
            Err(e) => capture_failure(&mut report, format!("chunks batch: {e}")),
        }
    }

    info!(
        "vector ingest done: articles={}/{} chunks={}/{} failures={}",
        report.articles_upserted,
        report.articles_rows,
        report.chunks_upserted,
        report.chunks_rows,
        report.failures.len()
    );
    Ok(report)
}

fn capture_failure(report: &mut IngestReport, msg: String) {
    warn!("{msg}");
    if report.failures.len() < MAX_CAPTURED_FAILURES {
        report.failures.push(msg);
    }
}

fn article_point(r: &ArticleVectorRecord, dim: usize) -> Result<PointStruct, VectorError> {
    check_dim(r.vector.len(), dim)?;
    let payload = json_payload(serde_json::json!({
        "article_id": r.id,
        "url": r.url,
        "published_date": r.published_date,
        "published_ts": r.published_ts,
    }));
    Ok(point(article_point_id(&r.id)?, r.vector.clone(), payload))
}

fn chunk_point(r: &ChunkVectorRecord, dim: usize) -> Result<PointStruct, VectorError> {
    check_dim(r.vector.len(), dim)?;
    let payload = json_payload(serde_json::json!({
        "chunk_id": r.chunk_id,
        "article_id": r.article_id,
        "chunk_index": r.chunk_index,
        "url": r.url,
        "published_date": r.published_date,
        "published_ts": r.published_ts,
        "title_hi": r.title_hi,
        "chunk_tokens": r.chunk_tokens,
    }));
    Ok(point(chunk_point_id(&r.chunk_id), r.vector.clone(), payload))
}

fn check_dim(got: usize, want: usize) -> Result<(), VectorError> {
    if got != want {
        return Err(VectorError::VectorSizeMismatch { got, want });
    }
    Ok(())
}

fn point(id: u64, vector: Vec<f32>, payload: HashMap<String, QValue>) -> PointStruct {
    let vectors = Vectors {
        vectors_options: Some(vectors::VectorsOptions::Vector(Vector {
            data: vector,
            ..Default::default()
        })),
    };
    PointStruct {
        id: Some(PointId {
            point_id_options: Some(point_id::PointIdOptions::Num(id)),
        }),
        payload,
        vectors: Some(vectors),
        ..Default::default()
    }
}

fn json_payload(v: serde_json::Value) -> HashMap<String, QValue> {
    let mut out = HashMap::new();
    if let serde_json::Value::Object(map) = v {
        for (k, v) in map {
            out.insert(k, json_to_qvalue(v));
        }
    }
    out
}

fn json_to_qvalue(v: serde_json::Value) -> QValue {
    use qdrant_client::qdrant::value::Kind;

    let kind = match v {
        serde_json::Value::String(s) => Some(Kind::StringValue(s)),
        serde_json::Value::Bool(b) => Some(Kind::BoolValue(b)),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(Kind::IntegerValue(i))
            } else {
                n.as_f64().map(Kind::DoubleValue)
            }
        }
        serde_json::Value::Null => None,
        _ => None,
    };
    QValue { kind }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunk_record_deserializes_from_dump_row() {
        let raw = r#"{"chunk_id":"42::c0000","article_id":"42","chunk_index":0,"title_hi":"शीर्षक","chunk_tokens":120,"published_ts":1700000000,"vector":[0.1,0.2]}"#;
        let r: ChunkVectorRecord = serde_json::from_str(raw).unwrap();
        assert_eq!(r.chunk_id, "42::c0000");
        assert_eq!(r.vector.len(), 2);
    }

    #[test]
    fn point_construction_uses_numeric_ids() {
        let r = ArticleVectorRecord {
            id: "42".into(),
            url: None,
            published_date: None,
            published_ts: 0,
            vector: vec![0.1, 0.2],
        };
        let p = article_point(&r, 2).unwrap();
        match p.id.unwrap().point_id_options.unwrap() {
            point_id::PointIdOptions::Num(n) => assert_eq!(n, 42),
            other => panic!("unexpected point id: {other:?}"),
        }
    }

    #[test]
    fn dimension_mismatch_is_rejected() {
        let r = ArticleVectorRecord {
            id: "42".into(),
            url: None,
            published_date: None,
            published_ts: 0,
            vector: vec![0.1, 0.2],
        };
        assert!(matches!(
            article_point(&r, 3),
            Err(VectorError::VectorSizeMismatch { got: 2, want: 3 })
        ));
    }
}
