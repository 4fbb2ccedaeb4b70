//! Thin adapter around `qdrant-client` to isolate API usage.
//!
//! All Qdrant interactions go through this facade, which hides the verbose
//! builder pattern and keeps the rest of the workspace decoupled from
//! `qdrant-client` types. The two collections (articles, chunks) share one
//! underlying client.

use std::collections::HashMap;

use qdrant_client::qdrant::{
    CreateCollectionBuilder, Distance, PointStruct, SearchPointsBuilder, UpsertPointsBuilder,
    Value as QValue, VectorParamsBuilder,
};
use qdrant_client::Qdrant;
use tracing::{debug, info, warn};

use crate::config::VectorConfig;
use crate::VectorError;

/// One scored point with its JSON-converted payload.
pub struct ScoredPayload {
    /// Numeric point id, when the point has one.
    pub id_num: Option<u64>,
    pub score: f32,
    pub payload: serde_json::Value,
}

/// Facade over the Qdrant client.
pub struct QdrantFacade {
    client: Qdrant,
}

impl QdrantFacade {
    pub fn new(cfg: &VectorConfig) -> Result<Self, VectorError> {
        let client = Qdrant::from_url(&cfg.qdrant_url())
            .build()
            .map_err(|e| VectorError::Qdrant(e.to_string()))?;
        Ok(Self { client })
    }

    /// Ensures a cosine collection of the given dimension exists.
    pub async fn ensure_collection(&self, name: &str, dim: usize) -> Result<(), VectorError> {
        match self.client.collection_info(name).await {
            Ok(_) => {
                debug!("collection '{}' already exists", name);
                return Ok(());
            }
            Err(err) => {
                warn!("collection '{}' not found, creating (error={})", name, err);
            }
        }

        self.client
            .create_collection(
                CreateCollectionBuilder::new(name)
                    .vectors_config(VectorParamsBuilder::new(dim as u64, Distance::Cosine)),
            )
            .await
            .map_err(|e| VectorError::Qdrant(e.to_string()))?;

        info!("collection '{}' created (dim={}, cosine)", name, dim);
        Ok(())
    }

    /// Upserts a batch of points; returns the acknowledged count.
    pub async fn upsert_points(
        &self,
        collection: &str,
        points: Vec<PointStruct>,
    ) -> Result<usize, VectorError> {
        if points.is_empty() {
            return Ok(0);
        }
        let n = points.len();
        self.client
            .upsert_points(UpsertPointsBuilder::new(collection, points))
            .await
            .map_err(|e| VectorError::Qdrant(e.to_string()))?;
        debug!("upserted {} points into '{}'", n, collection);
        Ok(n)
    }

    /// Cosine top-K search; payload conversion to JSON is done here so
    /// callers never see protobuf value types.
    pub async fn search(
        &self,
        collection: &str,
        vector: Vec<f32>,
        limit: u64,
        with_payload: bool,
    ) -> Result<Vec<ScoredPayload>, VectorError> {
        debug!(
            "vector search in '{}': limit={} with_payload={}",
            collection, limit, with_payload
        );

        let res = self
            .client
            .search_points(
                SearchPointsBuilder::new(collection, vector, limit).with_payload(with_payload),
            )
            .await
            .map_err(|e| VectorError::Qdrant(e.to_string()))?;

        let mut out = Vec::with_capacity(res.result.len());
        for p in res.result {
            let id_num = p.id.as_ref().and_then(|pid| {
                use qdrant_client::qdrant::point_id::PointIdOptions;
                match pid.point_id_options.as_ref() {
                    Some(PointIdOptions::Num(n)) => Some(*n),
                    _ => None,
                }
            });
            out.push(ScoredPayload {
                id_num,
                score: p.score,
                payload: qpayload_to_json(p.payload),
            });
        }

        Ok(out)
    }
}

/// Converts a Qdrant payload map into plain JSON; unsupported nested kinds
/// map to `Null`.
fn qpayload_to_json(mut p: HashMap<String, QValue>) -> serde_json::Value {
    use qdrant_client::qdrant::value::Kind as K;

    let mut m = serde_json::Map::new();
    for (k, v) in p.drain() {
        let j = match v.kind {
            Some(K::StringValue(s)) => serde_json::Value::String(s),
            Some(K::IntegerValue(i)) => serde_json::Value::Number(i.into()),
            Some(K::DoubleValue(f)) => serde_json::json!(f),
            Some(K::BoolValue(b)) => serde_json::Value::Bool(b),
            None => serde_json::Value::Null,
            _ => serde_json::Value::Null,
        };
        m.insert(k, j);
    }
    serde_json::Value::Object(m)
}
