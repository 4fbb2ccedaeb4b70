//! HTTP surface of the hybrid search service.
//!
//! `start` loads configuration and the startup artifacts, wires the external
//! clients into an immutable [`core::app_state::AppState`], and serves the
//! four endpoints: `POST /search`, `POST /label`, `POST /label_query`,
//! `GET /health`. Anything missing at boot fails fast.

pub mod core;
pub mod error_handler;
pub mod routes;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tracing::info;

use corpus_store::{ArticleTable, ChunkTextMap};
use feedback_store::FeedbackStore;
use gazetteer::Gazetteer;
use lexical_store::{LexicalClient, LexicalConfig};
use vector_store::{HttpEmbedder, HttpEmbedderConfig, SemanticClient, VectorConfig};

use crate::core::app_state::AppState;
use crate::core::config::ApiConfig;
use crate::error_handler::AppError;
use crate::routes::health_route::health_route;
use crate::routes::label::label_route::{label_query_route, label_route};
use crate::routes::search::search_route::search_route;

/// Boots the service and serves until the process is terminated.
pub async fn start() -> Result<(), AppError> {
    let config = ApiConfig::from_env()?;

    let articles =
        ArticleTable::load(&config.articles_path).map_err(|e| AppError::Startup(e.to_string()))?;
    let chunks =
        ChunkTextMap::load(&config.chunks_path).map_err(|e| AppError::Startup(e.to_string()))?;
    let gazetteer =
        Gazetteer::load(&config.gazetteer_path).map_err(|e| AppError::Startup(e.to_string()))?;
    info!(
        "corpus loaded: {} articles, {} chunks",
        articles.len(),
        chunks.len()
    );

    let lexical_cfg = LexicalConfig::from_env().map_err(|e| AppError::Startup(e.to_string()))?;
    let lexical = LexicalClient::new(lexical_cfg).map_err(|e| AppError::Startup(e.to_string()))?;

    let vector_cfg = VectorConfig::from_env().map_err(|e| AppError::Startup(e.to_string()))?;
    let embedder = Arc::new(
        HttpEmbedder::new(HttpEmbedderConfig {
            url: vector_cfg.embedding_url.clone(),
            model: vector_cfg.embedding_model.clone(),
            dim: vector_cfg.embedding_dim,
        })
        .map_err(|e| AppError::Startup(e.to_string()))?,
    );
    let semantic =
        SemanticClient::new(vector_cfg, embedder).map_err(|e| AppError::Startup(e.to_string()))?;

    let store = FeedbackStore::connect(&config.database_url)
        .await
        .map_err(|e| AppError::Startup(e.to_string()))?;
    store
        .ensure_schema()
        .await
        .map_err(|e| AppError::Startup(e.to_string()))?;

    let bind_addr = config.bind_addr();
    let state = Arc::new(AppState {
        config,
        articles,
        chunks,
        gazetteer,
        lexical,
        semantic,
        store,
    });

    let app = Router::new()
        .route("/search", post(search_route))
        .route("/label", post(label_route))
        .route("/label_query", post(label_query_route))
        .route("/health", get(health_route))
        .with_state(state);

    info!("listening on http://{bind_addr}");

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .map_err(AppError::Bind)?;
    axum::serve(listener, app).await.map_err(AppError::Server)?;

    Ok(())
}
