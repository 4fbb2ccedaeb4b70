//! Shared immutable state constructed once at startup.

use corpus_store::{ArticleTable, ChunkTextMap};
use feedback_store::FeedbackStore;
use gazetteer::Gazetteer;
use lexical_store::LexicalClient;
use vector_store::SemanticClient;

use crate::core::config::ApiConfig;

/// Everything a request handler needs, built at boot and shared behind an
/// `Arc`. The corpus tables and the gazetteer are immutable for the process
/// lifetime and read concurrently without locks; the clients are thread-safe.
pub struct AppState {
    pub config: ApiConfig,
    pub articles: ArticleTable,
    pub chunks: ChunkTextMap,
    pub gazetteer: Gazetteer,
    pub lexical: LexicalClient,
    pub semantic: SemanticClient,
    pub store: FeedbackStore,
}
