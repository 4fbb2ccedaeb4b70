//! Startup-loaded, process-immutable corpus tables.
//!
//! Two JSONL dumps are read once at boot and kept in memory for the process
//! lifetime: the article metadata table (keyed by article id) and the chunk
//! text map (keyed by chunk id). Requests read them concurrently without
//! locks; nothing mutates them after load.

mod article;
mod loader;

pub use article::{Article, ChunkRecord};
pub use loader::{read_jsonl_records, ArticleTable, ChunkTextMap};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CorpusError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("missing corpus artifact: {0}")]
    MissingArtifact(String),
}
