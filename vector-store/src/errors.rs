//! Error types for the vector retrieval layer.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum VectorError {
    #[error("config error: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("embedding provider error: {0}")]
    Provider(String),

    #[error("qdrant error: {0}")]
    Qdrant(String),

    #[error("vector size mismatch: got={got}, want={want}")]
    VectorSizeMismatch { got: usize, want: usize },
}
