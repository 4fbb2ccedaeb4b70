//! Typesense-backed lexical retrieval client.
//!
//! One bounded keyword query per search request, with per-mode field weights
//! and an optional `filter_by` expression. The engine itself is external;
//! this crate only speaks its documented search contract.

mod client;
mod config;

pub use client::{LexicalClient, LexicalHit, QUERY_BY_DEV, QUERY_BY_ROMAN};
pub use config::LexicalConfig;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LexicalError {
    #[error("config error: {0}")]
    Config(String),

    #[error("typesense request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("typesense returned status {status}: {body}")]
    Status { status: u16, body: String },
}
