//! Embedding provider seam.
//!
//! The model is an external text-to-vector function. Implement
//! [`EmbeddingsProvider`] to plug in a backend; the HTTP implementation talks
//! to an Ollama-compatible embeddings endpoint.

use std::{future::Future, pin::Pin, time::Duration};

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::VectorError;

/// Asynchronous embedding provider.
///
/// Async because real providers perform HTTP requests; implementations must
/// be safe to share across request handlers.
pub trait EmbeddingsProvider: Send + Sync {
    fn embed<'a>(
        &'a self,
        text: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<f32>, VectorError>> + Send + 'a>>;
}

/// Configuration for the HTTP embedding backend.
#[derive(Clone, Debug)]
pub struct HttpEmbedderConfig {
    /// Base URL of the embedding server (e.g. http://localhost:11434).
    pub url: String,
    /// Model name or tag.
    pub model: String,
    /// Expected embedding dimension; `None` skips validation.
    pub dim: Option<usize>,
}

/// HTTP embedding provider (async), Ollama-compatible wire shape.
#[derive(Clone)]
pub struct HttpEmbedder {
    client: Client,
    url: String,
    model: String,
    dim: Option<usize>,
}

impl HttpEmbedder {
    pub fn new(cfg: HttpEmbedderConfig) -> Result<Self, VectorError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| VectorError::Provider(format!("http client init failed: {e}")))?;

        Ok(Self {
            client,
            url: cfg.url,
            model: cfg.model,
            dim: cfg.dim,
        })
    }
}

impl EmbeddingsProvider for HttpEmbedder {
    fn embed<'a>(
        &'a self,
        text: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<f32>, VectorError>> + Send + 'a>> {
        Box::pin(async move {
            #[derive(Serialize)]
            struct Request<'a> {
                model: &'a str,
                prompt: &'a str,
            }

            #[derive(Deserialize)]
            struct Response {
                embedding: Vec<f32>,
            }

            let req = Request {
                model: &self.model,
                prompt: text,
            };

            let resp = self
                .client
                .post(format!("{}/api/embeddings", self.url))
                .json(&req)
                .send()
                .await
                .map_err(|e| VectorError::Provider(format!("embedding request failed: {e}")))?
                .error_for_status()
                .map_err(|e| VectorError::Provider(format!("embedding HTTP error: {e}")))?;

            let parsed: Response = resp
                .json()
                .await
                .map_err(|e| VectorError::Provider(format!("embedding JSON parse failed: {e}")))?;

            if let Some(want) = self.dim {
                if parsed.embedding.len() != want {
                    return Err(VectorError::VectorSizeMismatch {
                        got: parsed.embedding.len(),
                        want,
                    });
                }
            }

            Ok(parsed.embedding)
        })
    }
}
