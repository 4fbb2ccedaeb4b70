//! Token counting seam for the chunker.
//!
//! The budget unit is the embedder's own tokenizer, so the trait exposes
//! encode/decode rather than a bare counter: the token-window fallback has to
//! decode windows back to text.

use tokenizers::Tokenizer;

use crate::ChunkError;

/// Encode/decode access to the tokenizer that defines the chunk budgets.
pub trait TokenCodec {
    fn encode(&self, text: &str) -> Result<Vec<u32>, ChunkError>;
    fn decode(&self, ids: &[u32]) -> Result<String, ChunkError>;

    fn count(&self, text: &str) -> Result<usize, ChunkError> {
        Ok(self.encode(text)?.len())
    }
}

/// HuggingFace `tokenizers` implementation, loaded from a `tokenizer.json`.
pub struct HfTokenCodec {
    inner: Tokenizer,
}

impl HfTokenCodec {
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self, ChunkError> {
        let inner = Tokenizer::from_file(path.as_ref())
            .map_err(|e| ChunkError::Tokenizer(format!("load {:?}: {e}", path.as_ref())))?;
        Ok(Self { inner })
    }
}

impl TokenCodec for HfTokenCodec {
    fn encode(&self, text: &str) -> Result<Vec<u32>, ChunkError> {
        let encoding = self
            .inner
            .encode(text, false)
            .map_err(|e| ChunkError::Tokenizer(e.to_string()))?;
        Ok(encoding.get_ids().to_vec())
    }

    fn decode(&self, ids: &[u32]) -> Result<String, ChunkError> {
        self.inner
            .decode(ids, true)
            .map_err(|e| ChunkError::Tokenizer(e.to_string()))
    }
}
