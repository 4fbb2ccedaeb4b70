//! Paragraph-aware, token-budgeted article chunking.
//!
//! Chunks are packed from whole paragraphs up to a soft budget; paragraphs
//! that blow the budget are split sentence-ish (danda first), and anything
//! still oversized falls back to overlapping token windows. A post-pass
//! re-splits and then verifies the hard cap, which protects the downstream
//! embedder's maximum sequence length.

mod tokenizer;

pub use tokenizer::{HfTokenCodec, TokenCodec};

use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum ChunkError {
    #[error("tokenizer error: {0}")]
    Tokenizer(String),

    #[error("invalid chunk params: {0}")]
    InvalidParams(String),

    #[error("chunk of {chunk_tokens} tokens exceeds hard cap {hard_max_tokens}")]
    BudgetViolation {
        chunk_tokens: usize,
        hard_max_tokens: usize,
    },
}

/// Token budgets for chunking.
#[derive(Clone, Copy, Debug)]
pub struct ChunkParams {
    /// Soft budget for paragraph packing.
    pub max_tokens: usize,
    /// Overlap between consecutive token windows.
    pub overlap_tokens: usize,
    /// Hard cap no emitted chunk may exceed; bounded by the embedder's
    /// 512-token sequence limit.
    pub hard_max_tokens: usize,
}

impl Default for ChunkParams {
    fn default() -> Self {
        Self {
            max_tokens: 240,
            overlap_tokens: 40,
            hard_max_tokens: 480,
        }
    }
}

impl ChunkParams {
    fn validate(&self) -> Result<(), ChunkError> {
        if self.max_tokens == 0 {
            return Err(ChunkError::InvalidParams("max_tokens must be positive".into()));
        }
        if self.hard_max_tokens > 512 {
            return Err(ChunkError::InvalidParams(
                "hard_max_tokens must be <= 512".into(),
            ));
        }
        if self.overlap_tokens >= self.hard_max_tokens {
            return Err(ChunkError::InvalidParams(
                "overlap_tokens must be below hard_max_tokens".into(),
            ));
        }
        Ok(())
    }
}

/// One emitted chunk of an article.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct ArticleChunk {
    /// Position within the article, 0-based and contiguous.
    pub index: usize,
    pub text: String,
    pub tokens: usize,
}

/// Canonical chunk id, shared with the vector ingest.
pub fn chunk_id(article_id: &str, index: usize) -> String {
    format!("{article_id}::c{index:04}")
}

/// Chunks one article from its title, summary and body.
///
/// Title and summary are prepended so every chunk corpus entry carries
/// retrieval context even when the body is short or empty.
pub fn chunk_article(
    codec: &dyn TokenCodec,
    title: &str,
    summary: &str,
    content: &str,
    params: ChunkParams,
) -> Result<Vec<ArticleChunk>, ChunkError> {
    params.validate()?;

    let base_text = [title, summary, content]
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n");

    let paragraphs: Vec<&str> = base_text
        .split("\n\n")
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect();

    let mut chunks: Vec<String> = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut current_tokens = 0usize;

    let flush = |current: &mut Vec<&str>, current_tokens: &mut usize, chunks: &mut Vec<String>| {
        if !current.is_empty() {
            chunks.push(current.join("\n\n").trim().to_string());
        }
        current.clear();
        *current_tokens = 0;
    };

    for &para in &paragraphs {
        let ptoks = codec.count(para)?;

        if ptoks > params.max_tokens {
            flush(&mut current, &mut current_tokens, &mut chunks);
            chunks.extend(split_long_text(codec, para, params)?);
            continue;
        }

        if current_tokens + ptoks <= params.max_tokens {
            current.push(para);
            current_tokens += ptoks;
        } else {
            flush(&mut current, &mut current_tokens, &mut chunks);
            current.push(para);
            current_tokens = ptoks;
        }
    }
    flush(&mut current, &mut current_tokens, &mut chunks);

    // Hard-cap post-pass: anything still over the cap is re-split by token
    // window, then the cap is verified for every emitted chunk.
    let mut capped: Vec<String> = Vec::new();
    for c in chunks {
        if codec.count(&c)? > params.hard_max_tokens {
            capped.extend(token_windows(codec, &c, params)?);
        } else {
            capped.push(c);
        }
    }

    let mut out = Vec::new();
    for text in capped.into_iter().filter(|c| !c.trim().is_empty()) {
        let tokens = codec.count(&text)?;
        if tokens > params.hard_max_tokens {
            return Err(ChunkError::BudgetViolation {
                chunk_tokens: tokens,
                hard_max_tokens: params.hard_max_tokens,
            });
        }
        out.push(ArticleChunk {
            index: out.len(),
            text,
            tokens,
        });
    }

    debug!("chunked article into {} chunks", out.len());
    Ok(out)
}

/// Sentence-ish punctuation, tried in order; end-sentence marks stay attached
/// to their sentence.
const SENTENCE_SEPS: [char; 6] = ['।', '?', '!', '\n', ';', ':'];

fn split_long_text(
    codec: &dyn TokenCodec,
    text: &str,
    params: ChunkParams,
) -> Result<Vec<String>, ChunkError> {
    let mut parts: Vec<String> = vec![text.to_string()];

    for sep in SENTENCE_SEPS {
        let mut new_parts = Vec::with_capacity(parts.len());
        for part in parts {
            if codec.count(&part)? <= params.max_tokens {
                new_parts.push(part);
                continue;
            }
            let segs: Vec<&str> = part
                .split(sep)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .collect();
            if segs.len() <= 1 {
                new_parts.push(part);
            } else {
                let keep_sep = matches!(sep, '।' | '?' | '!');
                for s in segs {
                    if keep_sep {
                        new_parts.push(format!("{s}{sep}"));
                    } else {
                        new_parts.push(s.to_string());
                    }
                }
            }
        }
        parts = new_parts;
    }

    let mut out = Vec::new();
    for part in parts {
        if codec.count(&part)? <= params.max_tokens {
            out.push(part.trim().to_string());
        } else {
            out.extend(token_windows(codec, &part, params)?);
        }
    }
    out.retain(|p| !p.is_empty());
    Ok(out)
}

/// Overlapping token windows of the hard cap size.
fn token_windows(
    codec: &dyn TokenCodec,
    text: &str,
    params: ChunkParams,
) -> Result<Vec<String>, ChunkError> {
    let ids = codec.encode(text)?;
    let window = params.hard_max_tokens;
    let step = (window - params.overlap_tokens).max(1);

    let mut out = Vec::new();
    let mut start = 0usize;
    while start < ids.len() {
        let end = (start + window).min(ids.len());
        let decoded = codec.decode(&ids[start..end])?;
        let decoded = decoded.trim();
        if !decoded.is_empty() {
            out.push(decoded.to_string());
        }
        if end == ids.len() {
            break;
        }
        start += step;
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;

    /// Whitespace-word tokenizer: one word, one token. Decoding joins words
    /// with single spaces, which is lossless for the space-separated inputs
    /// used here.
    #[derive(Default)]
    struct WordCodec {
        vocab: RefCell<HashMap<String, u32>>,
        words: RefCell<Vec<String>>,
    }

    impl TokenCodec for WordCodec {
        fn encode(&self, text: &str) -> Result<Vec<u32>, ChunkError> {
            let mut vocab = self.vocab.borrow_mut();
            let mut words = self.words.borrow_mut();
            Ok(text
                .split_whitespace()
                .map(|w| {
                    *vocab.entry(w.to_string()).or_insert_with(|| {
                        words.push(w.to_string());
                        (words.len() - 1) as u32
                    })
                })
                .collect())
        }

        fn decode(&self, ids: &[u32]) -> Result<String, ChunkError> {
            let words = self.words.borrow();
            Ok(ids
                .iter()
                .map(|id| words[*id as usize].clone())
                .collect::<Vec<_>>()
                .join(" "))
        }
    }

    fn params(max: usize, overlap: usize, hard: usize) -> ChunkParams {
        ChunkParams {
            max_tokens: max,
            overlap_tokens: overlap,
            hard_max_tokens: hard,
        }
    }

    fn word_paragraph(prefix: &str, n: usize) -> String {
        (0..n).map(|i| format!("{prefix}{i}")).collect::<Vec<_>>().join(" ")
    }

    #[test]
    fn short_article_is_one_chunk() {
        let codec = WordCodec::default();
        let chunks =
            chunk_article(&codec, "title here", "summary text", "body words", ChunkParams::default())
                .unwrap();
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].index, 0);
        assert!(chunks[0].text.contains("title here"));
        assert!(chunks[0].text.contains("body words"));
        assert_eq!(chunks[0].tokens, 6);
    }

    #[test]
    fn empty_article_yields_no_chunks() {
        let codec = WordCodec::default();
        let chunks = chunk_article(&codec, "", "  ", "", ChunkParams::default()).unwrap();
        assert!(chunks.is_empty());
    }

    #[test]
    fn paragraphs_pack_greedily_up_to_budget() {
        let codec = WordCodec::default();
        let content = format!(
            "{}\n\n{}\n\n{}",
            word_paragraph("a", 3),
            word_paragraph("b", 3),
            word_paragraph("c", 3)
        );
        // Budget of 6 words: first two paragraphs pack, third starts fresh.
        let chunks = chunk_article(&codec, "", "", &content, params(6, 2, 480)).unwrap();
        assert_eq!(chunks.len(), 2);
        assert!(chunks[0].text.contains("a0"));
        assert!(chunks[0].text.contains("b0"));
        assert!(chunks[1].text.contains("c0"));
    }

    #[test]
    fn long_paragraph_splits_on_danda() {
        let codec = WordCodec::default();
        let content = format!(
            "{}। {}। {}।",
            word_paragraph("x", 4),
            word_paragraph("y", 4),
            word_paragraph("z", 4)
        );
        let chunks = chunk_article(&codec, "", "", &content, params(5, 2, 480)).unwrap();
        assert_eq!(chunks.len(), 3);
        // End-sentence punctuation stays attached.
        assert!(chunks[0].text.ends_with('।'));
        assert!(chunks[0].text.contains("x0"));
        assert!(chunks[1].text.contains("y0"));
    }

    #[test]
    fn chunk_indices_are_contiguous() {
        let codec = WordCodec::default();
        let content = (0..10)
            .map(|i| word_paragraph(&format!("p{i}w"), 4))
            .collect::<Vec<_>>()
            .join("\n\n");
        let chunks = chunk_article(&codec, "", "", &content, params(8, 2, 480)).unwrap();
        for (i, c) in chunks.iter().enumerate() {
            assert_eq!(c.index, i);
        }
    }

    #[test]
    fn giant_paragraph_hits_token_window_fallback() {
        let codec = WordCodec::default();
        let content = word_paragraph("w", 5000);
        let chunks = chunk_article(&codec, "", "", &content, params(240, 40, 480)).unwrap();

        // ceil((5000 - 480) / 440) + 1 windows.
        assert_eq!(chunks.len(), 12);
        for c in &chunks {
            assert!(c.tokens <= 480, "chunk {} has {} tokens", c.index, c.tokens);
        }

        // Consecutive windows overlap by overlap_tokens words.
        for pair in chunks.windows(2) {
            let prev: Vec<&str> = pair[0].text.split_whitespace().collect();
            let next: Vec<&str> = pair[1].text.split_whitespace().collect();
            let tail = &prev[prev.len() - 40..];
            assert_eq!(&next[..40], tail);
        }
    }

    #[test]
    fn no_input_word_is_lost() {
        let codec = WordCodec::default();
        let content = format!(
            "{}\n\n{}",
            word_paragraph("long", 600),
            word_paragraph("short", 5)
        );
        let chunks = chunk_article(&codec, "", "", &content, params(240, 40, 480)).unwrap();
        let emitted: String = chunks
            .iter()
            .map(|c| c.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        for i in [0, 299, 599] {
            assert!(emitted.contains(&format!("long{i}")));
        }
        assert!(emitted.contains("short4"));
    }

    #[test]
    fn params_validation_rejects_bad_budgets() {
        let codec = WordCodec::default();
        assert!(matches!(
            chunk_article(&codec, "", "", "text", params(240, 40, 513)),
            Err(ChunkError::InvalidParams(_))
        ));
        assert!(matches!(
            chunk_article(&codec, "", "", "text", params(240, 480, 480)),
            Err(ChunkError::InvalidParams(_))
        ));
    }

    #[test]
    fn chunk_id_format() {
        assert_eq!(chunk_id("42", 3), "42::c0003");
    }
}
