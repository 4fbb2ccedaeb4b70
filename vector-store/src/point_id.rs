//! Stable point ids for the two collections.
//!
//! Articles use their numeric id directly. Chunk ids are strings
//! (`{article_id}::c{index:04}`), so they are hashed to the first 8 bytes of
//! SHA-1 read as a big-endian unsigned 64-bit integer. The scheme must match
//! ingest exactly or query-time lookups silently miss.

use sha1::{Digest, Sha1};

use crate::VectorError;

/// Point id of a chunk: first 8 bytes of `SHA-1(chunk_id)`, big-endian.
pub fn chunk_point_id(chunk_id: &str) -> u64 {
    let digest = Sha1::digest(chunk_id.as_bytes());
    let mut prefix = [0u8; 8];
    prefix.copy_from_slice(&digest[..8]);
    u64::from_be_bytes(prefix)
}

/// Point id of an article: the article id itself, which is numeric in the
/// corpus.
pub fn article_point_id(article_id: &str) -> Result<u64, VectorError> {
    article_id
        .parse::<u64>()
        .map_err(|_| VectorError::Parse(format!("non-numeric article id: {article_id}")))
}

/// Canonical chunk id format shared with the offline chunker.
pub fn format_chunk_id(article_id: &str, index: usize) -> String {
    format!("{article_id}::c{index:04}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunk_point_id_is_stable() {
        let id = chunk_point_id("42::c0000");
        assert_eq!(id, chunk_point_id("42::c0000"));
        assert_ne!(id, chunk_point_id("42::c0001"));
    }

    #[test]
    fn chunk_point_id_matches_sha1_prefix() {
        // SHA-1("abc") = a9993e36 4706816a ba3e2571 7850c26c 9cd0d89d
        assert_eq!(chunk_point_id("abc"), 0xa9993e364706816a);
    }

    #[test]
    fn article_point_id_requires_numeric_id() {
        assert_eq!(article_point_id("1234").unwrap(), 1234);
        assert!(article_point_id("a42").is_err());
    }

    #[test]
    fn chunk_id_format_is_zero_padded() {
        assert_eq!(format_chunk_id("42", 7), "42::c0007");
        assert_eq!(format_chunk_id("42", 12345), "42::c12345");
    }
}
