//! Strict JSONL readers for the startup corpus artifacts.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::article::{Article, ChunkRecord};
use crate::CorpusError;

/// Reads one serde-decoded record per non-empty line.
///
/// Parsing is strict: a malformed line is a hard error, because a silently
/// dropped article would skew every ranking that touches it.
pub fn read_jsonl_records<T: DeserializeOwned>(
    path: impl AsRef<Path>,
) -> Result<Vec<T>, CorpusError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(CorpusError::MissingArtifact(path.display().to_string()));
    }

    info!("reading jsonl records from {:?}", path);
    let reader = BufReader::new(File::open(path)?);

    let mut out = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let record: T = serde_json::from_str(&line)
            .map_err(|e| CorpusError::Parse(format!("{}: line {}: {}", path.display(), i + 1, e)))?;
        out.push(record);
    }

    debug!("loaded {} records from {:?}", out.len(), path);
    Ok(out)
}

/// Immutable `article_id -> Article` table.
#[derive(Clone, Debug, Default)]
pub struct ArticleTable {
    by_id: HashMap<String, Article>,
}

impl ArticleTable {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CorpusError> {
        let records: Vec<Article> = read_jsonl_records(path)?;
        Ok(Self::from_articles(records))
    }

    pub fn from_articles(articles: impl IntoIterator<Item = Article>) -> Self {
        let by_id = articles.into_iter().map(|a| (a.id.clone(), a)).collect();
        Self { by_id }
    }

    pub fn get(&self, article_id: &str) -> Option<&Article> {
        self.by_id.get(article_id)
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Article> {
        self.by_id.values()
    }
}

/// Immutable `chunk_id -> chunk_text` map for snippet assembly.
#[derive(Clone, Debug, Default)]
pub struct ChunkTextMap {
    by_id: HashMap<String, String>,
}

impl ChunkTextMap {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CorpusError> {
        let records: Vec<ChunkRecord> = read_jsonl_records(path)?;
        let by_id = records
            .into_iter()
            .map(|c| (c.chunk_id, c.chunk_text))
            .collect();
        Ok(Self { by_id })
    }

    pub fn get(&self, chunk_id: &str) -> Option<&str> {
        self.by_id.get(chunk_id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(name: &str, contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(name);
        let mut f = File::create(&path).unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn loads_article_table_from_jsonl() {
        let path = write_temp(
            "corpus_store_articles_test.jsonl",
            "{\"id\":\"1\",\"title_hi\":\"शीर्षक\",\"published_ts\":100}\n\n{\"id\":\"2\"}\n",
        );
        let table = ArticleTable::load(&path).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.get("1").unwrap().title_hi.as_deref(), Some("शीर्षक"));
        assert!(table.get("3").is_none());
    }

    #[test]
    fn malformed_line_is_a_hard_error() {
        let path = write_temp(
            "corpus_store_bad_test.jsonl",
            "{\"id\":\"1\"}\nnot json\n",
        );
        let err = ArticleTable::load(&path).unwrap_err();
        assert!(matches!(err, CorpusError::Parse(_)));
    }

    #[test]
    fn missing_artifact_is_reported() {
        let err = ArticleTable::load("/nonexistent/articles.jsonl").unwrap_err();
        assert!(matches!(err, CorpusError::MissingArtifact(_)));
    }

    #[test]
    fn chunk_text_map_lookup() {
        let path = write_temp(
            "corpus_store_chunks_test.jsonl",
            "{\"chunk_id\":\"1::c0000\",\"article_id\":\"1\",\"chunk_index\":0,\"chunk_text\":\"पहला हिस्सा\"}\n",
        );
        let map = ChunkTextMap::load(&path).unwrap();
        assert_eq!(map.get("1::c0000"), Some("पहला हिस्सा"));
        assert_eq!(map.get("1::c0001"), None);
    }
}
