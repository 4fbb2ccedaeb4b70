//! Union of retrieval branches into per-article candidates.

use std::collections::HashMap;

use tracing::debug;

use corpus_store::ArticleTable;

/// One merged candidate: raw retrieval signals plus a snapshot of the
/// article's display and matching metadata taken at query time.
#[derive(Clone, Debug, Default)]
pub struct Candidate {
    pub article_id: String,
    pub url: Option<String>,
    pub title: Option<String>,
    pub summary: Option<String>,
    pub published_date: Option<String>,
    pub published_ts: i64,
    pub primary_category: Option<String>,
    pub categories: Vec<String>,
    pub tags: Vec<String>,
    pub location: Vec<String>,
    pub partner_label: Option<String>,
    pub contributors: Vec<String>,

    pub categories_norm: Vec<String>,
    pub tags_norm: Vec<String>,
    pub locations_norm: Vec<String>,
    pub contributors_norm: Vec<String>,

    pub lexical_score: f64,
    pub sem_article: f64,
    pub sem_chunk: f64,
    pub best_chunk_id: Option<String>,
    pub src_lexical: bool,
    pub src_sem_article: bool,
    pub src_sem_chunk: bool,
}

#[derive(Default)]
struct Signals {
    lexical: f64,
    sem_article: f64,
    sem_chunk: f64,
    best_chunk_id: Option<String>,
    src_lexical: bool,
    src_sem_article: bool,
    src_sem_chunk: bool,
}

/// Unions the branches keyed by article id.
///
/// Signals aggregate with max; the best chunk id follows the max chunk
/// score. The result is pre-sorted by the raw signal sum (stable, so branch
/// arrival order never matters) and capped before ranking.
pub fn merge_candidates(
    lex: &[(String, f64)],
    sem_articles: &[(String, f32)],
    sem_chunks: &[(String, String, f32)],
    articles: &ArticleTable,
    cap: usize,
) -> Vec<Candidate> {
    let mut order: Vec<String> = Vec::new();
    let mut signals: HashMap<String, Signals> = HashMap::new();

    for (article_id, score) in lex {
        let s = signals_entry(&mut order, &mut signals, article_id);
        s.lexical = s.lexical.max(*score);
        s.src_lexical = true;
    }

    for (article_id, score) in sem_articles {
        let s = signals_entry(&mut order, &mut signals, article_id);
        s.sem_article = s.sem_article.max(*score as f64);
        s.src_sem_article = true;
    }

    for (chunk_id, article_id, score) in sem_chunks {
        let s = signals_entry(&mut order, &mut signals, article_id);
        let score = *score as f64;
        if score > s.sem_chunk {
            s.sem_chunk = score;
            s.best_chunk_id = Some(chunk_id.clone());
        }
        s.src_sem_chunk = true;
    }

    let mut out: Vec<Candidate> = order
        .into_iter()
        .map(|article_id| {
            let s = signals.remove(&article_id).unwrap_or_default();
            build_candidate(article_id, s, articles)
        })
        .collect();

    out.sort_by(|a, b| {
        let sa = a.lexical_score + a.sem_chunk + a.sem_article;
        let sb = b.lexical_score + b.sem_chunk + b.sem_article;
        sb.partial_cmp(&sa).unwrap_or(std::cmp::Ordering::Equal)
    });
    out.truncate(cap);

    debug!("merged candidate set: {} articles", out.len());
    out
}

fn signals_entry<'a>(
    order: &mut Vec<String>,
    signals: &'a mut HashMap<String, Signals>,
    article_id: &str,
) -> &'a mut Signals {
    if !signals.contains_key(article_id) {
        order.push(article_id.to_string());
    }
    signals.entry(article_id.to_string()).or_default()
}

fn build_candidate(article_id: String, s: Signals, articles: &ArticleTable) -> Candidate {
    let mut c = Candidate {
        lexical_score: s.lexical,
        sem_article: s.sem_article,
        sem_chunk: s.sem_chunk,
        best_chunk_id: s.best_chunk_id,
        src_lexical: s.src_lexical,
        src_sem_article: s.src_sem_article,
        src_sem_chunk: s.src_sem_chunk,
        ..Default::default()
    };

    if let Some(a) = articles.get(&article_id) {
        c.url = a.url.clone();
        c.title = a.title_hi.clone();
        c.summary = a.summary_hi.clone();
        c.published_date = a.published_date.clone();
        c.published_ts = a.published_ts;
        c.primary_category = a.primary_category().map(str::to_string);
        c.categories = a.categories.clone();
        c.tags = a.tags.clone();
        c.location = a.locations.clone();
        c.partner_label = a.partner_label.clone();
        c.contributors = a.contributors.clone();
        c.categories_norm = a.categories_norm.clone();
        c.tags_norm = a.tags_norm.clone();
        c.locations_norm = a.locations_norm.clone();
        c.contributors_norm = a.contributors_norm.clone();
    }

    c.article_id = article_id;
    c
}

#[cfg(test)]
mod tests {
    use super::*;
    use corpus_store::Article;

    fn table() -> ArticleTable {
        ArticleTable::from_articles([Article {
            id: "a42".into(),
            title_hi: Some("शीर्षक".into()),
            locations_norm: vec!["bihar".into()],
            published_ts: 1_700_000_000,
            ..Default::default()
        }])
    }

    #[test]
    fn aggregates_signals_with_max() {
        let merged = merge_candidates(
            &[("a42".into(), 12.5), ("a42".into(), 7.0)],
            &[],
            &[("c17".into(), "a42".into(), 0.81)],
            &table(),
            200,
        );
        assert_eq!(merged.len(), 1);
        let c = &merged[0];
        assert_eq!(c.lexical_score, 12.5);
        assert_eq!(c.sem_chunk, 0.81);
        assert!(c.src_lexical);
        assert!(c.src_sem_chunk);
        assert!(!c.src_sem_article);
        assert_eq!(c.best_chunk_id.as_deref(), Some("c17"));
        assert_eq!(c.title.as_deref(), Some("शीर्षक"));
    }

    #[test]
    fn best_chunk_follows_max_chunk_score() {
        let merged = merge_candidates(
            &[],
            &[],
            &[
                ("c1".into(), "a42".into(), 0.40),
                ("c2".into(), "a42".into(), 0.90),
                ("c3".into(), "a42".into(), 0.70),
            ],
            &table(),
            200,
        );
        assert_eq!(merged[0].best_chunk_id.as_deref(), Some("c2"));
        assert_eq!(merged[0].sem_chunk, 0.90);
    }

    #[test]
    fn merge_is_commutative_across_branches() {
        let lex = [("a1".to_string(), 3.0), ("a2".to_string(), 1.0)];
        let sa = [("a2".to_string(), 0.5f32)];
        let sc = [("c1".to_string(), "a3".to_string(), 0.8f32)];
        let t = ArticleTable::default();

        let merged = merge_candidates(&lex, &sa, &sc, &t, 200);
        let ids: Vec<&str> = merged.iter().map(|c| c.article_id.as_str()).collect();

        // Same inputs in a different per-branch order produce the same set
        // and the same pre-sorted order.
        let lex2 = [("a2".to_string(), 1.0), ("a1".to_string(), 3.0)];
        let merged2 = merge_candidates(&lex2, &sa, &sc, &t, 200);
        let ids2: Vec<&str> = merged2.iter().map(|c| c.article_id.as_str()).collect();
        assert_eq!(ids, ids2);
    }

    #[test]
    fn caps_candidate_set() {
        let lex: Vec<(String, f64)> = (0..300).map(|i| (format!("a{i}"), i as f64)).collect();
        let merged = merge_candidates(&lex, &[], &[], &ArticleTable::default(), 200);
        assert_eq!(merged.len(), 200);
        // Kept candidates are the strongest by raw sum.
        assert_eq!(merged[0].article_id, "a299");
    }

    #[test]
    fn unknown_article_gets_empty_snapshot() {
        let merged = merge_candidates(&[("ghost".into(), 1.0)], &[], &[], &table(), 200);
        assert_eq!(merged[0].article_id, "ghost");
        assert!(merged[0].title.is_none());
        assert_eq!(merged[0].published_ts, 0);
    }
}
