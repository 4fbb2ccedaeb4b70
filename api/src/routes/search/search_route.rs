//! The hybrid search endpoint: canonicalize, detect entities, fan out to the
//! lexical and semantic branches in parallel, merge, rank, log, respond.

use std::sync::Arc;

use axum::{Json, extract::State};
use chrono::Utc;
use serde_json::{Value, json};
use tracing::{debug, info};

use corpus_store::ChunkTextMap;
use feedback_store::{CandidateRow, NewQueryLog};
use gazetteer::{detect_entities, merge_filters};
use query_text::{canonicalize, tokenize_query};
use ranker::{RankedCandidate, merge_candidates, rank_candidates};
use vector_store::VectorError;

use crate::core::app_state::AppState;
use crate::error_handler::{AppError, AppResult};
use crate::routes::search::search_request::SearchRequest;
use crate::routes::search::search_response::{SearchHit, SearchResponse};

/// Snippets are a flattened prefix of the best-matching chunk.
const SNIPPET_MAX_CHARS: usize = 420;

pub async fn search_route(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SearchRequest>,
) -> AppResult<Json<SearchResponse>> {
    if req.query.trim().is_empty() {
        return Err(AppError::BadRequest("empty query".into()));
    }

    let canon = canonicalize(&req.query);
    let query_semantic = req.query.trim().to_string();

    let entities = detect_entities(&canon.q, canon.mode, &state.gazetteer);
    let filter_final = merge_filters(req.filter_by.as_deref(), entities.filter_by_auto.as_deref());

    debug!(
        "search: mode={} filter_final={:?}",
        canon.mode, filter_final
    );

    // Lexical and semantic branches run concurrently; any failure aborts the
    // request before the query row is written.
    let lexical_branch = async {
        state
            .lexical
            .search(
                &canon.q,
                canon.mode,
                filter_final.as_deref(),
                state.config.lexical_topk,
            )
            .await
            .map_err(AppError::from)
    };

    let semantic_branch = async {
        let vector = state.semantic.encode_query(&query_semantic).await?;
        let (articles, chunks) = tokio::try_join!(
            state
                .semantic
                .search_articles(vector.clone(), state.config.sem_article_topk),
            state
                .semantic
                .search_chunks(vector, state.config.sem_chunk_topk),
        )?;
        Ok::<_, VectorError>((articles, chunks))
    };

    let (lex_hits, (sem_articles, sem_chunks)) = tokio::try_join!(lexical_branch, async {
        semantic_branch.await.map_err(AppError::from)
    })?;

    let lex_pairs: Vec<(String, f64)> = lex_hits
        .iter()
        .map(|h| (h.article_id.clone(), h.lexical_score))
        .collect();
    let chunk_tuples: Vec<(String, String, f32)> = sem_chunks
        .iter()
        .map(|h| (h.chunk_id.clone(), h.article_id.clone(), h.score))
        .collect();

    let candidates = merge_candidates(
        &lex_pairs,
        &sem_articles,
        &chunk_tuples,
        &state.articles,
        state.config.candidate_cap,
    );
    let cand_n = candidates.len();

    let q_tokens = tokenize_query(&canon.q);
    let ranked = rank_candidates(candidates, &q_tokens, Utc::now().timestamp());

    let results: Vec<SearchHit> = ranked
        .iter()
        .take(req.per_page.max(1))
        .map(|item| build_hit(item, &state.chunks, req.explain))
        .collect();

    // Log-then-return: the query row goes first, then its candidate batch;
    // a storage failure withholds the response.
    let meta = json!({
        "lex_n": lex_hits.len(),
        "sem_article_n": sem_articles.len(),
        "sem_chunk_n": sem_chunks.len(),
        "cand_n": cand_n,
        "entity_matches": entities.matches,
        "entity_confidence": entities.confidence,
        "filter_by_auto": entities.filter_by_auto,
        "filter_by_final": filter_final,
    });

    let query_id = state
        .store
        .insert_query(NewQueryLog {
            query_raw: req.query.clone(),
            query_mode: canon.mode.to_string(),
            query_used: canon.q.clone(),
            query_semantic: query_semantic.clone(),
            filters: req.filter_by.as_ref().map(|f| json!({ "filter_by": f })),
            ranker_version: state.config.ranker_version.clone(),
            retrieval_version: state.config.retrieval_version.clone(),
            meta: Some(meta),
        })
        .await?;

    let topn = state.config.log_candidates_topn.min(ranked.len());
    let rows: Vec<CandidateRow> = ranked[..topn].iter().map(candidate_row).collect();
    state.store.insert_candidates(query_id, &rows).await?;

    info!(
        "search ok: query_id={} mode={} results={} candidates={}",
        query_id,
        canon.mode,
        results.len(),
        cand_n
    );

    Ok(Json(SearchResponse {
        query_id,
        mode: canon.mode.to_string(),
        query_used: canon.q,
        query_semantic,
        results,
    }))
}

fn build_hit(item: &RankedCandidate, chunks: &ChunkTextMap, explain: bool) -> SearchHit {
    let c = &item.candidate;
    SearchHit {
        rank: item.rank,
        id: c.article_id.clone(),
        title: c.title.clone(),
        date: c.published_date.clone(),
        summary: c.summary.clone(),
        url: c.url.clone(),
        primary_category: c.primary_category.clone(),
        categories: c.categories.clone(),
        tags: c.tags.clone(),
        location: c.location.clone(),
        partner_label: c.partner_label.clone(),
        contributors: c.contributors.clone(),
        score: item.score,
        snippet: choose_snippet(c.best_chunk_id.as_deref(), chunks),
        features: explain.then(|| features_json(item)),
        explanation: explain.then(|| explanation_json(item)),
    }
}

/// Flattens the best chunk's text into a bounded single-line snippet.
fn choose_snippet(best_chunk_id: Option<&str>, chunks: &ChunkTextMap) -> Option<String> {
    let chunk_id = best_chunk_id?;
    let text = chunks.get(chunk_id)?;
    let flat = text.replace('\n', " ");
    let collapsed = flat.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        return None;
    }
    Some(collapsed.chars().take(SNIPPET_MAX_CHARS).collect())
}

fn features_json(item: &RankedCandidate) -> Value {
    serde_json::to_value(&item.features).unwrap_or(Value::Null)
}

fn explanation_json(item: &RankedCandidate) -> Value {
    serde_json::to_value(&item.explanation).unwrap_or(Value::Null)
}

fn candidate_row(item: &RankedCandidate) -> CandidateRow {
    let c = &item.candidate;
    CandidateRow {
        rank: item.rank as i32,
        article_id: c.article_id.clone(),
        url: c.url.clone(),
        title: c.title.clone(),
        published_date: c.published_date.clone(),
        summary: c.summary.clone(),
        primary_category: c.primary_category.clone(),
        categories: json!(c.categories),
        tags: json!(c.tags),
        location: json!(c.location),
        partner_label: c.partner_label.clone(),
        contributors: json!(c.contributors),
        score: item.score,
        features: features_json(item),
        explanation: Some(explanation_json(item)),
    }
}
