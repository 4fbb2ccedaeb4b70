//! Feedback endpoints: per-article labels and query-level "nothing relevant".

use std::sync::Arc;

use axum::{Json, extract::State};
use serde_json::{Value, json};
use tracing::info;

use crate::core::app_state::AppState;
use crate::error_handler::{AppError, AppResult};
use crate::routes::label::label_request::{LabelRequest, QueryLabelRequest};

pub async fn label_route(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LabelRequest>,
) -> AppResult<Json<Value>> {
    if req.label != 0 && req.label != 1 {
        return Err(AppError::BadRequest("label must be 0 or 1".into()));
    }
    let Some(article_id) = req.article_id.as_deref() else {
        return Err(AppError::BadRequest(
            "article_id is required; use /label_query for query-level feedback".into(),
        ));
    };

    state
        .store
        .insert_label(req.query_id, Some(article_id), req.label, req.note.as_deref())
        .await?;

    info!(
        "label recorded: query_id={} article_id={} label={}",
        req.query_id, article_id, req.label
    );
    Ok(Json(json!({ "ok": true })))
}

pub async fn label_query_route(
    State(state): State<Arc<AppState>>,
    Json(req): Json<QueryLabelRequest>,
) -> AppResult<Json<Value>> {
    if req.label != 0 {
        return Err(AppError::BadRequest(
            "only label=0 is supported for query-level feedback".into(),
        ));
    }

    state
        .store
        .insert_label(req.query_id, None, 0, req.note.as_deref())
        .await?;

    info!("query-level label recorded: query_id={}", req.query_id);
    Ok(Json(json!({ "ok": true })))
}
