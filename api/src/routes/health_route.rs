use std::sync::Arc;

use axum::{Json, extract::State};
use serde::Serialize;

use crate::core::app_state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub ok: bool,
    pub ranker_version: String,
    pub retrieval_version: String,
}

pub async fn health_route(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        ok: true,
        ranker_version: state.config.ranker_version.clone(),
        retrieval_version: state.config.retrieval_version.clone(),
    })
}
