//! Append-only relational store for query, candidate and label logs.
//!
//! Three tables back later learning-to-rank: `query_log` (one row per
//! search), `candidate_log` (the ranked snapshot of each logged candidate)
//! and `labels` (explicit relevance feedback). Writes are inserts only; the
//! candidate batch for a query commits in one transaction.

mod schema;

pub use schema::DDL_STATEMENTS;

use std::time::Duration;

use serde_json::Value;
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::types::Json;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("config error: {0}")]
    Config(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// One query-log row to insert.
#[derive(Clone, Debug)]
pub struct NewQueryLog {
    pub query_raw: String,
    pub query_mode: String,
    pub query_used: String,
    pub query_semantic: String,
    pub filters: Option<Value>,
    pub ranker_version: String,
    pub retrieval_version: String,
    pub meta: Option<Value>,
}

/// One candidate-log row: the full display snapshot plus score, features and
/// explanation.
#[derive(Clone, Debug)]
pub struct CandidateRow {
    pub rank: i32,
    pub article_id: String,
    pub url: Option<String>,
    pub title: Option<String>,
    pub published_date: Option<String>,
    pub summary: Option<String>,
    pub primary_category: Option<String>,
    pub categories: Value,
    pub tags: Value,
    pub location: Value,
    pub partner_label: Option<String>,
    pub contributors: Value,
    pub score: f64,
    pub features: Value,
    pub explanation: Option<Value>,
}

/// Postgres-backed feedback store.
#[derive(Clone, Debug)]
pub struct FeedbackStore {
    pool: PgPool,
}

impl FeedbackStore {
    /// Connects using `DATABASE_URL` semantics and a bounded pool.
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        if database_url.trim().is_empty() {
            return Err(StoreError::Config("DATABASE_URL is empty".into()));
        }

        let pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(30))
            .connect(database_url)
            .await?;

        info!("connected to feedback database");
        Ok(Self { pool })
    }

    /// Creates tables and indexes if missing; safe to run on every boot.
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        for stmt in DDL_STATEMENTS {
            sqlx::query(stmt).execute(&self.pool).await?;
        }
        debug!("feedback schema ensured");
        Ok(())
    }

    /// Inserts the query row and returns its generated id.
    pub async fn insert_query(&self, row: NewQueryLog) -> Result<i64, StoreError> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO query_log(query_raw, query_mode, query_used, query_semantic,
                                  filters, ranker_version, retrieval_version, meta)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id
            "#,
        )
        .bind(&row.query_raw)
        .bind(&row.query_mode)
        .bind(&row.query_used)
        .bind(&row.query_semantic)
        .bind(row.filters.map(Json))
        .bind(&row.ranker_version)
        .bind(&row.retrieval_version)
        .bind(row.meta.map(Json))
        .fetch_one(&self.pool)
        .await?;

        debug!("inserted query_log row id={id}");
        Ok(id)
    }

    /// Inserts the ranked candidate snapshot for a query in one transaction.
    pub async fn insert_candidates(
        &self,
        query_id: i64,
        rows: &[CandidateRow],
    ) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;

        for r in rows {
            sqlx::query(
                r#"
                INSERT INTO candidate_log(query_id, rank, article_id, url, title,
                                          published_date, summary, primary_category,
                                          categories, tags, location, partner_label,
                                          contributors, score, features, explanation)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
                "#,
            )
            .bind(query_id)
            .bind(r.rank)
            .bind(&r.article_id)
            .bind(&r.url)
            .bind(&r.title)
            .bind(&r.published_date)
            .bind(&r.summary)
            .bind(&r.primary_category)
            .bind(Json(&r.categories))
            .bind(Json(&r.tags))
            .bind(Json(&r.location))
            .bind(&r.partner_label)
            .bind(Json(&r.contributors))
            .bind(r.score)
            .bind(Json(&r.features))
            .bind(r.explanation.as_ref().map(Json))
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        debug!("inserted {} candidate_log rows for query {query_id}", rows.len());
        Ok(())
    }

    /// Inserts one label row; `article_id = None` records query-level
    /// "nothing relevant" feedback.
    pub async fn insert_label(
        &self,
        query_id: i64,
        article_id: Option<&str>,
        label: i32,
        note: Option<&str>,
    ) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO labels(query_id, article_id, label, note)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(query_id)
        .bind(article_id)
        .bind(label)
        .bind(note)
        .execute(&self.pool)
        .await?;

        debug!("inserted label for query {query_id} article {article_id:?}");
        Ok(())
    }
}
