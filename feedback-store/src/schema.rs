//! Idempotent DDL for the append-only feedback tables.
//!
//! Candidate rows snapshot every display field at query time, so training
//! runs never need a live join against the article table.

pub const DDL_STATEMENTS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS query_log (
      id BIGSERIAL PRIMARY KEY,
      created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
      query_raw TEXT NOT NULL,
      query_mode TEXT NOT NULL,
      query_used TEXT NOT NULL,
      query_semantic TEXT NOT NULL,
      filters JSONB NULL,
      ranker_version TEXT NOT NULL,
      retrieval_version TEXT NOT NULL,
      meta JSONB NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS candidate_log (
      id BIGSERIAL PRIMARY KEY,
      query_id BIGINT NOT NULL REFERENCES query_log(id) ON DELETE CASCADE,
      rank INT NOT NULL,
      article_id TEXT NOT NULL,
      url TEXT NULL,
      title TEXT NULL,
      published_date TEXT NULL,
      summary TEXT NULL,
      primary_category TEXT NULL,
      categories JSONB NOT NULL,
      tags JSONB NOT NULL,
      location JSONB NOT NULL,
      partner_label TEXT NULL,
      contributors JSONB NOT NULL,
      score DOUBLE PRECISION NOT NULL,
      features JSONB NOT NULL,
      explanation JSONB NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_candidate_query_id ON candidate_log(query_id)",
    "CREATE INDEX IF NOT EXISTS idx_candidate_article_id ON candidate_log(article_id)",
    r#"
    CREATE TABLE IF NOT EXISTS labels (
      id BIGSERIAL PRIMARY KEY,
      created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
      query_id BIGINT NOT NULL REFERENCES query_log(id) ON DELETE CASCADE,
      article_id TEXT NULL,
      label INT NOT NULL,
      note TEXT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_labels_query_id ON labels(query_id)",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_statement_is_idempotent() {
        for stmt in DDL_STATEMENTS {
            assert!(stmt.contains("IF NOT EXISTS"), "not idempotent: {stmt}");
        }
    }

    #[test]
    fn children_cascade_on_query_delete() {
        let ddl = DDL_STATEMENTS.join("\n");
        assert_eq!(ddl.matches("ON DELETE CASCADE").count(), 2);
    }
}
