use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use feedback_store::StoreError;
use lexical_store::LexicalError;
use vector_store::VectorError;

/// Public application error type.
#[derive(Debug, Error)]
pub enum AppError {
    // --- Boot / startup ---
    #[error("missing required environment variable: {0}")]
    MissingEnv(&'static str),

    #[error("startup error: {0}")]
    Startup(String),

    // --- IO / network / server ---
    #[error("failed to bind listener")]
    Bind(#[source] std::io::Error),

    #[error("server error")]
    Server(#[source] std::io::Error),

    // --- Request / routing ---
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Lexical or vector fan-out failed; the query row is never written.
    #[error("retrieval error: {0}")]
    Retrieval(String),

    /// Feedback insert failed after ranking; the search response is withheld.
    #[error("storage error: {0}")]
    Storage(String),
}

impl AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            // startup-only
            AppError::MissingEnv(_) | AppError::Startup(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Retrieval(_) => StatusCode::BAD_GATEWAY,
            AppError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Bind(_) | AppError::Server(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            AppError::MissingEnv(_) => "MISSING_ENV",
            AppError::Startup(_) => "STARTUP_ERROR",
            AppError::Bind(_) => "BIND_ERROR",
            AppError::Server(_) => "SERVER_ERROR",
            AppError::BadRequest(_) => "BAD_REQUEST",
            AppError::Retrieval(_) => "RETRIEVAL_ERROR",
            AppError::Storage(_) => "STORAGE_ERROR",
        }
    }

    /// Client-safe message: internal errors keep their detail in the server
    /// log only.
    fn client_message(&self) -> String {
        match self {
            AppError::BadRequest(_) => self.to_string(),
            AppError::Retrieval(_) => "retrieval backend unavailable".into(),
            AppError::Storage(_) => "feedback storage unavailable".into(),
            _ => "internal server error".into(),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        tracing::error!("request failed: {self}");
        let body = ErrorBody {
            error: self.error_code(),
            message: self.client_message(),
        };
        (status, Json(body)).into_response()
    }
}

/// Handy result alias used across handlers.
pub type AppResult<T> = Result<T, AppError>;

impl From<LexicalError> for AppError {
    fn from(err: LexicalError) -> Self {
        AppError::Retrieval(err.to_string())
    }
}

impl From<VectorError> for AppError {
    fn from(err: VectorError) -> Self {
        AppError::Retrieval(err.to_string())
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        AppError::Storage(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_kinds_map_to_expected_statuses() {
        assert_eq!(
            AppError::BadRequest("empty query".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Retrieval("timeout".into()).status_code(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            AppError::Storage("insert failed".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn internal_detail_never_reaches_the_client() {
        let err = AppError::Storage("password=hunter2 connection refused".into());
        assert_eq!(err.client_message(), "feedback storage unavailable");
    }
}
