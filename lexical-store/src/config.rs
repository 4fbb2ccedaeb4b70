//! Typesense connection configuration.

use std::time::Duration;

use crate::LexicalError;

/// Connection settings for the lexical index.
#[derive(Clone, Debug)]
pub struct LexicalConfig {
    pub host: String,
    pub port: u16,
    pub protocol: String,
    pub api_key: String,
    pub collection: String,
    /// Per-request timeout; retrieval failures surface, they are not retried.
    pub timeout: Duration,
}

impl LexicalConfig {
    /// Builds the config from environment variables.
    ///
    /// Recognized vars:
    /// - TYPESENSE_HOST (default: localhost)
    /// - TYPESENSE_PORT (default: 8108)
    /// - TYPESENSE_PROTOCOL (default: http)
    /// - TYPESENSE_API_KEY (required)
    /// - TYPESENSE_COLLECTION (default: articles_hi_v1)
    pub fn from_env() -> Result<Self, LexicalError> {
        use std::env;

        let api_key = env::var("TYPESENSE_API_KEY")
            .map_err(|_| LexicalError::Config("TYPESENSE_API_KEY is required".into()))?;

        let port = env::var("TYPESENSE_PORT")
            .ok()
            .and_then(|s| s.parse::<u16>().ok())
            .unwrap_or(8108);

        Ok(Self {
            host: env::var("TYPESENSE_HOST").unwrap_or_else(|_| "localhost".into()),
            port,
            protocol: env::var("TYPESENSE_PROTOCOL").unwrap_or_else(|_| "http".into()),
            api_key,
            collection: env::var("TYPESENSE_COLLECTION")
                .unwrap_or_else(|_| "articles_hi_v1".into()),
            timeout: Duration::from_secs(10),
        })
    }

    pub fn base_url(&self) -> String {
        format!("{}://{}:{}", self.protocol, self.host, self.port)
    }
}
