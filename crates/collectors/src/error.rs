//! Typed error enum for the collectors crate.

use std::path::PathBuf;

use thiserror::Error;

/// Errors from collecting raw captures.
#[derive(Debug, Error)]
pub enum CollectorError {
    #[error("HTTP request failed: {0}")]
    HttpRequest(#[from] reqwest::Error),
    #[error("HTTP status {code}: {body}")]
    HttpStatus { code: u16, body: String },
    #[error("JSON parse error in {context}: {source}")]
    JsonParse {
        context: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("missing credential: {0}")]
    MissingCredential(&'static str),
    #[error("no API collector named {0:?}")]
    UnknownSource(String),
    #[error("client initialization failed: {0}")]
    ClientInit(String),
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("all retries exhausted, last error: {0}")]
    RetriesExhausted(Box<CollectorError>),
}

impl CollectorError {
    /// Whether this error is transient and should be retried.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::HttpRequest(_) => true,
            Self::HttpStatus { code, .. } => matches!(code, 429 | 500 | 502 | 503 | 504),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_limit_and_server_errors_are_transient() {
        for code in [429, 500, 502, 503, 504] {
            assert!(CollectorError::HttpStatus { code, body: String::new() }.is_transient());
        }
    }

    #[test]
    fn client_errors_are_permanent() {
        assert!(!CollectorError::HttpStatus { code: 401, body: String::new() }.is_transient());
        assert!(!CollectorError::MissingCredential("ticketmaster_api_key").is_transient());
        let exhausted = CollectorError::RetriesExhausted(Box::new(CollectorError::HttpStatus {
            code: 503,
            body: String::new(),
        }));
        assert!(!exhausted.is_transient());
    }
}
