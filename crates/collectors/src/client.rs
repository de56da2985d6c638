use std::time::Duration;

use serde_json::Value;

use crate::error::CollectorError;

const MAX_RETRIES: usize = 3;
const RETRY_MULTIPLIERS: [u32; 4] = [0, 1, 2, 4];

/// JSON-over-HTTP client shared by the API collectors.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
    backoff: Duration,
}

impl ApiClient {
    /// Creates a client for `base_url` with a one second retry backoff unit.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built (TLS backend failure).
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, CollectorError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("nashville-events/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| CollectorError::ClientInit(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
            backoff: Duration::from_secs(1),
        })
    }

    /// Sets the retry backoff unit. Retries wait 1x, 2x and 4x this value.
    #[must_use]
    pub const fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET `path` with `query` and parse the body as JSON.
    ///
    /// Transport failures, 429 and 5xx are retried; other statuses fail at once.
    ///
    /// # Errors
    /// Returns the last error once retries are exhausted, or the first
    /// non-transient failure.
    pub async fn get_json(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<Value, CollectorError> {
        let url = format!("{}{path}", self.base_url);
        let mut last_error: Option<CollectorError> = None;

        for attempt in 0..=MAX_RETRIES {
            if attempt > 0 {
                let multiplier = RETRY_MULTIPLIERS.get(attempt).copied().unwrap_or(4);
                let delay = self.backoff.saturating_mul(multiplier);
                tokio::time::sleep(delay).await;
                tracing::warn!(path, "HTTP retry attempt {attempt}/{MAX_RETRIES} after {delay:?}");
            }

            // Query strings carry API keys; keep them out of error messages.
            let response = match self.client.get(&url).query(query).send().await {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(CollectorError::HttpRequest(e.without_url()));
                    continue;
                },
            };

            let status = response.status();
            if status.is_success() {
                let body = match response.text().await {
                    Ok(b) => b,
                    Err(e) => {
                        last_error = Some(CollectorError::HttpRequest(e.without_url()));
                        continue;
                    },
                };
                return serde_json::from_str(&body).map_err(|e| CollectorError::JsonParse {
                    context: format!("response from {path}"),
                    source: e,
                });
            }

            let body =
                response.text().await.unwrap_or_else(|_| "Could not read error body".to_owned());
            let err = CollectorError::HttpStatus { code: status.as_u16(), body };
            if err.is_transient() {
                last_error = Some(err);
                continue;
            }
            return Err(err);
        }

        Err(CollectorError::RetriesExhausted(Box::new(
            last_error.unwrap_or(CollectorError::ClientInit("no attempt made".to_owned())),
        )))
    }
}
