use reqwest::{Client, Url};
use thiserror::Error;

use super::types::ApiTransactionsResponse;

pub const DEFAULT_TRANSACTIONS_URL: &str = "https://api.whale-alert.io/v1/transactions";

#[derive(Debug, Error)]
pub enum FeedClientError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unparseable response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("unexpected response: {0}")]
    Unexpected(String),
}

/// Client for the large-transfer feed.
#[derive(Debug, Clone)]
pub struct TransactionClient {
    http: Client,
    base_url: String,
    api_key: String,
}

impl TransactionClient {
    pub fn new(http: Client, base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    fn transactions_url(&self, start: i64, min_value: u64) -> Result<Url, FeedClientError> {
        Url::parse_with_params(
            &self.base_url,
            &[
                ("start", start.to_string()),
                ("min_value", min_value.to_string()),
                ("api_key", self.api_key.clone()),
            ],
        )
        .map_err(|e| FeedClientError::Unexpected(format!("bad feed url: {e}")))
    }

    /// Fetch transfers with `timestamp >= start` and `amount_usd >= min_value`.
    ///
    /// Non-2xx responses are still decoded, since the feed reports errors as
    /// `{"result": "error", "message": ...}`; callers check `is_success()`.
    pub async fn get_transactions(
        &self,
        start: i64,
        min_value: u64,
    ) -> Result<ApiTransactionsResponse, FeedClientError> {
        let url = self.transactions_url(start, min_value)?;
        let resp = self.http.get(url).send().await?;
        let status = resp.status();
        let body = resp.text().await?;

        match serde_json::from_str::<ApiTransactionsResponse>(&body) {
            Ok(parsed) => Ok(parsed),
            Err(e) if status.is_success() => Err(FeedClientError::Decode(e)),
            Err(_) => Err(FeedClientError::Unexpected(format!(
                "status {status} with undecodable body"
            ))),
        }
    }
}
