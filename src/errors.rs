use crate::feeds::{FeedClientError, PriceClientError};

#[derive(Debug, thiserror::Error)]
pub enum WatchError {
    #[error("feed request failed: {0}")]
    Feed(#[from] FeedClientError),

    #[error("feed rejected query: {0}")]
    FeedRejected(String),

    #[error("price sample failed: {0}")]
    PriceSample(#[from] PriceClientError),
}

impl WatchError {
    /// Errors that only abandon the feed half of a tick.
    pub fn is_feed_error(&self) -> bool {
        matches!(self, WatchError::Feed(_) | WatchError::FeedRejected(_))
    }
}
