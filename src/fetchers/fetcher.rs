use crate::results::FetchResult;
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Why a homepage could not be fetched
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid origin URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("timed out after {0:?}")]
    Timeout(Duration),

    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("fetch task aborted: {0}")]
    Aborted(String),
}

// Base trait for homepage fetchers
//
// Implementations are shared by every worker in the pool, so a call must not
// depend on state left behind by another call.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetch a single origin, giving up after `timeout`.
    ///
    /// Never fails past this boundary: errors come back as a failed
    /// [`FetchResult`] with an empty body.
    async fn fetch(&self, origin: &str, timeout: Duration) -> FetchResult;
}
