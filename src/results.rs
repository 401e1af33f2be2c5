use crate::fetchers::FetchError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One entry of the ranked site list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteRecord {
    /// Homepage URL of the site, e.g. `https://www.example.com`
    pub origin: String,

    /// Popularity bucket from the list (lower is more popular)
    pub rank: u64,
}

impl SiteRecord {
    /// Create a new site record
    pub fn new(origin: impl Into<String>, rank: u64) -> Self {
        Self {
            origin: origin.into(),
            rank,
        }
    }
}

/// How a single homepage fetch ended
#[derive(Debug)]
pub enum FetchOutcome {
    /// A response body was read, whatever the HTTP status was
    Fetched { status: u16 },

    /// Nothing usable came back
    Failed(FetchError),
}

/// Result of fetching one origin's homepage
#[derive(Debug)]
pub struct FetchResult {
    /// Origin that was fetched
    pub origin: String,

    /// Decoded body text, always empty for failed fetches
    pub body: String,

    /// Whether the fetch produced a body
    pub outcome: FetchOutcome,
}

impl FetchResult {
    /// Create a result for a fetch that returned a body
    pub fn fetched(origin: impl Into<String>, status: u16, body: String) -> Self {
        Self {
            origin: origin.into(),
            body,
            outcome: FetchOutcome::Fetched { status },
        }
    }

    /// Create a result for a fetch that failed
    pub fn failed(origin: impl Into<String>, error: FetchError) -> Self {
        Self {
            origin: origin.into(),
            body: String::new(),
            outcome: FetchOutcome::Failed(error),
        }
    }

    /// True when the fetch produced a body
    pub fn succeeded(&self) -> bool {
        matches!(self.outcome, FetchOutcome::Fetched { .. })
    }

    /// The error, if the fetch failed
    pub fn error(&self) -> Option<&FetchError> {
        match &self.outcome {
            FetchOutcome::Failed(e) => Some(e),
            FetchOutcome::Fetched { .. } => None,
        }
    }
}

/// Fetch results keyed by origin
pub type ResultSet = HashMap<String, FetchResult>;

/// First keyword occurrence found on an origin's homepage
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeywordMatch {
    pub origin: String,
    pub rank: u64,

    /// Zero-based index of the matching line
    pub line_index: usize,

    /// Text surrounding the match
    pub context: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_failed_result_has_empty_body() {
        let result = FetchResult::failed(
            "https://a.example",
            FetchError::Timeout(Duration::from_secs(10)),
        );
        assert!(!result.succeeded());
        assert!(result.body.is_empty());
        assert!(matches!(result.error(), Some(FetchError::Timeout(_))));
    }

    #[test]
    fn test_fetched_result_keeps_status() {
        let result = FetchResult::fetched("https://a.example", 404, "not found".to_string());
        assert!(result.succeeded());
        assert!(result.error().is_none());
        assert!(matches!(result.outcome, FetchOutcome::Fetched { status: 404 }));
    }
}
