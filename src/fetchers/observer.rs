use crate::fetchers::FetchError;

/// Receives progress and failure notifications from the fetch pool.
///
/// Called from the collecting task as each result arrives, in completion
/// order. Both methods default to doing nothing.
pub trait ScanObserver: Send + Sync {
    /// A result for `origin` was recorded; `completed` of `total` are done
    fn fetch_completed(&self, _origin: &str, _completed: usize, _total: usize) {}

    /// The result recorded for `origin` is a failure
    fn fetch_failed(&self, _origin: &str, _error: &FetchError) {}
}

/// Observer that ignores everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl ScanObserver for NoopObserver {}

/// Reports progress through the `log` facade
#[derive(Debug, Clone, Copy)]
pub struct LogObserver {
    /// Log a progress line every `progress_every` completions
    progress_every: usize,
}

impl LogObserver {
    /// Create an observer that logs progress every `progress_every` results
    pub fn new(progress_every: usize) -> Self {
        Self {
            progress_every: progress_every.max(1),
        }
    }
}

impl Default for LogObserver {
    fn default() -> Self {
        Self::new(10)
    }
}

impl ScanObserver for LogObserver {
    fn fetch_completed(&self, origin: &str, completed: usize, total: usize) {
        ::log::trace!("Recorded result for {}", origin);
        if completed % self.progress_every == 0 || completed == total {
            ::log::info!("Fetching homepages: {}/{}", completed, total);
        }
    }

    fn fetch_failed(&self, origin: &str, error: &FetchError) {
        // The fetcher already logged the error where it happened
        ::log::debug!("Recorded empty result for {} ({})", origin, error);
    }
}
