// Re-export modules
pub mod config;
pub mod fetchers;
pub mod report;
pub mod results;
pub mod scan;
pub mod scanner;
pub mod sites;
pub mod utils;

// Re-export commonly used types for convenience
pub use config::ScanConfig;
pub use fetchers::{FetchError, Fetcher, HttpFetcher, ScanObserver, fetch_all};
pub use results::{FetchOutcome, FetchResult, KeywordMatch, ResultSet, SiteRecord};
pub use scan::{Scan, ScanError, ScanReport};
pub use scanner::{ContextMatch, find_context};
pub use sites::{CruxSiteList, SiteListSource, select_sites};
