use crate::config::{ConfigError, ScanConfig};
use crate::fetchers::{self, Fetcher, HttpFetcher, LogObserver, ScanObserver};
use crate::report;
use crate::results::{KeywordMatch, ResultSet, SiteRecord};
use crate::sites::{self, SiteListError, SiteListSource};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Errors that abort a scan
#[derive(Debug, Error)]
pub enum ScanError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    SiteList(#[from] SiteListError),

    #[error("could not build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Everything produced by one run
#[derive(Debug)]
pub struct ScanReport {
    /// Sites that were fetched, in list order
    pub sites: Vec<SiteRecord>,

    /// One fetch result per distinct origin
    pub results: ResultSet,

    /// Sites whose homepage contains the keyword, in list order
    pub matches: Vec<KeywordMatch>,
}

impl ScanReport {
    /// Number of origins whose fetch failed
    pub fn failed_count(&self) -> usize {
        self.results.values().filter(|r| !r.succeeded()).count()
    }
}

/// Builder for configuring and running a keyword scan
pub struct Scan {
    config: ScanConfig,
    fetcher: Option<Arc<dyn Fetcher>>,
    observer: Arc<dyn ScanObserver>,
}

impl Scan {
    /// Create a scan for `keyword` with default settings
    pub fn new(keyword: impl Into<String>) -> Self {
        Self::with_config(ScanConfig {
            keyword: keyword.into(),
            ..ScanConfig::default()
        })
    }

    /// Create a scan from a complete configuration
    pub fn with_config(config: ScanConfig) -> Self {
        Self {
            config,
            fetcher: None,
            observer: Arc::new(LogObserver::default()),
        }
    }

    /// Load configuration from a JSON file
    pub fn with_config_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        Ok(Self::with_config(ScanConfig::from_file(path)?))
    }

    /// Load configuration from a JSON string
    pub fn with_config_str(json: &str) -> Result<Self, ConfigError> {
        Ok(Self::with_config(ScanConfig::from_json(json)?))
    }

    /// Override the number of concurrent fetches
    pub fn with_max_concurrency(mut self, value: usize) -> Self {
        self.config.max_concurrency = value;
        self
    }

    /// Override the per-request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.config.timeout_secs = seconds;
        self
    }

    /// Override the rank cut-off
    pub fn with_max_rank(mut self, value: u64) -> Self {
        self.config.max_rank = value;
        self
    }

    /// Override the number of sites fetched
    pub fn with_max_sites(mut self, value: usize) -> Self {
        self.config.max_num_sites = value;
        self
    }

    /// Use a custom fetcher instead of [`HttpFetcher`]
    pub fn with_fetcher(mut self, fetcher: Arc<dyn Fetcher>) -> Self {
        self.fetcher = Some(fetcher);
        self
    }

    /// Receive progress and failure notifications
    pub fn with_observer(mut self, observer: Arc<dyn ScanObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Current configuration
    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Loads the site list, selects the top sites, then fetches and scans them
    pub async fn run(&self, source: &dyn SiteListSource) -> Result<ScanReport, ScanError> {
        self.config.validate()?;
        ::log::info!("Starting scan for '{}'", self.config.keyword);

        let records = source.load().await?;
        ::log::info!("Loaded {} top sites.", records.len());

        let selected = sites::select_sites(
            &records,
            self.config.max_rank,
            self.config.max_num_sites,
        );

        self.scan_sites(selected).await
    }

    /// Fetches and scans an already selected list of sites
    pub async fn scan_sites(&self, sites: Vec<SiteRecord>) -> Result<ScanReport, ScanError> {
        self.config.validate()?;

        let fetcher: Arc<dyn Fetcher> = match &self.fetcher {
            Some(fetcher) => Arc::clone(fetcher),
            None => Arc::new(HttpFetcher::new()?),
        };

        let results = fetchers::fetch_all(
            fetcher,
            &sites,
            self.config.max_concurrency,
            self.config.timeout(),
            Arc::clone(&self.observer),
        )
        .await;
        ::log::info!("Finished fetching homepages.");

        let matches = report::collect_matches(&sites, &results, &self.config.keyword);

        Ok(ScanReport {
            sites,
            results,
            matches,
        })
    }
}
