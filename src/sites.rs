use crate::results::SiteRecord;
use async_trait::async_trait;
use flate2::read::GzDecoder;
use reqwest::Client;
use std::io::Read;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Chrome UX Report top origins, refreshed monthly
pub const DEFAULT_SITE_LIST_URL: &str =
    "https://raw.githubusercontent.com/zakird/crux-top-lists/main/data/global/current.csv.gz";

/// Where the downloaded list is kept between runs
pub const DEFAULT_CACHE_PATH: &str = "./cache-top-sites.csv.gz";

/// Errors that make the site list unavailable
#[derive(Debug, Error)]
pub enum SiteListError {
    #[error("failed to download the site list: status code {0}")]
    Status(u16),

    #[error("failed to download the site list: {0}")]
    Request(#[from] reqwest::Error),

    #[error("site list cache error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid site list CSV: {0}")]
    Csv(#[from] csv::Error),
}

/// Anything that can produce the ranked list of sites
#[async_trait]
pub trait SiteListSource: Send + Sync {
    /// Load every record, in list order
    async fn load(&self) -> Result<Vec<SiteRecord>, SiteListError>;
}

/// A fixed, in-memory list
#[derive(Debug, Clone, Default)]
pub struct StaticSiteList {
    records: Vec<SiteRecord>,
}

impl StaticSiteList {
    pub fn new(records: Vec<SiteRecord>) -> Self {
        Self { records }
    }
}

#[async_trait]
impl SiteListSource for StaticSiteList {
    async fn load(&self) -> Result<Vec<SiteRecord>, SiteListError> {
        Ok(self.records.clone())
    }
}

/// Gzipped CrUX CSV list, downloaded once and cached on disk
#[derive(Debug, Clone)]
pub struct CruxSiteList {
    url: String,
    cache_path: PathBuf,
    client: Client,
}

impl CruxSiteList {
    /// Create a source that downloads `url` and caches it at `cache_path`
    pub fn new(url: impl Into<String>, cache_path: impl Into<PathBuf>) -> Self {
        Self::with_client(url, cache_path, Client::new())
    }

    /// Same as [`CruxSiteList::new`] but with a caller-provided client
    pub fn with_client(
        url: impl Into<String>,
        cache_path: impl Into<PathBuf>,
        client: Client,
    ) -> Self {
        Self {
            url: url.into(),
            cache_path: cache_path.into(),
            client,
        }
    }

    /// Path of the on-disk cache
    pub fn cache_path(&self) -> &Path {
        &self.cache_path
    }

    /// Returns the gzipped list, from the cache if present
    async fn compressed_bytes(&self) -> Result<Vec<u8>, SiteListError> {
        if tokio::fs::try_exists(&self.cache_path).await? {
            ::log::info!("Loading site list from cache: {}", self.cache_path.display());
            return Ok(tokio::fs::read(&self.cache_path).await?);
        }

        ::log::info!("Downloading site list from {}", self.url);
        let response = self.client.get(&self.url).send().await?;
        if !response.status().is_success() {
            return Err(SiteListError::Status(response.status().as_u16()));
        }
        let bytes = response.bytes().await?;

        if let Some(parent) = self.cache_path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        tokio::fs::write(&self.cache_path, &bytes).await?;
        ::log::debug!(
            "Cached {} bytes at {}",
            bytes.len(),
            self.cache_path.display()
        );

        Ok(bytes.to_vec())
    }
}

impl Default for CruxSiteList {
    fn default() -> Self {
        Self::new(DEFAULT_SITE_LIST_URL, DEFAULT_CACHE_PATH)
    }
}

#[async_trait]
impl SiteListSource for CruxSiteList {
    async fn load(&self) -> Result<Vec<SiteRecord>, SiteListError> {
        let compressed = self.compressed_bytes().await?;
        parse_compressed(&compressed)
    }
}

/// Decompresses and parses a gzipped `origin,rank` CSV
pub fn parse_compressed(bytes: &[u8]) -> Result<Vec<SiteRecord>, SiteListError> {
    parse_csv(GzDecoder::new(bytes))
}

/// Parses an `origin,rank` CSV with a header row
pub fn parse_csv<R: Read>(reader: R) -> Result<Vec<SiteRecord>, SiteListError> {
    let mut rdr = csv::Reader::from_reader(reader);
    let records = rdr
        .deserialize::<SiteRecord>()
        .collect::<Result<Vec<_>, _>>()?;
    Ok(records)
}

/// Keeps sites with `rank <= max_rank`, then the first `max_num_sites` of those
///
/// Truncation applies to the filtered list in its original order, so the
/// result is always a prefix of the rank-filtered list.
pub fn select_sites(
    records: &[SiteRecord],
    max_rank: u64,
    max_num_sites: usize,
) -> Vec<SiteRecord> {
    let filtered: Vec<SiteRecord> = records
        .iter()
        .filter(|r| r.rank <= max_rank)
        .cloned()
        .collect();
    ::log::info!(
        "Filtered to {} sites with rank <= {}.",
        filtered.len(),
        max_rank
    );

    let selected: Vec<SiteRecord> = filtered.into_iter().take(max_num_sites).collect();
    ::log::info!("Limiting to the top {} sites.", selected.len());
    selected
}
