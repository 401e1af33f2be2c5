use crate::sites::{DEFAULT_CACHE_PATH, DEFAULT_SITE_LIST_URL};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Errors raised while loading or checking a configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0} must be greater than 0")]
    Zero(&'static str),

    #[error("keyword must not be empty")]
    EmptyKeyword,
}

/// Configuration for a scan run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Text to look for in each homepage
    #[serde(default = "default_keyword")]
    pub keyword: String,

    /// URL of the gzipped `origin,rank` site list
    #[serde(default = "default_site_list_url")]
    pub site_list_url: String,

    /// Where the downloaded site list is cached
    #[serde(default = "default_cache_path")]
    pub cache_path: PathBuf,

    /// Only sites ranked at or below this are considered
    #[serde(default = "default_max_rank")]
    pub max_rank: u64,

    /// Maximum number of sites to fetch after rank filtering
    #[serde(default = "default_max_num_sites")]
    pub max_num_sites: usize,

    /// Number of homepages fetched at once
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Directory the results CSV is written to
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

impl ScanConfig {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        Self::from_json(&contents)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        Ok(config)
    }

    /// Per-request timeout as a `Duration`
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Rejects values that would make a run meaningless
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.keyword.is_empty() {
            return Err(ConfigError::EmptyKeyword);
        }
        if self.max_rank == 0 {
            return Err(ConfigError::Zero("max_rank"));
        }
        if self.max_num_sites == 0 {
            return Err(ConfigError::Zero("max_num_sites"));
        }
        if self.max_concurrency == 0 {
            return Err(ConfigError::Zero("max_concurrency"));
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::Zero("timeout_secs"));
        }
        Ok(())
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            keyword: default_keyword(),
            site_list_url: default_site_list_url(),
            cache_path: default_cache_path(),
            max_rank: default_max_rank(),
            max_num_sites: default_max_num_sites(),
            max_concurrency: default_max_concurrency(),
            timeout_secs: default_timeout_secs(),
            output_dir: default_output_dir(),
        }
    }
}

fn default_keyword() -> String {
    "googletagmanager.com".to_string()
}

fn default_site_list_url() -> String {
    DEFAULT_SITE_LIST_URL.to_string()
}

fn default_cache_path() -> PathBuf {
    PathBuf::from(DEFAULT_CACHE_PATH)
}

fn default_max_rank() -> u64 {
    1000
}

fn default_max_num_sites() -> usize {
    50
}

fn default_max_concurrency() -> usize {
    20
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_json_uses_defaults() {
        let config = ScanConfig::from_json("{}").unwrap();
        assert_eq!(config.keyword, "googletagmanager.com");
        assert_eq!(config.max_rank, 1000);
        assert_eq!(config.max_num_sites, 50);
        assert_eq!(config.max_concurrency, 20);
        assert_eq!(config.timeout(), Duration::from_secs(10));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_overrides() {
        let config =
            ScanConfig::from_json(r#"{"keyword": "polyfill.io", "max_concurrency": 10}"#).unwrap();
        assert_eq!(config.keyword, "polyfill.io");
        assert_eq!(config.max_concurrency, 10);
        assert_eq!(config.max_num_sites, 50);
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"max_rank": 5000, "max_num_sites": 5000}}"#).unwrap();

        let config = ScanConfig::from_file(file.path()).unwrap();
        assert_eq!(config.max_rank, 5000);
        assert_eq!(config.max_num_sites, 5000);
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            ScanConfig::from_json("{not json"),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn test_validate_rejects_zero() {
        let config = ScanConfig {
            max_concurrency: 0,
            ..ScanConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Zero("max_concurrency"))
        ));

        let config = ScanConfig {
            keyword: String::new(),
            ..ScanConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::EmptyKeyword)));
    }
}
