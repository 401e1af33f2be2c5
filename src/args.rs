use clap::Parser;
use site_scan::ScanConfig;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "site-scan")]
#[command(about = "Find popular sites whose homepage embeds a keyword")]
#[command(version)]
pub struct Args {
    /// Keyword to search for in each homepage (case-insensitive)
    pub keyword: Option<String>,

    /// JSON configuration file; flags override its values
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Only consider sites ranked at or below this
    #[arg(long)]
    pub max_rank: Option<u64>,

    /// Maximum number of sites to fetch
    #[arg(short = 'n', long)]
    pub max_sites: Option<usize>,

    /// Number of homepages fetched concurrently
    #[arg(short = 'j', long)]
    pub concurrency: Option<usize>,

    /// Per-request timeout in seconds
    #[arg(short, long)]
    pub timeout: Option<u64>,

    /// Directory to write the results CSV to
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Path of the cached site list
    #[arg(long)]
    pub cache: Option<PathBuf>,

    /// Print results without writing a CSV file
    #[arg(long)]
    pub no_write: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Applies command-line overrides on top of `config`
    pub fn apply(&self, mut config: ScanConfig) -> ScanConfig {
        if let Some(keyword) = &self.keyword {
            config.keyword = keyword.clone();
        }
        if let Some(max_rank) = self.max_rank {
            config.max_rank = max_rank;
        }
        if let Some(max_sites) = self.max_sites {
            config.max_num_sites = max_sites;
        }
        if let Some(concurrency) = self.concurrency {
            config.max_concurrency = concurrency;
        }
        if let Some(timeout) = self.timeout {
            config.timeout_secs = timeout;
        }
        if let Some(output_dir) = &self.output_dir {
            config.output_dir = output_dir.clone();
        }
        if let Some(cache) = &self.cache {
            config.cache_path = cache.clone();
        }
        config
    }
}
