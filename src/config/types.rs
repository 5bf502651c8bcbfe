use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Default directory site
pub const DEFAULT_BASE_URL: &str = "https://www.kyrktorget.se";

/// Main configuration structure for Church-Harvest
///
/// Every key is optional; a missing file or section falls back to the
/// defaults, which reproduce a plain run against the public directory.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub harvest: HarvestConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Harvest behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HarvestConfig {
    /// Root of the directory site; listing and detail URLs are built from it
    #[serde(rename = "base-url", default = "default_base_url")]
    pub base_url: String,

    /// Number of record chunks processed concurrently within one region
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Timeout for a single detail page request (milliseconds)
    #[serde(rename = "request-timeout-ms", default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,

    /// Timeout for the single listing request (milliseconds)
    ///
    /// Listings of large regions are slow and never retried, so this is kept
    /// well above the detail page timeout.
    #[serde(rename = "listing-timeout-ms", default = "default_listing_timeout_ms")]
    pub listing_timeout_ms: u64,

    /// Total attempts per detail page, first try included
    #[serde(rename = "max-attempts", default = "default_max_attempts")]
    pub max_attempts: u32,

    /// User agent header; reqwest's default is used when absent
    #[serde(rename = "user-agent", default)]
    pub user_agent: Option<String>,

    /// Restrict the run to these region ids; all regions when absent
    #[serde(default)]
    pub regions: Option<Vec<u32>>,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Directory holding the CSV files, list caches and checkpoints
    #[serde(default = "default_directory")]
    pub directory: PathBuf,
}

impl HarvestConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn listing_timeout(&self) -> Duration {
        Duration::from_millis(self.listing_timeout_ms)
    }
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            concurrency: default_concurrency(),
            request_timeout_ms: default_request_timeout_ms(),
            listing_timeout_ms: default_listing_timeout_ms(),
            max_attempts: default_max_attempts(),
            user_agent: None,
            regions: None,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_directory(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_concurrency() -> usize {
    1
}

fn default_request_timeout_ms() -> u64 {
    3000
}

fn default_listing_timeout_ms() -> u64 {
    120_000
}

fn default_max_attempts() -> u32 {
    3
}

fn default_directory() -> PathBuf {
    PathBuf::from(".")
}
