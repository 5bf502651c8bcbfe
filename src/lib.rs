//! Church-Harvest: a resumable contact harvester
//!
//! This crate walks the Swedish church directory region by region, scrapes the
//! email addresses from every listed organization's detail page, and writes one
//! CSV file per region. Each region is checkpointed so that an interrupted run
//! can be restarted without redoing finished work.

pub mod config;
pub mod harvest;
pub mod output;
pub mod regions;
pub mod state;
pub mod storage;
pub mod url;

use thiserror::Error;

/// Main error type for Church-Harvest operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("Listing for region {region_id} is malformed: {message}")]
    ListFormat { region_id: u32, message: String },

    #[error("Invalid state transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: state::RegionState,
        to: state::RegionState,
    },

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Output error: {0}")]
    Output(String),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for Church-Harvest operations
pub type Result<T> = std::result::Result<T, HarvestError>;

// Re-export commonly used types
pub use config::Config;
pub use harvest::{harvest, RegionOutcome, RunSummary};
pub use regions::{region_by_id, Region, REGIONS};
pub use state::RegionState;
