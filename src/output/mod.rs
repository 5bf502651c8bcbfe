//! Output module for the per-region CSV files
//!
//! This module handles:
//! - The row shape written for every harvested record
//! - Streaming, row-at-a-time CSV output

mod csv_output;

pub use csv_output::CsvOutput;

use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write output: {0}")]
    Write(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// One harvested record, as written to the region's CSV
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactRow {
    /// Display name of the owning region
    pub region: String,

    /// Record title
    pub title: String,

    /// Detail page the emails were scraped from
    pub url: String,

    /// Distinct emails found on the page, possibly none
    pub emails: Vec<String>,
}

impl ContactRow {
    /// CSV fields: region, title, url, then one column per email
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        [self.region.as_str(), self.title.as_str(), self.url.as_str()]
            .into_iter()
            .chain(self.emails.iter().map(String::as_str))
    }
}

impl From<OutputError> for crate::HarvestError {
    fn from(e: OutputError) -> Self {
        match e {
            OutputError::Csv(e) => Self::Csv(e),
            OutputError::Io(e) => Self::Io(e),
            OutputError::Write(message) => Self::Output(message),
        }
    }
}
