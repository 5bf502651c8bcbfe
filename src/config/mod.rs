//! Configuration module for Church-Harvest
//!
//! This module handles loading, parsing, and validating the optional TOML
//! configuration file. Without a file the defaults are used.
//!
//! # Example
//!
//! ```no_run
//! use church_harvest::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("harvest.toml")).unwrap();
//! println!("Writing output to: {}", config.output.directory.display());
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, HarvestConfig, OutputConfig, DEFAULT_BASE_URL};

// Re-export parser functions
pub use parser::{load_config, load_or_default, parse_config};

// Re-export validation for settings overridden after loading
pub use validation::validate;
