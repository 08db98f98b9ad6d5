//! Configuration module for Uni-Dossier
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use uni_dossier::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("dossier.toml")).unwrap();
//! println!("{} target universities", config.university_count());
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    BrowserConfig, CacheConfig, Config, CountryEntry, CrawlerConfig, OutputConfig, SourcesConfig,
    UniversityEntry,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
