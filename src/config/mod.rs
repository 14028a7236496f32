//! Configuration module for Site-Survey
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every key has a default, so a missing file section behaves like the
//! built-in settings.
//!
//! # Example
//!
//! ```no_run
//! use site_survey::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("survey.toml")).unwrap();
//! println!("Crawler will fetch at most {} pages", config.crawler.max_pages);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    AnalysisConfig, Config, CrawlerConfig, OutputConfig, DEFAULT_MAX_DEPTH, DEFAULT_MAX_PAGES,
    DEFAULT_MIN_WORD_LENGTH, DEFAULT_TIMEOUT_SECONDS,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
pub use validation::validate;
