//! Site-Survey: a scoped website crawler and content analyzer
//!
//! This crate crawls a website breadth-first from a seed URL, staying inside
//! the seed's domain and base path, and builds aggregate reports (word
//! frequency, link, image, media, resource and document inventories) over
//! the fetched pages.

pub mod config;
pub mod crawler;
pub mod output;
pub mod state;
pub mod storage;
pub mod url;

use thiserror::Error;

/// Main error type for Site-Survey operations
#[derive(Debug, Error)]
pub enum SurveyError {
    #[error("Invalid seed URL '{url}': {source}")]
    InvalidSeedUrl { url: String, source: UrlError },

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Extractor setup failed: {0}")]
    Extract(#[from] crawler::ExtractError),

    #[error("Invalid state transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: state::CrawlState,
        to: state::CrawlState,
    },
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
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Missing scheme in URL")]
    MissingScheme,

    #[error("Missing domain in URL")]
    MissingDomain,
}

/// Result type alias for Site-Survey operations
pub type Result<T> = std::result::Result<T, SurveyError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{run_crawl, Coordinator, CrawlEvent, ProgressReporter};
pub use output::{summarize, AnalysisReport, ReportSection};
pub use state::{CrawlState, PageRecord, PageSet};
pub use crate::url::{canonicalize, ScopeFilter};
