use serde::Deserialize;
use std::time::Duration;

/// Default cap on stored pages per session
pub const DEFAULT_MAX_PAGES: usize = 50;

/// Default number of link hops followed from the seed
pub const DEFAULT_MAX_DEPTH: u32 = 2;

/// Default per-request timeout
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 10;

/// Default minimum token length kept by the word counter
pub const DEFAULT_MIN_WORD_LENGTH: usize = 3;

/// Main configuration structure for Site-Survey
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Maximum number of pages stored in one session
    #[serde(rename = "max-pages", default = "default_max_pages")]
    pub max_pages: usize,

    /// Maximum depth to crawl from the seed URL (the seed is depth 0)
    #[serde(rename = "max-depth", default = "default_max_depth")]
    pub max_depth: u32,

    /// Per-request timeout in seconds
    #[serde(rename = "timeout-seconds", default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl CrawlerConfig {
    /// Returns the request timeout as a Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_pages: DEFAULT_MAX_PAGES,
            max_depth: DEFAULT_MAX_DEPTH,
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
        }
    }
}

/// Report generation configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisConfig {
    /// Shortest token (in characters) counted as a word
    #[serde(rename = "min-word-length", default = "default_min_word_length")]
    pub min_word_length: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            min_word_length: DEFAULT_MIN_WORD_LENGTH,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputConfig {
    /// Directory the crawled page set is saved to
    pub directory: Option<String>,

    /// Path of the rendered report document
    #[serde(rename = "report-path")]
    pub report_path: Option<String>,
}

fn default_max_pages() -> usize {
    DEFAULT_MAX_PAGES
}

fn default_max_depth() -> u32 {
    DEFAULT_MAX_DEPTH
}

fn default_timeout_seconds() -> u64 {
    DEFAULT_TIMEOUT_SECONDS
}

fn default_min_word_length() -> usize {
    DEFAULT_MIN_WORD_LENGTH
}
