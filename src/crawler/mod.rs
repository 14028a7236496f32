//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with a fixed timeout and user agent
//! - HTML extraction of links, resources and words
//! - The breadth-first frontier
//! - Progress reporting and overall crawl coordination

mod coordinator;
mod extractor;
mod fetcher;
mod frontier;
mod progress;

pub use coordinator::{run_crawl, CancelHandle, Coordinator, CrawlOutcome, REQUEST_DELAY};
pub use extractor::{
    file_extension, ExtractError, ExtractedItems, Extractor, AUDIO_EXTENSIONS,
    DOCUMENT_EXTENSIONS, VIDEO_EXTENSIONS,
};
pub use fetcher::{build_http_client, fetch_url, FetchError, Fetcher, RawPage, USER_AGENT};
pub use frontier::{Frontier, FrontierEntry, MAX_QUEUED};
pub use progress::{CrawlEvent, ProgressReporter, DEFAULT_PROGRESS_CAPACITY};
