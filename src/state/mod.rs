//! State module for tracking crawl sessions
//!
//! # Components
//!
//! - `CrawlState`: The lifecycle of one crawl session (idle, running, completed, aborted)
//! - `PageRecord`: The stored result of one successful fetch
//! - `PageSet`: The insertion-ordered collection of page records a session owns

mod crawl_state;
mod page;

// Re-export main types
pub use crawl_state::CrawlState;
pub use page::{headers_indicate_html, PageRecord, PageSet};
