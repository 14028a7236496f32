//! On-disk page-set schema
//!
//! A saved page set is a directory holding:
//! - `page_NNN.html` per page: three comment lines (URL, status, size) then the raw body
//! - `index.txt`: one `filename - url - status - size bytes` line per page
//! - `metadata.json`: the [`SiteMetadata`] document

use crate::state::PageRecord;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

/// Name of the metadata document
pub const METADATA_FILE: &str = "metadata.json";

/// Name of the human-readable index
pub const INDEX_FILE: &str = "index.txt";

/// Number of comment lines preceding the body in a page file
pub const PAGE_HEADER_LINES: usize = 3;

/// Metadata document describing a saved page set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteMetadata {
    pub total_pages: usize,
    pub total_size: u64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<DateTime<Utc>>,

    /// Per-file metadata keyed by page filename
    pub pages: BTreeMap<String, PageMetadata>,
}

/// Metadata of one saved page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageMetadata {
    pub url: String,
    pub status_code: u16,
    pub size: usize,

    #[serde(default)]
    pub headers: BTreeMap<String, String>,

    #[serde(default)]
    pub depth: u32,

    /// Hex SHA-256 of the body
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha256: Option<String>,
}

impl PageMetadata {
    pub fn from_record(record: &PageRecord) -> Self {
        Self {
            url: record.url().to_string(),
            status_code: record.status_code(),
            size: record.size(),
            headers: record.headers().clone(),
            depth: record.depth(),
            sha256: Some(body_digest(record.body())),
        }
    }
}

/// Filename of the page at a 1-based position
pub fn page_filename(position: usize) -> String {
    format!("page_{:03}.html", position)
}

/// Position encoded in a page filename, if it follows the naming scheme
pub fn page_position(filename: &str) -> Option<usize> {
    filename
        .strip_prefix("page_")?
        .strip_suffix(".html")?
        .parse()
        .ok()
}

/// Hex-encoded SHA-256 of a body
pub fn body_digest(body: &str) -> String {
    hex::encode(Sha256::digest(body.as_bytes()))
}

/// Contents of a page file
pub fn render_page_file(record: &PageRecord) -> String {
    format!(
        "<!-- URL: {} -->\n<!-- Status: {} -->\n<!-- Size: {} bytes -->\n{}",
        record.url(),
        record.status_code(),
        record.size(),
        record.body()
    )
}

/// Body of a page file: everything after the three comment lines
pub fn parse_page_body(contents: &str) -> &str {
    contents
        .splitn(PAGE_HEADER_LINES + 1, '\n')
        .nth(PAGE_HEADER_LINES)
        .unwrap_or_default()
}
