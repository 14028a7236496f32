//! Storage module for persisting crawl results
//!
//! This module handles all file operations for the crawler, including:
//! - Saving a page set as a directory of page files, an index and metadata
//! - Loading a saved page set back for re-analysis
//! - Writing rendered reports

mod directory;
mod schema;
mod traits;

pub use directory::DirectoryStore;
pub use schema::{
    body_digest, page_filename, PageMetadata, SiteMetadata, INDEX_FILE, METADATA_FILE,
};
pub use traits::{PageStore, StorageError, StorageResult};

use crate::output::AnalysisReport;
use std::fs;
use std::path::Path;

/// Writes a rendered report document
///
/// # Arguments
///
/// * `report` - The report to render
/// * `path` - Destination file; parent directories are created
///
/// # Returns
///
/// * `Ok(())` - Successfully wrote the report
/// * `Err(StorageError)` - Failed to write the report
pub fn save_report(report: &AnalysisReport, path: &Path) -> StorageResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, report.to_document())?;
    tracing::info!("Report written to {}", path.display());
    Ok(())
}
