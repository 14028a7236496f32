//! Output module for generating analysis reports
//!
//! This module handles:
//! - Aggregating a page set into statistics and inventories
//! - The sectioned report document
//! - Plain-text formatting shared by the sections

mod aggregate;
mod format;
mod report;

pub use aggregate::{
    classify_link, summarize, word_frequencies, Analyzer, LinkKind, EMPTY_PLACEHOLDER,
    MAX_IMAGES_PER_TYPE, MAX_ITEMS_PER_TYPE, MAX_LINKS_DISPLAY, TOP_WORDS,
};
pub use format::{format_megabytes, format_thousands, group_by_extension, UNKNOWN_EXTENSION};
pub use report::{AnalysisReport, ReportSection, REPORT_TITLE};
