//! Storage traits and error types
//!
//! This module defines the trait interface for page-set storage backends
//! and associated error types.

use crate::state::PageSet;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Metadata error: {0}")]
    Metadata(#[from] serde_json::Error),

    #[error("No saved page set found in {}", .0.display())]
    MissingMetadata(PathBuf),

    #[error("Invalid page entry '{name}': {reason}")]
    InvalidEntry { name: String, reason: String },
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for page-set storage backends
///
/// A failed save or load never touches the caller's in-memory page set.
pub trait PageStore {
    /// Persists every page of the set, replacing whatever was stored before
    fn save(&self, pages: &PageSet) -> StorageResult<()>;

    /// Loads a previously saved page set, in its original crawl order
    fn load(&self) -> StorageResult<PageSet>;
}
