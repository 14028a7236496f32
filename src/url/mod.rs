//! URL handling module for Site-Survey
//!
//! This module provides seed validation, canonicalization (the dedup key for
//! the frontier), and the scope filter that keeps a crawl inside the seed's
//! domain and base path.

mod canonical;
mod scope;

// Re-export main functions
pub use canonical::{authority, base_path, canonicalize, canonicalize_str, validate_seed};
pub use scope::{is_pseudo_link, ScopeFilter};
