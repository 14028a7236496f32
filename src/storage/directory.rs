//! Directory-backed page store
//!
//! Saves a page set as one HTML file per page plus an index and a JSON
//! metadata document, and loads it back in crawl order.

use crate::state::{PageRecord, PageSet};
use crate::storage::schema::{
    body_digest, page_filename, page_position, parse_page_body, render_page_file, PageMetadata,
    SiteMetadata, INDEX_FILE, METADATA_FILE,
};
use crate::storage::traits::{PageStore, StorageError, StorageResult};
use chrono::Utc;
use std::fs;
use std::path::{Path, PathBuf};

/// Width of the rule under the index title
const INDEX_RULE_WIDTH: usize = 60;

/// Page store rooted at a directory
#[derive(Debug, Clone)]
pub struct DirectoryStore {
    root: PathBuf,
}

impl DirectoryStore {
    /// Creates a store for the given directory; nothing is touched until save or load
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn read_metadata(&self) -> StorageResult<SiteMetadata> {
        let path = self.root.join(METADATA_FILE);
        if !path.is_file() {
            return Err(StorageError::MissingMetadata(self.root.clone()));
        }
        let contents = fs::read_to_string(&path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    fn load_page(&self, filename: &str, meta: PageMetadata) -> StorageResult<Option<PageRecord>> {
        check_filename(filename)?;

        let path = self.root.join(filename);
        if !path.is_file() {
            tracing::warn!("Page file {} listed in metadata is missing", path.display());
            return Ok(None);
        }

        let contents = fs::read_to_string(&path)?;
        let body = parse_page_body(&contents);

        if let Some(expected) = &meta.sha256 {
            if *expected != body_digest(body) {
                tracing::warn!(
                    "Body of {} does not match its recorded digest; it was modified after saving",
                    filename
                );
            }
        }

        Ok(Some(PageRecord::restore(
            meta.url,
            meta.status_code,
            body.to_string(),
            meta.size,
            meta.headers,
            meta.depth,
        )))
    }
}

impl PageStore for DirectoryStore {
    fn save(&self, pages: &PageSet) -> StorageResult<()> {
        fs::create_dir_all(&self.root)?;

        let mut metadata = SiteMetadata {
            total_pages: pages.len(),
            total_size: pages.total_size(),
            saved_at: Some(Utc::now()),
            pages: Default::default(),
        };

        let mut index = format!(
            "DOWNLOADED PAGES INDEX\n{}\n\n",
            "=".repeat(INDEX_RULE_WIDTH)
        );

        for (i, page) in pages.iter().enumerate() {
            let filename = page_filename(i + 1);
            fs::write(self.root.join(&filename), render_page_file(page))?;

            index.push_str(&format!(
                "{} - {} - {} - {} bytes\n",
                filename,
                page.url(),
                page.status_code(),
                page.size()
            ));
            metadata
                .pages
                .insert(filename, PageMetadata::from_record(page));
        }

        fs::write(self.root.join(INDEX_FILE), index)?;
        fs::write(
            self.root.join(METADATA_FILE),
            serde_json::to_string_pretty(&metadata)?,
        )?;

        tracing::info!("Saved {} pages to {}", pages.len(), self.root.display());
        Ok(())
    }

    fn load(&self) -> StorageResult<PageSet> {
        let metadata = self.read_metadata()?;

        // Filenames sort lexically in metadata; crawl order is the numeric position
        let mut entries: Vec<(String, PageMetadata)> = metadata.pages.into_iter().collect();
        entries.sort_by(|(a, _), (b, _)| {
            let key = |name: &str| page_position(name).unwrap_or(usize::MAX);
            key(a).cmp(&key(b)).then_with(|| a.cmp(b))
        });

        let mut pages = PageSet::new();
        for (filename, meta) in entries {
            let Some(record) = self.load_page(&filename, meta)? else {
                continue;
            };
            let url = record.url().to_string();
            if !pages.insert(record) {
                tracing::warn!("Skipping {}: {} is already loaded", filename, url);
            }
        }

        if pages.len() != metadata.total_pages {
            tracing::warn!(
                "Metadata lists {} pages but {} were loaded",
                metadata.total_pages,
                pages.len()
            );
        }
        tracing::info!("Loaded {} pages from {}", pages.len(), self.root.display());
        Ok(pages)
    }
}

/// Rejects metadata keys that would resolve outside the store directory
fn check_filename(filename: &str) -> StorageResult<()> {
    let is_plain = !filename.is_empty()
        && !filename.contains(['/', '\\'])
        && filename != "."
        && filename != "..";
    if is_plain {
        Ok(())
    } else {
        Err(StorageError::InvalidEntry {
            name: filename.to_string(),
            reason: "page filenames must not contain path separators".to_string(),
        })
    }
}
