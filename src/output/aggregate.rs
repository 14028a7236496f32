//! Aggregation of a page set into an analysis report
//!
//! This module handles:
//! - Running the extractor over every HTML page
//! - Word frequencies, link partitioning and per-extension inventories
//! - Building the report sections
//!
//! Aggregation is pure: the same page set always yields the same report.

use crate::config::AnalysisConfig;
use crate::crawler::{ExtractError, ExtractedItems, Extractor};
use crate::output::format::{
    capped_list, format_megabytes, format_thousands, group_by_extension, grouped_list, heading,
};
use crate::output::report::{AnalysisReport, ReportSection};
use crate::state::PageSet;
use crate::url::{authority, is_pseudo_link};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use url::Url;

/// Display cap per link category
pub const MAX_LINKS_DISPLAY: usize = 50;

/// Display cap per image extension group
pub const MAX_IMAGES_PER_TYPE: usize = 20;

/// Display cap per extension group for media, resources and documents
pub const MAX_ITEMS_PER_TYPE: usize = 15;

/// Number of words listed in the statistics section
pub const TOP_WORDS: usize = 20;

/// Statistics text for an empty page set
pub const EMPTY_PLACEHOLDER: &str = "No data to analyze.";

/// Link category in the links section
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    Internal,
    External,
    Email,
}

/// Classifies a raw href found on `page_url`
///
/// # Returns
///
/// * `Some(LinkKind::Email)` - `mailto:` links
/// * `Some(LinkKind::Internal)` - Relative references and http(s) URLs on the page's own authority
/// * `Some(LinkKind::External)` - http(s) URLs on another authority
/// * `None` - Fragments, `javascript:`, `tel:` and other schemes
pub fn classify_link(href: &str, page_url: &Url) -> Option<LinkKind> {
    let href = href.trim();
    if href
        .get(..7)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("mailto:"))
    {
        return Some(LinkKind::Email);
    }
    if is_pseudo_link(href) {
        return None;
    }

    let resolved = page_url.join(href).ok()?;
    if resolved.scheme() != "http" && resolved.scheme() != "https" {
        return None;
    }

    // Relative references always resolve onto the page's own authority
    if authority(&resolved) == authority(page_url) {
        Some(LinkKind::Internal)
    } else {
        Some(LinkKind::External)
    }
}

/// Counts tokens, most frequent first; ties keep first-occurrence order
///
/// # Example
///
/// ```no_run
/// use site_survey::output::word_frequencies;
///
/// let counts = word_frequencies(["cat", "cat", "dog"]);
/// assert_eq!(counts, vec![("cat".to_string(), 2), ("dog".to_string(), 1)]);
/// ```
pub fn word_frequencies<'a, I>(tokens: I) -> Vec<(String, usize)>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut positions: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<(&str, usize)> = Vec::new();

    for token in tokens {
        match positions.get(token) {
            Some(&i) => counts[i].1 += 1,
            None => {
                positions.insert(token, counts.len());
                counts.push((token, 1));
            }
        }
    }

    // Stable sort keeps first-occurrence order among equal counts
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
        .into_iter()
        .map(|(word, count)| (word.to_string(), count))
        .collect()
}

/// Everything collected from one pass over the page set
#[derive(Debug, Default)]
struct Inventory {
    status_codes: BTreeMap<u16, usize>,
    html_pages: usize,
    links: Vec<String>,
    internal: BTreeSet<String>,
    external: BTreeSet<String>,
    email: BTreeSet<String>,
    images: Vec<String>,
    videos: Vec<String>,
    audio: Vec<String>,
    stylesheets: Vec<String>,
    scripts: Vec<String>,
    documents: Vec<String>,
    words: Vec<String>,
}

impl Inventory {
    fn absorb(&mut self, items: ExtractedItems, page_url: &Url) {
        for href in &items.links {
            let bucket = match classify_link(href, page_url) {
                Some(LinkKind::Internal) => &mut self.internal,
                Some(LinkKind::External) => &mut self.external,
                Some(LinkKind::Email) => &mut self.email,
                None => continue,
            };
            bucket.insert(href.trim().to_string());
        }

        self.links.extend(items.links);
        self.images.extend(items.images);
        self.videos.extend(items.videos);
        self.audio.extend(items.audio);
        self.stylesheets.extend(items.stylesheets);
        self.scripts.extend(items.scripts);
        self.documents.extend(items.documents);
        self.words.extend(items.words);
    }
}

fn unique_count(items: &[String]) -> usize {
    items.iter().collect::<HashSet<_>>().len()
}

/// Builds analysis reports from page sets
#[derive(Debug, Clone)]
pub struct Analyzer {
    extractor: Extractor,
}

impl Analyzer {
    /// Creates an analyzer using the configured minimum word length
    pub fn new(config: &AnalysisConfig) -> Result<Self, ExtractError> {
        Ok(Self {
            extractor: Extractor::new(config.min_word_length)?,
        })
    }

    /// Builds the full report for a page set
    ///
    /// An empty page set yields a report holding only a placeholder
    /// statistics section.
    pub fn summarize(&self, pages: &PageSet) -> AnalysisReport {
        let mut report = AnalysisReport::new();

        if pages.is_empty() {
            let mut text = heading(ReportSection::Statistics.title());
            text.push_str(EMPTY_PLACEHOLDER);
            text.push('\n');
            report.insert(ReportSection::Statistics, text);
            return report;
        }

        let inventory = self.collect(pages);

        report.insert(
            ReportSection::Statistics,
            statistics_section(pages, &inventory),
        );
        report.insert(ReportSection::Links, links_section(&inventory));
        report.insert(ReportSection::Images, images_section(&inventory));

        if !inventory.videos.is_empty() || !inventory.audio.is_empty() {
            report.insert(ReportSection::Media, media_section(&inventory));
        }
        if !inventory.stylesheets.is_empty() || !inventory.scripts.is_empty() {
            report.insert(ReportSection::Resources, resources_section(&inventory));
        }
        if !inventory.documents.is_empty() {
            report.insert(ReportSection::Documents, documents_section(&inventory));
        }

        tracing::debug!(
            "Summarized {} pages into {} report sections",
            pages.len(),
            report.len()
        );
        report
    }

    fn collect(&self, pages: &PageSet) -> Inventory {
        let mut inventory = Inventory::default();

        for page in pages {
            *inventory.status_codes.entry(page.status_code()).or_default() += 1;

            let items = match self.extractor.extract_page(page) {
                Ok(items) => items,
                Err(ExtractError::NotHtml { .. }) => continue,
                Err(e) => {
                    tracing::warn!("Skipping extraction for {}: {}", page.url(), e);
                    continue;
                }
            };

            // extract_page already rejected unparseable page URLs
            let Ok(page_url) = Url::parse(page.url()) else {
                continue;
            };
            inventory.html_pages += 1;
            inventory.absorb(items, &page_url);
        }

        inventory
    }
}

/// Builds a report with the default analysis settings
pub fn summarize(pages: &PageSet) -> Result<AnalysisReport, ExtractError> {
    let analyzer = Analyzer::new(&AnalysisConfig::default())?;
    Ok(analyzer.summarize(pages))
}

fn statistics_section(pages: &PageSet, inventory: &Inventory) -> String {
    let mut text = heading(ReportSection::Statistics.title());

    let total_size = pages.total_size();
    let average = (total_size as f64 / pages.len() as f64).round() as u64;

    text.push_str("Overview:\n");
    text.push_str(&format!("- Pages downloaded: {}\n", pages.len()));
    text.push_str(&format!("- HTML pages analyzed: {}\n", inventory.html_pages));
    text.push_str(&format!(
        "- Total size: {} bytes ({} MB)\n",
        format_thousands(total_size),
        format_megabytes(total_size)
    ));
    text.push_str(&format!(
        "- Average page size: {} bytes\n\n",
        format_thousands(average)
    ));

    text.push_str("HTTP status codes:\n");
    for (code, count) in &inventory.status_codes {
        text.push_str(&format!("- {}: {}\n", code, count));
    }
    text.push('\n');

    text.push_str("Content:\n");
    let categories = [
        ("Links", &inventory.links),
        ("Images", &inventory.images),
        ("Videos", &inventory.videos),
        ("Audio", &inventory.audio),
        ("Stylesheets", &inventory.stylesheets),
        ("Scripts", &inventory.scripts),
        ("Documents", &inventory.documents),
    ];
    for (label, items) in categories {
        text.push_str(&format!(
            "- {}: {} total, {} unique\n",
            label,
            items.len(),
            unique_count(items)
        ));
    }
    text.push('\n');

    text.push_str(&format!("Top {} words:\n", TOP_WORDS));
    let frequencies = word_frequencies(inventory.words.iter().map(String::as_str));
    if frequencies.is_empty() {
        text.push_str("No words to analyze.\n");
    } else {
        for (rank, (word, count)) in frequencies.iter().take(TOP_WORDS).enumerate() {
            text.push_str(&format!("{:>2}. {}: {}\n", rank + 1, word, count));
        }
    }

    text
}

fn links_section(inventory: &Inventory) -> String {
    let mut text = heading(ReportSection::Links.title());

    let categories = [
        ("Internal links", &inventory.internal),
        ("External links", &inventory.external),
        ("Email links", &inventory.email),
    ];
    for (label, links) in categories {
        text.push_str(&format!("{} ({}):\n", label, links.len()));
        if links.is_empty() {
            text.push_str("  (none)\n");
        } else {
            text.push_str(&capped_list(links, links.len(), MAX_LINKS_DISPLAY));
        }
        text.push('\n');
    }

    text
}

fn images_section(inventory: &Inventory) -> String {
    let mut text = heading(ReportSection::Images.title());
    let groups = group_by_extension(&inventory.images);
    let unique: usize = groups.values().map(Vec::len).sum();

    text.push_str(&format!("Unique images: {}\n\n", unique));
    if groups.is_empty() {
        text.push_str("No images found.\n");
    } else {
        text.push_str(&grouped_list(&groups, MAX_IMAGES_PER_TYPE));
    }
    text
}

/// Appends a labelled, extension-grouped block when `items` is non-empty
fn push_grouped_block(text: &mut String, label: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    let groups = group_by_extension(items);
    let unique: usize = groups.values().map(Vec::len).sum();
    text.push_str(&format!("{} ({}):\n\n", label, unique));
    text.push_str(&grouped_list(&groups, MAX_ITEMS_PER_TYPE));
}

fn media_section(inventory: &Inventory) -> String {
    let mut text = heading(ReportSection::Media.title());
    push_grouped_block(&mut text, "Videos", &inventory.videos);
    push_grouped_block(&mut text, "Audio", &inventory.audio);
    text
}

fn resources_section(inventory: &Inventory) -> String {
    let mut text = heading(ReportSection::Resources.title());
    push_grouped_block(&mut text, "Stylesheets", &inventory.stylesheets);
    push_grouped_block(&mut text, "Scripts", &inventory.scripts);
    text
}

fn documents_section(inventory: &Inventory) -> String {
    let mut text = heading(ReportSection::Documents.title());
    push_grouped_block(&mut text, "Documents", &inventory.documents);
    text
}
