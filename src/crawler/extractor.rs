//! HTML extractor for links, resources and visible words
//!
//! This module turns a raw HTML body into the items the crawler and the
//! aggregator consume:
//! - Hyperlink targets (raw `href` values, document order)
//! - Images, videos, audio, stylesheets, scripts and downloadable documents
//! - Lowercased word tokens from visible text

use crate::state::PageRecord;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use thiserror::Error;
use url::Url;

/// File extensions treated as video
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "webm", "avi", "mov"];

/// File extensions treated as audio
pub const AUDIO_EXTENSIONS: &[&str] = &["mp3", "wav", "ogg", "m4a"];

/// File extensions that mark a hyperlink as a downloadable document
pub const DOCUMENT_EXTENSIONS: &[&str] = &[
    "pdf", "doc", "docx", "xls", "xlsx", "ppt", "pptx", "zip", "rar",
];

/// Elements whose text content is never visible
const HIDDEN_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

/// A word starts with a letter and continues with letters or combining marks
const WORD_PATTERN: &str = r"\p{L}[\p{L}\p{M}]*";

/// Extraction errors
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Page {url} is not HTML")]
    NotHtml { url: String },

    #[error("Invalid base URL '{url}': {message}")]
    InvalidBaseUrl { url: String, message: String },

    #[error("Invalid selector '{selector}': {message}")]
    Selector { selector: String, message: String },

    #[error("Invalid word pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// Items extracted from one HTML page
///
/// Every list keeps document order and may contain duplicates; values are
/// the raw attribute strings as written in the page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedItems {
    pub links: Vec<String>,
    pub images: Vec<String>,
    pub videos: Vec<String>,
    pub audio: Vec<String>,
    pub stylesheets: Vec<String>,
    pub scripts: Vec<String>,
    pub documents: Vec<String>,
    pub words: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MediaKind {
    Video,
    Audio,
}

#[derive(Debug, Clone)]
struct Selectors {
    anchors: Selector,
    images: Selector,
    media: Selector,
    sources: Selector,
    stylesheets: Selector,
    scripts: Selector,
}

impl Selectors {
    fn compile() -> Result<Self, ExtractError> {
        Ok(Self {
            anchors: parse_selector("a[href]")?,
            images: parse_selector("img[src]")?,
            media: parse_selector("video, audio")?,
            sources: parse_selector("source[src]")?,
            stylesheets: parse_selector("link[rel][href]")?,
            scripts: parse_selector("script[src]")?,
        })
    }
}

fn parse_selector(selector: &str) -> Result<Selector, ExtractError> {
    Selector::parse(selector).map_err(|e| ExtractError::Selector {
        selector: selector.to_string(),
        message: format!("{:?}", e),
    })
}

/// Reusable extractor with precompiled selectors and word pattern
#[derive(Debug, Clone)]
pub struct Extractor {
    selectors: Selectors,
    word_pattern: Regex,
    min_word_length: usize,
}

impl Extractor {
    /// Creates an extractor keeping words of at least `min_word_length` characters
    pub fn new(min_word_length: usize) -> Result<Self, ExtractError> {
        Ok(Self {
            selectors: Selectors::compile()?,
            word_pattern: Regex::new(WORD_PATTERN)?,
            min_word_length,
        })
    }

    /// Minimum word length in characters
    pub fn min_word_length(&self) -> usize {
        self.min_word_length
    }

    /// Extracts every item category from an HTML body
    ///
    /// Malformed markup is tolerated; the parser recovers the same way a
    /// browser does.
    ///
    /// # Arguments
    ///
    /// * `raw_body` - The HTML content
    /// * `base_url` - URL the page was fetched from, used to read resource paths
    ///
    /// # Returns
    ///
    /// * `Ok(ExtractedItems)` - The extracted items
    /// * `Err(ExtractError::InvalidBaseUrl)` - `base_url` is not an absolute URL
    ///
    /// # Example
    ///
    /// ```no_run
    /// use site_survey::crawler::Extractor;
    ///
    /// let extractor = Extractor::new(3).unwrap();
    /// let items = extractor
    ///     .extract(r#"<a href="/a">Cats and dogs</a>"#, "https://example.com/")
    ///     .unwrap();
    /// assert_eq!(items.links, vec!["/a"]);
    /// assert_eq!(items.words, vec!["cats", "and", "dogs"]);
    /// ```
    pub fn extract(&self, raw_body: &str, base_url: &str) -> Result<ExtractedItems, ExtractError> {
        let base = Url::parse(base_url).map_err(|e| ExtractError::InvalidBaseUrl {
            url: base_url.to_string(),
            message: e.to_string(),
        })?;

        let document = Html::parse_document(raw_body);
        if !document.errors.is_empty() {
            tracing::trace!(
                "Recovered from {} markup errors in {}",
                document.errors.len(),
                base
            );
        }

        let mut items = ExtractedItems {
            links: self.anchor_hrefs(&document),
            ..ExtractedItems::default()
        };

        items.documents = items
            .links
            .iter()
            .filter(|href| has_extension(href, &base, DOCUMENT_EXTENSIONS))
            .cloned()
            .collect();

        items.images = attribute_values(&document, &self.selectors.images, "src");

        for element in document.select(&self.selectors.media) {
            let tag = element.value().name();
            for src in self.media_sources(element) {
                match classify_media(&src, &base, tag) {
                    MediaKind::Video => items.videos.push(src),
                    MediaKind::Audio => items.audio.push(src),
                }
            }
        }

        items.stylesheets = document
            .select(&self.selectors.stylesheets)
            .filter(|link| {
                link.value().attr("rel").is_some_and(|rel| {
                    rel.split_whitespace()
                        .any(|token| token.eq_ignore_ascii_case("stylesheet"))
                })
            })
            .filter_map(|link| non_empty_attr(link, "href"))
            .collect();

        items.scripts = attribute_values(&document, &self.selectors.scripts, "src");
        items.words = self.tokenize(&visible_text(&document));

        Ok(items)
    }

    /// Extracts only hyperlink targets, in document order
    pub fn links(&self, raw_body: &str) -> Vec<String> {
        let document = Html::parse_document(raw_body);
        self.anchor_hrefs(&document)
    }

    /// Extracts items from a stored page
    ///
    /// # Returns
    ///
    /// * `Err(ExtractError::NotHtml)` - The page is not HTML
    pub fn extract_page(&self, page: &PageRecord) -> Result<ExtractedItems, ExtractError> {
        if !page.is_html() {
            return Err(ExtractError::NotHtml {
                url: page.url().to_string(),
            });
        }
        self.extract(page.body(), page.url())
    }

    /// Splits text into lowercase words, dropping those shorter than the minimum
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let lowered = text.to_lowercase();
        self.word_pattern
            .find_iter(&lowered)
            .map(|m| m.as_str())
            .filter(|word| word.chars().count() >= self.min_word_length)
            .map(String::from)
            .collect()
    }

    fn anchor_hrefs(&self, document: &Html) -> Vec<String> {
        attribute_values(document, &self.selectors.anchors, "href")
    }

    /// `src` of the media element itself, then of its `<source>` children
    fn media_sources(&self, element: ElementRef<'_>) -> Vec<String> {
        non_empty_attr(element, "src")
            .into_iter()
            .chain(
                element
                    .select(&self.selectors.sources)
                    .filter_map(|source| non_empty_attr(source, "src")),
            )
            .collect()
    }
}

fn non_empty_attr(element: ElementRef<'_>, name: &str) -> Option<String> {
    element
        .value()
        .attr(name)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(String::from)
}

fn attribute_values(document: &Html, selector: &Selector, name: &str) -> Vec<String> {
    document
        .select(selector)
        .filter_map(|element| non_empty_attr(element, name))
        .collect()
}

/// Concatenates all text nodes outside of script, style and similar elements
fn visible_text(document: &Html) -> String {
    let mut text = String::new();
    for node in document.tree.root().descendants() {
        let Some(fragment) = node.value().as_text() else {
            continue;
        };
        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .is_some_and(|element| HIDDEN_ELEMENTS.contains(&element.name()))
        });
        if !hidden {
            text.push_str(fragment);
            text.push(' ');
        }
    }
    text
}

/// Lowercase file extension of a URL or path reference
///
/// Query strings and fragments are ignored. References whose last path
/// segment has no dot yield `None`.
///
/// # Example
///
/// ```no_run
/// use site_survey::crawler::file_extension;
///
/// assert_eq!(file_extension("/img/photo.JPG?w=200"), Some("jpg".to_string()));
/// assert_eq!(file_extension("https://example.com"), None);
/// ```
pub fn file_extension(reference: &str) -> Option<String> {
    let path = match Url::parse(reference) {
        Ok(url) => url.path().to_string(),
        Err(_) => {
            let path = reference.split(['?', '#']).next().unwrap_or_default();
            // Protocol-relative: drop the authority so a bare host has no extension
            match path.strip_prefix("//") {
                Some(rest) => rest.find('/').map_or("", |i| &rest[i..]).to_string(),
                None => path.to_string(),
            }
        }
    };
    let segment = path.rsplit('/').next()?;
    let (_, extension) = segment.rsplit_once('.')?;
    if extension.is_empty() {
        return None;
    }
    Some(extension.to_lowercase())
}

fn has_extension(reference: &str, base: &Url, extensions: &[&str]) -> bool {
    let resolved = base
        .join(reference)
        .map(|url| url.to_string())
        .unwrap_or_else(|_| reference.to_string());
    file_extension(&resolved).is_some_and(|ext| extensions.contains(&ext.as_str()))
}

/// Classifies by extension first, then by the enclosing element
fn classify_media(src: &str, base: &Url, tag: &str) -> MediaKind {
    if has_extension(src, base, VIDEO_EXTENSIONS) {
        MediaKind::Video
    } else if has_extension(src, base, AUDIO_EXTENSIONS) {
        MediaKind::Audio
    } else if tag.eq_ignore_ascii_case("audio") {
        MediaKind::Audio
    } else {
        MediaKind::Video
    }
}
