use crate::url::canonical::{authority, base_path, canonicalize};
use crate::UrlError;
use url::Url;

/// Href prefixes that never name a crawlable page
const PSEUDO_LINK_PREFIXES: &[&str] = &["#", "javascript:", "mailto:", "tel:"];

/// Decides which discovered links a crawl session may enqueue
///
/// A link is in scope when it resolves to an `http(s)` URL on exactly the
/// seed's domain (no subdomain wildcarding) and, when the seed had a
/// non-root path, its path equals that base path or lies beneath it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeFilter {
    base_domain: String,
    base_path: String,
}

impl ScopeFilter {
    /// Creates a scope filter from explicit domain and base path values
    pub fn new(base_domain: impl Into<String>, base_path: impl Into<String>) -> Self {
        Self {
            base_domain: base_domain.into().to_lowercase(),
            base_path: base_path.into(),
        }
    }

    /// Derives the session scope from a validated seed URL
    pub fn from_seed(seed: &Url) -> Result<Self, UrlError> {
        let base_domain = authority(seed).ok_or(UrlError::MissingDomain)?;
        Ok(Self {
            base_domain,
            base_path: base_path(seed),
        })
    }

    /// The domain (host plus non-default port) every crawled URL must share
    pub fn base_domain(&self) -> &str {
        &self.base_domain
    }

    /// The path prefix restriction; empty means unrestricted
    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    /// Screens one href found on `page_url`
    ///
    /// # Steps
    ///
    /// 1. Resolve the href against the page URL
    /// 2. Reject empty, `#`, `javascript:`, `mailto:` and `tel:` hrefs
    /// 3. Reject a different domain
    /// 4. Reject a path outside the base path
    /// 5. Strip the fragment and return the canonical form
    ///
    /// # Returns
    ///
    /// * `Some(String)` - The canonical URL to enqueue
    /// * `None` - The link is out of scope
    ///
    /// # Examples
    ///
    /// ```
    /// use url::Url;
    /// use site_survey::url::ScopeFilter;
    ///
    /// let page = Url::parse("https://example.com/docs/intro").unwrap();
    /// let scope = ScopeFilter::new("example.com", "/docs");
    ///
    /// assert_eq!(
    ///     scope.admit("setup#install", &page),
    ///     Some("https://example.com/docs/setup".to_string())
    /// );
    /// assert_eq!(scope.admit("/blog", &page), None);
    /// ```
    pub fn admit(&self, href: &str, page_url: &Url) -> Option<String> {
        let href = href.trim();
        let resolved = page_url.join(href).ok()?;

        if is_pseudo_link(href) {
            tracing::trace!("Rejecting pseudo link {:?}", href);
            return None;
        }

        if resolved.scheme() != "http" && resolved.scheme() != "https" {
            tracing::trace!("Rejecting non-HTTP link {}", resolved);
            return None;
        }

        if authority(&resolved).as_deref() != Some(self.base_domain.as_str()) {
            tracing::trace!("Rejecting off-domain link {}", resolved);
            return None;
        }

        if !self.contains_path(resolved.path()) {
            tracing::trace!("Rejecting link outside {}: {}", self.base_path, resolved);
            return None;
        }

        Some(canonicalize(&resolved))
    }

    /// Returns true when the href would be admitted
    pub fn in_scope(&self, href: &str, page_url: &Url) -> bool {
        self.admit(href, page_url).is_some()
    }

    /// Checks a path against the base path restriction
    pub fn contains_path(&self, path: &str) -> bool {
        if self.base_path.is_empty() {
            return true;
        }

        path == self.base_path
            || path
                .strip_prefix(self.base_path.as_str())
                .is_some_and(|rest| rest.starts_with('/'))
    }
}

/// Returns true for hrefs that are not links to another page
pub fn is_pseudo_link(href: &str) -> bool {
    let href = href.trim();
    if href.is_empty() {
        return true;
    }

    let lowered = href.to_ascii_lowercase();
    PSEUDO_LINK_PREFIXES
        .iter()
        .any(|prefix| lowered.starts_with(prefix))
}
