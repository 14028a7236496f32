use std::collections::{BTreeMap, HashMap};

/// The stored result of one successful fetch
///
/// Records are created once and never mutated; the owning `PageSet` hands
/// out shared references only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRecord {
    url: String,
    status_code: u16,
    body: String,
    size: usize,
    headers: BTreeMap<String, String>,
    is_html: bool,
    depth: u32,
}

impl PageRecord {
    /// Creates a record for a freshly fetched page
    ///
    /// The size is the body length in bytes and `is_html` is derived from
    /// the `content-type` header.
    pub fn new(
        url: impl Into<String>,
        status_code: u16,
        body: String,
        headers: BTreeMap<String, String>,
        depth: u32,
    ) -> Self {
        let size = body.len();
        Self::restore(url, status_code, body, size, headers, depth)
    }

    /// Rebuilds a record from previously persisted fields
    pub fn restore(
        url: impl Into<String>,
        status_code: u16,
        body: String,
        size: usize,
        headers: BTreeMap<String, String>,
        depth: u32,
    ) -> Self {
        let is_html = headers_indicate_html(&headers);
        Self {
            url: url.into(),
            status_code,
            body,
            size,
            headers,
            is_html,
            depth,
        }
    }

    /// Canonical, fragment-free URL of the page
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    /// Raw response body
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Body size in bytes as recorded at fetch time
    pub fn size(&self) -> usize {
        self.size
    }

    /// Response headers keyed by lowercase name
    pub fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }

    pub fn is_html(&self) -> bool {
        self.is_html
    }

    /// Number of link hops from the seed
    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub fn content_type(&self) -> Option<&str> {
        self.headers.get("content-type").map(String::as_str)
    }
}

/// Returns true when the headers declare an HTML body
pub fn headers_indicate_html(headers: &BTreeMap<String, String>) -> bool {
    headers
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case("content-type"))
        .is_some_and(|(_, value)| value.to_ascii_lowercase().contains("text/html"))
}

/// Insertion-ordered page records keyed by URL
///
/// Iteration follows crawl order, which keeps report generation
/// deterministic and lets saved sets reload in the same order.
#[derive(Debug, Clone, Default)]
pub struct PageSet {
    records: Vec<PageRecord>,
    index: HashMap<String, usize>,
}

impl PageSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a record; returns false if a record with the same URL exists
    pub fn insert(&mut self, record: PageRecord) -> bool {
        if self.index.contains_key(record.url()) {
            return false;
        }
        self.index.insert(record.url().to_string(), self.records.len());
        self.records.push(record);
        true
    }

    pub fn get(&self, url: &str) -> Option<&PageRecord> {
        self.index.get(url).map(|&i| &self.records[i])
    }

    pub fn contains(&self, url: &str) -> bool {
        self.index.contains_key(url)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterates records in insertion order
    pub fn iter(&self) -> std::slice::Iter<'_, PageRecord> {
        self.records.iter()
    }

    /// Sum of recorded page sizes
    pub fn total_size(&self) -> u64 {
        self.records.iter().map(|r| r.size() as u64).sum()
    }
}

impl<'a> IntoIterator for &'a PageSet {
    type Item = &'a PageRecord;
    type IntoIter = std::slice::Iter<'a, PageRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

impl FromIterator<PageRecord> for PageSet {
    fn from_iter<I: IntoIterator<Item = PageRecord>>(iter: I) -> Self {
        let mut set = PageSet::new();
        for record in iter {
            set.insert(record);
        }
        set
    }
}
