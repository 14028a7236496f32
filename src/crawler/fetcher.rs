//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler:
//! - Building one pooled HTTP client per crawl session
//! - GET requests with a fixed timeout and user agent
//! - Error classification (timeout, connection, status, body)
//!
//! There are no retries: a failed page is reported and skipped.

use reqwest::header::HeaderMap;
use reqwest::Client;
use std::collections::BTreeMap;
use std::time::Duration;
use thiserror::Error;

/// User agent sent with every request
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Upper bound on the connect phase, independent of the overall timeout
const MAX_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// A successfully fetched response
#[derive(Debug, Clone)]
pub struct RawPage {
    /// Final URL after redirects
    pub final_url: String,

    /// HTTP status code (always 2xx)
    pub status_code: u16,

    /// Decoded response body
    pub body: String,

    /// Response headers keyed by lowercase name; repeated headers are joined with ", "
    pub headers: BTreeMap<String, String>,
}

/// Failure to fetch one URL
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Connection failed for {url}: {message}")]
    Connect { url: String, message: String },

    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Failed to read body of {url}: {source}")]
    Body {
        url: String,
        source: reqwest::Error,
    },

    #[error("Request failed for {url}: {source}")]
    Request {
        url: String,
        source: reqwest::Error,
    },
}

impl FetchError {
    /// The URL whose fetch failed
    pub fn url(&self) -> &str {
        match self {
            Self::Timeout { url }
            | Self::Connect { url, .. }
            | Self::Status { url, .. }
            | Self::Body { url, .. }
            | Self::Request { url, .. } => url,
        }
    }
}

/// Builds an HTTP client with the crawler's user agent and timeout
///
/// # Example
///
/// ```no_run
/// use site_survey::crawler::build_http_client;
/// use std::time::Duration;
///
/// let client = build_http_client(Duration::from_secs(10)).unwrap();
/// ```
pub fn build_http_client(timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .connect_timeout(timeout.min(MAX_CONNECT_TIMEOUT))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Session-owned fetcher wrapping one connection-pooling client
///
/// Each crawl session builds its own fetcher; sessions never share one.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    /// Creates a fetcher with a fresh client
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(timeout)?,
        })
    }

    /// Issues one GET for the URL
    pub async fn fetch(&self, url: &str) -> Result<RawPage, FetchError> {
        fetch_url(&self.client, url).await
    }
}

/// Fetches a URL and classifies any failure
///
/// # Returns
///
/// * `Ok(RawPage)` - 2xx response with its decoded body
/// * `Err(FetchError)` - Transport failure or non-2xx status
pub async fn fetch_url(client: &Client, url: &str) -> Result<RawPage, FetchError> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| classify_error(url, e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let final_url = response.url().to_string();
    let headers = collect_headers(response.headers());

    let body = response.text().await.map_err(|e| {
        if e.is_timeout() {
            FetchError::Timeout {
                url: url.to_string(),
            }
        } else {
            FetchError::Body {
                url: url.to_string(),
                source: e,
            }
        }
    })?;

    Ok(RawPage {
        final_url,
        status_code: status.as_u16(),
        body,
        headers,
    })
}

/// Maps a transport error onto the fetch error taxonomy
fn classify_error(url: &str, error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else if error.is_connect() {
        FetchError::Connect {
            url: url.to_string(),
            message: error.to_string(),
        }
    } else {
        FetchError::Request {
            url: url.to_string(),
            source: error,
        }
    }
}

/// Flattens a header map; values that are not valid UTF-8 are skipped
fn collect_headers(headers: &HeaderMap) -> BTreeMap<String, String> {
    let mut collected: BTreeMap<String, String> = BTreeMap::new();
    for (name, value) in headers {
        let Ok(value) = value.to_str() else {
            continue;
        };
        collected
            .entry(name.as_str().to_string())
            .and_modify(|existing| {
                existing.push_str(", ");
                existing.push_str(value);
            })
            .or_insert_with(|| value.to_string());
    }
    collected
}
