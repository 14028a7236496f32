use crate::UrlError;
use url::{ParseError, Url};

/// Validates a seed URL for a crawl session
///
/// The seed must parse as an absolute URL with both a scheme and a host.
///
/// # Examples
///
/// ```
/// use site_survey::url::validate_seed;
///
/// assert!(validate_seed("https://example.com/docs").is_ok());
/// assert!(validate_seed("example.com/docs").is_err());
/// assert!(validate_seed("mailto:someone@example.com").is_err());
/// ```
pub fn validate_seed(seed: &str) -> Result<Url, UrlError> {
    let url = Url::parse(seed.trim()).map_err(|e| match e {
        ParseError::RelativeUrlWithoutBase => UrlError::MissingScheme,
        ParseError::EmptyHost => UrlError::MissingDomain,
        other => UrlError::Parse(other.to_string()),
    })?;

    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlError::MissingDomain);
    }

    Ok(url)
}

/// Returns the network location of a URL: lowercase host plus a non-default port
///
/// Two URLs on the same host but different ports are different domains for
/// scoping purposes.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use site_survey::url::authority;
///
/// let url = Url::parse("http://127.0.0.1:8080/page").unwrap();
/// assert_eq!(authority(&url), Some("127.0.0.1:8080".to_string()));
///
/// let url = Url::parse("https://EXAMPLE.com:443/").unwrap();
/// assert_eq!(authority(&url), Some("example.com".to_string()));
/// ```
pub fn authority(url: &Url) -> Option<String> {
    let host = url.host_str()?.to_lowercase();
    Some(match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host,
    })
}

/// Canonicalizes a URL into its dedup form: `scheme://authority/path[?query]`
///
/// The fragment and any empty query are dropped. Applying this to its own
/// output yields the same string.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use site_survey::url::canonicalize;
///
/// let url = Url::parse("https://Example.com/docs/intro?x=1#setup").unwrap();
/// assert_eq!(canonicalize(&url), "https://example.com/docs/intro?x=1");
/// ```
pub fn canonicalize(url: &Url) -> String {
    let mut canonical = format!(
        "{}://{}{}",
        url.scheme(),
        authority(url).unwrap_or_default(),
        url.path()
    );

    if let Some(query) = url.query().filter(|q| !q.is_empty()) {
        canonical.push('?');
        canonical.push_str(query);
    }

    canonical
}

/// Parses and canonicalizes a URL string
pub fn canonicalize_str(url: &str) -> Result<String, UrlError> {
    let parsed = Url::parse(url).map_err(|e| UrlError::Parse(e.to_string()))?;
    Ok(canonicalize(&parsed))
}

/// Derives the base path restriction from a seed URL
///
/// Trailing slashes are stripped; an empty path or `/` means the crawl is
/// unrestricted and yields an empty string.
pub fn base_path(seed: &Url) -> String {
    seed.path().trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_seed_accepts_http_and_https() {
        assert!(validate_seed("http://example.com").is_ok());
        assert!(validate_seed("https://example.com/docs/").is_ok());
        assert!(validate_seed("  https://example.com  ").is_ok());
    }

    #[test]
    fn test_validate_seed_missing_scheme() {
        let result = validate_seed("example.com/page");
        assert!(matches!(result, Err(UrlError::MissingScheme)));
    }

    #[test]
    fn test_validate_seed_missing_domain() {
        assert!(matches!(
            validate_seed("mailto:a@b.com"),
            Err(UrlError::MissingDomain)
        ));
        assert!(matches!(
            validate_seed("file:///etc/hosts"),
            Err(UrlError::MissingDomain)
        ));
    }

    #[test]
    fn test_validate_seed_garbage() {
        assert!(validate_seed("").is_err());
        assert!(validate_seed("not a url").is_err());
    }

    #[test]
    fn test_authority_keeps_explicit_port() {
        let url = Url::parse("http://localhost:3000/").unwrap();
        assert_eq!(authority(&url).as_deref(), Some("localhost:3000"));
    }

    #[test]
    fn test_authority_drops_default_port() {
        let url = Url::parse("http://example.com:80/").unwrap();
        assert_eq!(authority(&url).as_deref(), Some("example.com"));
    }

    #[test]
    fn test_canonicalize_strips_fragment() {
        let url = Url::parse("https://example.com/page#section").unwrap();
        assert_eq!(canonicalize(&url), "https://example.com/page");
    }

    #[test]
    fn test_canonicalize_keeps_query() {
        let url = Url::parse("https://example.com/search?q=rust&page=2#top").unwrap();
        assert_eq!(canonicalize(&url), "https://example.com/search?q=rust&page=2");
    }

    #[test]
    fn test_canonicalize_drops_empty_query() {
        let url = Url::parse("https://example.com/page?").unwrap();
        assert_eq!(canonicalize(&url), "https://example.com/page");
    }

    #[test]
    fn test_canonicalize_root() {
        let url = Url::parse("https://example.com").unwrap();
        assert_eq!(canonicalize(&url), "https://example.com/");
    }

    #[test]
    fn test_canonicalize_is_idempotent() {
        for raw in [
            "https://Example.COM/a/../b/./c?x=1#frag",
            "http://127.0.0.1:8080/docs/",
            "https://example.com/caf%C3%A9?q=a%20b",
            "https://example.com",
        ] {
            let once = canonicalize_str(raw).unwrap();
            let twice = canonicalize_str(&once).unwrap();
            assert_eq!(once, twice, "not idempotent for {}", raw);
        }
    }

    #[test]
    fn test_base_path() {
        let cases = [
            ("https://example.com", ""),
            ("https://example.com/", ""),
            ("https://example.com/docs", "/docs"),
            ("https://example.com/docs/", "/docs"),
            ("https://example.com/docs/guide//", "/docs/guide"),
        ];
        for (seed, expected) in cases {
            let url = Url::parse(seed).unwrap();
            assert_eq!(base_path(&url), expected, "seed {}", seed);
        }
    }
}
