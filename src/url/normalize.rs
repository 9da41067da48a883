use crate::UrlError;
use url::Url;

/// Normalizes a URL into the crawl's deduplication key
///
/// # Normalization Steps
///
/// 1. Parse the URL; reject if malformed or relative
/// 2. Reject anything that is not HTTP(S) or has no host
/// 3. Remove fragment (everything after #)
/// 4. Remove exactly one trailing slash, unless the path is the root `/`
///
/// Query strings are kept as-is: `/a?x=1` and `/a?x=2` are distinct pages.
///
/// Only one slash is ever stripped, so a path ending in `//` keeps one and
/// normalizing the result again strips that one too. The function is not
/// idempotent for such paths; links are always normalized from their raw form.
///
/// # Arguments
///
/// * `url_str` - The URL string to normalize
///
/// # Returns
///
/// * `Ok(Url)` - Normalized URL
/// * `Err(UrlError)` - Failed to parse the URL
///
/// # Examples
///
/// ```
/// use visreg::url::normalize_url;
///
/// let url = normalize_url("http://example.com/page/#top").unwrap();
/// assert_eq!(url.as_str(), "http://example.com/page");
/// ```
pub fn normalize_url(url_str: &str) -> Result<Url, UrlError> {
    // Step 1: Parse the URL
    let mut url = Url::parse(url_str).map_err(|e| UrlError::Parse(e.to_string()))?;

    // Step 2: Validate scheme and host
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    if url.host_str().is_none() {
        return Err(UrlError::MissingHost);
    }

    // Step 3: Remove fragment
    url.set_fragment(None);

    // Step 4: Strip a single trailing slash
    let path = url.path();
    if path != "/" && path.ends_with('/') {
        let trimmed = path[..path.len() - 1].to_string();
        url.set_path(&trimmed);
    }

    Ok(url)
}
