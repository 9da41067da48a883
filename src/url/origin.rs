use url::Url;

/// Checks whether two URLs share an origin (scheme, host and port)
///
/// Default ports are taken into account, so `http://example.com/` and
/// `http://example.com:80/` are the same origin.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use visreg::url::same_origin;
///
/// let a = Url::parse("https://example.com/a").unwrap();
/// let b = Url::parse("https://example.com:443/b").unwrap();
/// let c = Url::parse("http://example.com/a").unwrap();
/// assert!(same_origin(&a, &b));
/// assert!(!same_origin(&a, &c));
/// ```
pub fn same_origin(a: &Url, b: &Url) -> bool {
    a.origin() == b.origin()
}

/// Returns the path of a URL plus its query string, if any
///
/// This is the form targets store their `url` in: relative to the site's
/// origin so the capture stage can prefix whichever base URL it runs against.
pub fn relative_path(url: &Url) -> String {
    match url.query() {
        Some(query) => format!("{}?{}", url.path(), query),
        None => url.path().to_string(),
    }
}
