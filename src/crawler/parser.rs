//! HTML parser for link extraction and selector checks
//!
//! This module handles parsing fetched HTML to:
//! - Extract the links a visitor could follow (from <a> tags)
//! - Look up the first element matching a CSS selector

use crate::crawler::browser::ElementHandle;
use crate::BrowserError;
use scraper::{Html, Selector};
use url::Url;

/// Extracts all followable links from an HTML document
///
/// # Link Extraction Rules
///
/// **Include:**
/// - `<a href="...">` tags anywhere in the document
///
/// **Exclude:**
/// - `<a href="..." download>`
/// - `javascript:`, `mailto:`, `tel:` links
/// - Data URIs
/// - Fragment-only links (same page anchors)
///
/// Relative links are resolved against `base_url`, which should be the
/// document's final URL after redirects.
///
/// # Example
///
/// ```
/// use visreg::crawler::extract_links;
/// use url::Url;
///
/// let html = r#"<html><body><a href="/page">Link</a></body></html>"#;
/// let base_url = Url::parse("https://example.com/").unwrap();
/// assert_eq!(extract_links(html, &base_url), vec!["https://example.com/page"]);
/// ```
pub fn extract_links(html: &str, base_url: &Url) -> Vec<String> {
    let document = Html::parse_document(html);
    let mut links = Vec::new();

    if let Ok(a_selector) = Selector::parse("a[href]") {
        for element in document.select(&a_selector) {
            // Skip if it has the download attribute
            if element.value().attr("download").is_some() {
                continue;
            }

            if let Some(href) = element.value().attr("href") {
                if let Some(absolute_url) = resolve_link(href, base_url) {
                    links.push(absolute_url);
                }
            }
        }
    }

    links
}

/// Finds the first element matching `selector` in an HTML document
///
/// # Returns
///
/// * `Ok(Some(ElementHandle))` - An element matched
/// * `Ok(None)` - Nothing matched
/// * `Err(BrowserError::InvalidSelector)` - The selector is not valid CSS
pub fn find_element(html: &str, selector: &str) -> Result<Option<ElementHandle>, BrowserError> {
    let parsed = Selector::parse(selector).map_err(|e| BrowserError::InvalidSelector {
        selector: selector.to_string(),
        message: format!("{:?}", e),
    })?;

    let document = Html::parse_document(html);
    let handle = document.select(&parsed).next().map(|element| ElementHandle {
        tag: element.value().name().to_string(),
    });

    Ok(handle)
}

/// Resolves a link href to an absolute URL and validates it
///
/// Returns None if the link should be excluded:
/// - javascript:, mailto:, tel: schemes
/// - data: URIs
/// - Invalid URLs
/// - Non-HTTP(S) URLs after resolution
fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() {
        return None;
    }

    if href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("data:")
    {
        return None;
    }

    if href.starts_with('#') {
        return None;
    }

    match base_url.join(href) {
        Ok(absolute_url) => {
            if absolute_url.scheme() == "http" || absolute_url.scheme() == "https" {
                Some(absolute_url.to_string())
            } else {
                None
            }
        }
        Err(_) => None,
    }
}
