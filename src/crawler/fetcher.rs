//! HTTP-backed browsing resource
//!
//! This module implements the browser traits on top of a plain HTTP client:
//! - One `reqwest::Client` per session, shared by all of its pages
//! - GET navigation with a per-request timeout
//! - A Content-Type check (with body sniffing) before a document is accepted
//! - Selector lookup and link extraction on the fetched HTML
//!
//! Like a real browser, a page that answers 404 or 500 still loads: its
//! status is kept for reporting but does not fail the navigation. Pages are
//! static documents: scripts are not executed, so links added at runtime are
//! not seen.

use crate::crawler::browser::{Browser, ElementHandle, Page, Session, WaitUntil};
use crate::crawler::parser::{extract_links, find_element};
use crate::BrowserError;
use async_trait::async_trait;
use reqwest::Client;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Builds the default user agent string
pub fn default_user_agent() -> String {
    format!("visreg/{}", env!("CARGO_PKG_VERSION"))
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `user_agent` - The user agent header sent with every request
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use visreg::crawler::build_http_client;
///
/// let client = build_http_client("visreg/1.0").unwrap();
/// ```
pub fn build_http_client(user_agent: &str) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent)
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Browser that fetches pages over HTTP
#[derive(Debug, Clone)]
pub struct HttpBrowser {
    user_agent: String,
}

impl HttpBrowser {
    /// Creates a browser sending the given user agent
    pub fn new(user_agent: impl Into<String>) -> Self {
        Self {
            user_agent: user_agent.into(),
        }
    }
}

impl Default for HttpBrowser {
    fn default() -> Self {
        Self::new(default_user_agent())
    }
}

#[async_trait]
impl Browser for HttpBrowser {
    type Session = HttpSession;

    async fn open(&self) -> Result<HttpSession, BrowserError> {
        let client = build_http_client(&self.user_agent)
            .map_err(|e| BrowserError::Launch(e.to_string()))?;

        tracing::debug!("Opened HTTP session ({})", self.user_agent);
        Ok(HttpSession {
            client,
            closed: Arc::new(AtomicBool::new(false)),
        })
    }
}

/// A session sharing one HTTP client between its pages
#[derive(Debug)]
pub struct HttpSession {
    client: Client,
    closed: Arc<AtomicBool>,
}

#[async_trait]
impl Session for HttpSession {
    type Page = HttpPage;

    async fn new_page(&self) -> Result<HttpPage, BrowserError> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(BrowserError::Page("session is closed".to_string()));
        }

        Ok(HttpPage {
            client: self.client.clone(),
            document: None,
        })
    }

    async fn close(&self) -> Result<(), BrowserError> {
        self.closed.store(true, Ordering::SeqCst);
        tracing::debug!("Closed HTTP session");
        Ok(())
    }
}

/// A fetched HTML document
#[derive(Debug)]
struct Document {
    /// URL after redirects, used to resolve relative links
    final_url: Url,
    status: u16,
    body: String,
}

/// A page context holding at most one fetched document
#[derive(Debug)]
pub struct HttpPage {
    client: Client,
    document: Option<Document>,
}

impl HttpPage {
    fn document(&self) -> Result<&Document, BrowserError> {
        self.document
            .as_ref()
            .ok_or_else(|| BrowserError::Page("no document loaded".to_string()))
    }
}

#[async_trait]
impl Page for HttpPage {
    async fn goto(
        &mut self,
        url: &Url,
        wait_until: WaitUntil,
        timeout: Duration,
    ) -> Result<(), BrowserError> {
        // Without script execution every wait condition is met once the body is read
        tracing::trace!("GET {} (wait until {:?})", url, wait_until);

        let fetch = fetch_document(&self.client, url, timeout);
        let document = match tokio::time::timeout(timeout, fetch).await {
            Ok(result) => result?,
            Err(_) => {
                return Err(BrowserError::Timeout {
                    url: url.to_string(),
                    timeout,
                })
            }
        };

        self.document = Some(document);
        Ok(())
    }

    async fn query_selector(&self, selector: &str) -> Result<Option<ElementHandle>, BrowserError> {
        find_element(&self.document()?.body, selector)
    }

    async fn extract_links(&self) -> Result<Vec<String>, BrowserError> {
        let document = self.document()?;
        Ok(extract_links(&document.body, &document.final_url))
    }

    fn status(&self) -> Option<u16> {
        self.document.as_ref().map(|document| document.status)
    }

    async fn close(self) -> Result<(), BrowserError> {
        Ok(())
    }
}

/// Fetches a URL and accepts it if the response is an HTML document
///
/// The HTTP status never fails a fetch. A Content-Type that is present and
/// names a non-document type does; when the header is missing, generic or
/// plain text, the start of the body decides.
///
/// # Error Classification
///
/// | Condition | Error |
/// |-----------|-------|
/// | Request timeout | `Timeout` |
/// | Connection refused, DNS, TLS | `Navigation` |
/// | Body is not an HTML document | `ContentMismatch` |
async fn fetch_document(
    client: &Client,
    url: &Url,
    timeout: Duration,
) -> Result<Document, BrowserError> {
    let response = client
        .get(url.clone())
        .timeout(timeout)
        .send()
        .await
        .map_err(|e| classify_error(e, url, timeout))?;

    let status = response.status();
    let final_url = response.url().clone();

    // Check Content-Type
    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let bytes = response
        .bytes()
        .await
        .map_err(|e| classify_error(e, url, timeout))?;

    if !is_document(content_type.as_deref(), &bytes) {
        return Err(BrowserError::ContentMismatch {
            url: url.to_string(),
            content_type: content_type.unwrap_or_else(|| "no content type".to_string()),
        });
    }

    if !status.is_success() {
        tracing::debug!("{} answered HTTP {}", url, status.as_u16());
    }

    Ok(Document {
        final_url,
        status: status.as_u16(),
        body: String::from_utf8_lossy(&bytes).into_owned(),
    })
}

/// Decides whether a response is an HTML document
fn is_document(content_type: Option<&str>, body: &[u8]) -> bool {
    let mime = content_type
        .and_then(|ct| ct.split(';').next())
        .map(|m| m.trim().to_ascii_lowercase())
        .unwrap_or_default();

    match mime.as_str() {
        "text/html" | "application/xhtml+xml" => true,
        "" | "application/octet-stream" | "text/plain" => looks_like_html(body),
        _ => false,
    }
}

/// Sniffs the first bytes of a body for HTML markup
fn looks_like_html(body: &[u8]) -> bool {
    let head = &body[..body.len().min(1024)];
    let text = String::from_utf8_lossy(head).to_ascii_lowercase();
    let text = text.trim_start_matches('\u{feff}').trim_start();

    text.starts_with("<!doctype html")
        || text.contains("<html")
        || text.contains("<head")
        || text.contains("<body")
}

fn classify_error(error: reqwest::Error, url: &Url, timeout: Duration) -> BrowserError {
    if error.is_timeout() {
        BrowserError::Timeout {
            url: url.to_string(),
            timeout,
        }
    } else if error.is_connect() {
        BrowserError::Navigation {
            url: url.to_string(),
            message: "connection failed".to_string(),
        }
    } else {
        BrowserError::Navigation {
            url: url.to_string(),
            message: error.to_string(),
        }
    }
}
