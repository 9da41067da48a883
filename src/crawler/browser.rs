//! Browsing resource abstraction
//!
//! The crawler never talks to a concrete browser. It opens one [`Session`]
//! per crawl through a [`Browser`], asks the session for one [`Page`] per
//! visit and closes everything it opened. [`HttpBrowser`](super::HttpBrowser)
//! is the bundled implementation.

use crate::BrowserError;
use async_trait::async_trait;
use std::time::Duration;
use url::Url;

/// When a navigation counts as finished
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WaitUntil {
    /// The document has been received and parsed
    #[default]
    DomContentLoaded,

    /// The document and its subresources have loaded
    Load,

    /// No network activity for a short while
    NetworkIdle,
}

/// A matched element on a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementHandle {
    /// Lowercase tag name of the element
    pub tag: String,
}

/// Launches browsing sessions
#[async_trait]
pub trait Browser: Send + Sync {
    type Session: Session;

    /// Starts a session; failing here aborts the crawl
    async fn open(&self) -> Result<Self::Session, BrowserError>;
}

/// One running browser instance shared by every visit of a crawl
#[async_trait]
pub trait Session: Send + Sync + 'static {
    type Page: Page;

    /// Creates an independent page context; may be called concurrently
    async fn new_page(&self) -> Result<Self::Page, BrowserError>;

    /// Shuts the session down
    async fn close(&self) -> Result<(), BrowserError>;
}

/// A single page context
#[async_trait]
pub trait Page: Send + Sync + 'static {
    /// Navigates to `url`, failing if it does not finish within `timeout`
    async fn goto(
        &mut self,
        url: &Url,
        wait_until: WaitUntil,
        timeout: Duration,
    ) -> Result<(), BrowserError>;

    /// Returns the first element matching a CSS selector
    async fn query_selector(&self, selector: &str) -> Result<Option<ElementHandle>, BrowserError>;

    /// Returns the absolute targets of every link on the current document
    async fn extract_links(&self) -> Result<Vec<String>, BrowserError>;

    /// HTTP status of the current document, when the page knows it
    fn status(&self) -> Option<u16> {
        None
    }

    /// Releases the page context
    async fn close(self) -> Result<(), BrowserError>;
}
