//! visreg: target discovery for visual regression testing
//!
//! This crate crawls a website from a single seed URL and turns the pages it
//! finds into capture targets (name, path, selector, viewport) for the
//! screenshot and comparison stages.

pub mod config;
pub mod crawler;
pub mod output;
pub mod state;
pub mod url;

use std::time::Duration;
use thiserror::Error;

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize TOML: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL")]
    MissingHost,
}

/// Errors raised by a browsing session or one of its pages
#[derive(Debug, Error)]
pub enum BrowserError {
    #[error("Failed to start browsing session: {0}")]
    Launch(String),

    #[error("Navigation to {url} failed: {message}")]
    Navigation { url: String, message: String },

    #[error("Navigation to {url} timed out after {timeout:?}")]
    Timeout { url: String, timeout: Duration },

    #[error("Expected HTML from {url}, got {content_type}")]
    ContentMismatch { url: String, content_type: String },

    #[error("Invalid selector '{selector}': {message}")]
    InvalidSelector { selector: String, message: String },

    #[error("Page error: {0}")]
    Page(String),
}

/// Errors that abort a whole crawl
///
/// Per-page failures never surface here; they are folded into the crawl
/// statistics instead.
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Invalid seed URL: {0}")]
    InvalidSeed(#[from] UrlError),

    #[error("Setup failed: {0}")]
    Setup(#[source] BrowserError),
}

// Re-export commonly used types
pub use config::{Config, Target, Viewport};
pub use crawler::{crawl, CrawlOptions, CrawlReport};
pub use state::PageState;
pub use url::{normalize_url, same_origin, target_name};
