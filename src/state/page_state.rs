/// Page state definitions for tracking crawl progress
///
/// This module defines how a visited page can end up during a crawl.
use crate::BrowserError;
use std::fmt;

/// Represents the final state of a visited page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageState {
    // ===== Success States =====
    /// Page became a target and its links were followed
    Processed,

    /// Page became a target at the maximum depth; its links were not followed
    MaxDepthReached,

    // ===== Error States =====
    /// The configured selector matched nothing on the page
    SelectorNotFound,

    /// Navigation did not finish within the timeout
    TimedOut,

    /// Page could not be reached (connection refused, DNS failure, TLS error)
    Unreachable,

    /// Page delivered something other than a document
    ContentMismatch,

    /// Page visit failed for other reasons (page context error, worker panic)
    Failed,
}

impl PageState {
    /// Returns true if the page ended up as a target
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Processed | Self::MaxDepthReached)
    }

    /// Returns true if this represents a skipped page
    pub fn is_error(&self) -> bool {
        !self.is_success()
    }

    /// Maps a browser failure onto the state the page ends in
    pub fn from_browser_error(error: &BrowserError) -> Self {
        match error {
            BrowserError::Timeout { .. } => Self::TimedOut,
            BrowserError::Navigation { .. } => Self::Unreachable,
            BrowserError::ContentMismatch { .. } => Self::ContentMismatch,
            BrowserError::Launch(_)
            | BrowserError::InvalidSelector { .. }
            | BrowserError::Page(_) => Self::Failed,
        }
    }

    /// Short machine-friendly name of the state
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Processed => "processed",
            Self::MaxDepthReached => "max_depth_reached",
            Self::SelectorNotFound => "selector_not_found",
            Self::TimedOut => "timed_out",
            Self::Unreachable => "unreachable",
            Self::ContentMismatch => "content_mismatch",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for PageState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
