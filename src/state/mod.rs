//! State module for tracking crawl progress
//!
//! `PageState` records where each visited page ended up: a target, or one of
//! the reasons it was skipped.

mod page_state;

pub use page_state::PageState;
