//! URL handling module for visreg
//!
//! This module provides URL normalization (the crawl's dedup key), origin
//! comparison, and the URL-to-target-name mapping.

mod naming;
mod normalize;
mod origin;

// Re-export main functions
pub use naming::{target_name, HOMEPAGE_NAME};
pub use normalize::normalize_url;
pub use origin::{relative_path, same_origin};
