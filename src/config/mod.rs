//! Configuration module for visreg
//!
//! This module handles loading, saving and validating the TOML configuration
//! file that holds the base URL, crawler limits, comparison options and the
//! list of capture targets.
//!
//! # Example
//!
//! ```no_run
//! use visreg::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("config/visreg.toml")).unwrap();
//! println!("Crawler will use max depth: {}", config.crawler.max_depth);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    CompareOptions, Config, CrawlerConfig, Target, Viewport, DEFAULT_CONCURRENCY,
    DEFAULT_CONFIG_PATH, DEFAULT_MAX_DEPTH, DEFAULT_MAX_PAGES, DEFAULT_NAVIGATION_TIMEOUT_MS,
    WHOLE_PAGE_SELECTOR,
};

// Re-export parser functions
pub use parser::{
    compute_config_hash, load_config, load_or_default, sample_config, save_config,
};
pub use validation::{validate, validate_crawler_config, validate_selector};
