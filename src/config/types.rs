use serde::{Deserialize, Serialize};

/// Selector meaning "capture the whole page"
pub const WHOLE_PAGE_SELECTOR: &str = "body";

/// Default location of the configuration file
pub const DEFAULT_CONFIG_PATH: &str = "config/visreg.toml";

pub const DEFAULT_MAX_DEPTH: u32 = 2;
pub const DEFAULT_MAX_PAGES: usize = 20;
pub const DEFAULT_CONCURRENCY: usize = 5;
pub const DEFAULT_NAVIGATION_TIMEOUT_MS: u64 = 30_000;

/// Main configuration structure for visreg
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    /// Site the targets are relative to
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default)]
    pub crawler: CrawlerConfig,

    /// Screenshot comparison settings, passed through untouched
    #[serde(default)]
    pub options: CompareOptions,

    #[serde(default)]
    pub targets: Vec<Target>,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CrawlerConfig {
    /// Maximum link distance from the seed page
    #[serde(default = "default_max_depth")]
    pub max_depth: u32,

    /// Maximum number of targets a crawl may produce
    #[serde(default = "default_max_pages")]
    pub max_pages: usize,

    /// Maximum number of pages visited at the same time
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Per-page navigation timeout (milliseconds)
    #[serde(default = "default_navigation_timeout")]
    pub navigation_timeout: u64,

    /// Selector every discovered target is captured with
    #[serde(default = "default_selector")]
    pub selector: String,

    /// User agent sent while crawling
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,

    /// Viewport every discovered target is captured at
    #[serde(default)]
    pub viewport: Viewport,
}

/// Options for the screenshot comparison stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CompareOptions {
    /// Delay after navigation before capturing (milliseconds)
    #[serde(default = "default_wait_time")]
    pub wait_time: u64,

    /// Per-pixel color distance threshold (0.0 - 1.0)
    #[serde(default = "default_threshold")]
    pub threshold: f64,

    /// Whether anti-aliased pixels count as differences
    #[serde(default)]
    pub include_aa: bool,

    /// RGB color used to paint differing pixels
    #[serde(default = "default_diff_mask")]
    pub diff_mask: [u8; 3],
}

/// A single capture instruction
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Target {
    /// Filesystem-safe identifier, used for screenshot file names
    pub name: String,

    /// Path and query relative to the base URL
    pub url: String,

    #[serde(default = "default_selector")]
    pub selector: String,

    #[serde(default)]
    pub viewport: Viewport,
}

/// Browser viewport in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            crawler: CrawlerConfig::default(),
            options: CompareOptions::default(),
            targets: vec![Target {
                name: "homepage".to_string(),
                url: "/".to_string(),
                selector: default_selector(),
                viewport: Viewport::default(),
            }],
        }
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
            max_pages: default_max_pages(),
            concurrency: default_concurrency(),
            navigation_timeout: default_navigation_timeout(),
            selector: default_selector(),
            user_agent: None,
            viewport: Viewport::default(),
        }
    }
}

impl Default for CompareOptions {
    fn default() -> Self {
        Self {
            wait_time: default_wait_time(),
            threshold: default_threshold(),
            include_aa: false,
            diff_mask: default_diff_mask(),
        }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 800,
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_max_depth() -> u32 {
    DEFAULT_MAX_DEPTH
}

fn default_max_pages() -> usize {
    DEFAULT_MAX_PAGES
}

fn default_concurrency() -> usize {
    DEFAULT_CONCURRENCY
}

fn default_navigation_timeout() -> u64 {
    DEFAULT_NAVIGATION_TIMEOUT_MS
}

fn default_selector() -> String {
    WHOLE_PAGE_SELECTOR.to_string()
}

fn default_wait_time() -> u64 {
    3000
}

fn default_threshold() -> f64 {
    0.1
}

fn default_diff_mask() -> [u8; 3] {
    [255, 0, 255]
}
