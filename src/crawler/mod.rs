//! Crawler module for target discovery
//!
//! This module contains the core crawling logic, including:
//! - The browsing resource abstraction and its HTTP implementation
//! - HTML parsing for link extraction and selector checks
//! - The frontier (queue, visited set, recorded targets)
//! - Overall crawl coordination with bounded concurrency

mod browser;
mod coordinator;
mod fetcher;
mod parser;
mod scheduler;

pub use browser::{Browser, ElementHandle, Page, Session, WaitUntil};
pub use coordinator::{crawl, CrawlOptions, CrawlReport};
pub use fetcher::{build_http_client, default_user_agent, HttpBrowser, HttpPage, HttpSession};
pub use parser::{extract_links, find_element};
pub use scheduler::{Frontier, FrontierEntry, TargetDefaults};
