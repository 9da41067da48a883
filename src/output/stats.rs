//! Statistics gathered while crawling
//!
//! The coordinator folds every finished visit into a [`CrawlStatistics`];
//! this module also knows how to print it.

use crate::state::PageState;
use std::collections::HashMap;
use std::time::Duration;

/// Crawl statistics summary
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CrawlStatistics {
    /// Number of visits handed to workers
    pub pages_dispatched: u64,

    /// Count of finished visits by final state
    pub pages_by_state: HashMap<PageState, u64>,

    /// Links that entered the frontier
    pub links_admitted: u64,

    /// Links ignored because they point to another origin
    pub cross_origin_links: u64,

    /// Targets whose page loaded with a 4xx or 5xx status
    pub error_status_pages: u64,

    /// Targets left after retractions
    pub targets_found: u64,

    /// Wall-clock time of the crawl
    pub duration: Duration,
}

impl CrawlStatistics {
    /// Records one finished visit
    pub fn record_visit(&mut self, state: PageState, links_admitted: usize, cross_origin: usize) {
        *self.pages_by_state.entry(state).or_insert(0) += 1;
        self.links_admitted += links_admitted as u64;
        self.cross_origin_links += cross_origin as u64;
    }

    /// Returns how many visits ended in `state`
    pub fn count(&self, state: PageState) -> u64 {
        self.pages_by_state.get(&state).copied().unwrap_or(0)
    }

    /// Returns the number of visits that did not yield a target
    pub fn pages_skipped(&self) -> u64 {
        self.pages_by_state
            .iter()
            .filter(|(state, _)| state.is_error())
            .map(|(_, count)| count)
            .sum()
    }

    /// Returns the number of finished visits
    pub fn pages_finished(&self) -> u64 {
        self.pages_by_state.values().sum()
    }
}

/// Prints statistics to stdout in a formatted manner
///
/// # Arguments
///
/// * `stats` - The statistics to display
pub fn print_statistics(stats: &CrawlStatistics) {
    println!("=== Crawl Statistics ===\n");

    println!("Overview:");
    println!("  Pages visited: {}", stats.pages_dispatched);
    println!("  Targets found: {}", stats.targets_found);
    println!("  Pages skipped: {}", stats.pages_skipped());
    if stats.error_status_pages > 0 {
        println!("  Targets with error status: {}", stats.error_status_pages);
    }
    println!("  Links admitted: {}", stats.links_admitted);
    println!("  Cross-origin links ignored: {}", stats.cross_origin_links);
    println!("  Duration: {:.2}s", stats.duration.as_secs_f64());
    println!();

    println!("Pages by State:");
    // Sort states by count (descending)
    let mut state_counts: Vec<_> = stats.pages_by_state.iter().collect();
    state_counts.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.as_str().cmp(b.0.as_str())));

    let finished = stats.pages_finished();
    for (state, count) in state_counts {
        let percentage = if finished > 0 {
            (*count as f64 / finished as f64) * 100.0
        } else {
            0.0
        };
        println!("  {}: {} ({:.1}%)", state, count, percentage);
    }
}
