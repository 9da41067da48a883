//! Frontier management for the crawl
//!
//! This module handles:
//! - The FIFO queue of pages waiting to be visited
//! - The visited set that guarantees each normalized URL is enqueued once
//! - The ordered list of recorded targets and the max-pages cap
//! - The max-depth policy for admitting links
//!
//! The frontier itself is not synchronized; the coordinator keeps it behind a
//! single mutex so every operation here is one atomic step.

use crate::config::{Target, Viewport};
use crate::url::{normalize_url, relative_path, target_name};
use crate::UrlError;
use std::collections::{HashSet, VecDeque};
use url::Url;

/// A page waiting to be visited
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontierEntry {
    /// Normalized absolute URL
    pub url: Url,

    /// Link distance from the seed page
    pub depth: u32,
}

/// Selector and viewport stamped onto every discovered target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetDefaults {
    pub selector: String,
    pub viewport: Viewport,
}

/// Frontier owns the crawl state: queue, visited set and recorded targets
#[derive(Debug)]
pub struct Frontier {
    /// Pages waiting for a worker, in discovery order
    queue: VecDeque<FrontierEntry>,

    /// Normalized URLs that have ever been enqueued
    visited: HashSet<String>,

    /// Recorded targets, in dispatch order
    targets: Vec<Target>,

    /// Number of visits currently running
    in_flight: usize,

    max_depth: u32,
    max_pages: usize,
    defaults: TargetDefaults,
}

impl Frontier {
    /// Creates an empty frontier
    ///
    /// # Arguments
    ///
    /// * `max_depth` - Pages at this depth are recorded but their links are not admitted
    /// * `max_pages` - Upper bound on recorded targets
    /// * `defaults` - Selector and viewport for every target
    pub fn new(max_depth: u32, max_pages: usize, defaults: TargetDefaults) -> Self {
        Self {
            queue: VecDeque::new(),
            visited: HashSet::new(),
            targets: Vec::new(),
            in_flight: 0,
            max_depth,
            max_pages,
            defaults,
        }
    }

    /// Normalizes the start URL, marks it visited and enqueues it at depth 0
    pub fn seed(&mut self, url: &str) -> Result<FrontierEntry, UrlError> {
        let normalized = normalize_url(url)?;
        self.visited.insert(normalized.as_str().to_string());

        let entry = FrontierEntry {
            url: normalized,
            depth: 0,
        };
        self.queue.push_back(entry.clone());
        Ok(entry)
    }

    /// Admits a discovered link into the frontier
    ///
    /// Returns true only if the link was new and has been enqueued at
    /// `from_depth + 1`. Unparseable links, links already seen and links
    /// found on a page at the maximum depth are ignored.
    pub fn admit(&mut self, url: &str, from_depth: u32) -> bool {
        if from_depth >= self.max_depth {
            return false;
        }

        let normalized = match normalize_url(url) {
            Ok(n) => n,
            Err(e) => {
                tracing::debug!("Dropping link {}: {}", url, e);
                return false;
            }
        };

        if !self.visited.insert(normalized.as_str().to_string()) {
            return false;
        }

        tracing::trace!("Admitted {} at depth {}", normalized, from_depth + 1);
        self.queue.push_back(FrontierEntry {
            url: normalized,
            depth: from_depth + 1,
        });
        true
    }

    /// Pops the oldest pending entry
    pub fn next_entry(&mut self) -> Option<FrontierEntry> {
        self.queue.pop_front()
    }

    /// Builds the tentative target for an entry
    ///
    /// Names that clash with an already recorded target get a numeric suffix
    /// (`about`, `about-2`, ...).
    pub fn candidate_target(&self, entry: &FrontierEntry) -> Target {
        let url = relative_path(&entry.url);
        let base = target_name(&url);

        let mut name = base.clone();
        let mut suffix = 2;
        while self.targets.iter().any(|t| t.name == name) {
            name = format!("{}-{}", base, suffix);
            suffix += 1;
        }

        Target {
            name,
            url,
            selector: self.defaults.selector.clone(),
            viewport: self.defaults.viewport,
        }
    }

    /// Appends a target unless the max-pages cap has been reached
    pub fn record_target(&mut self, target: Target) -> bool {
        if self.is_capped() {
            return false;
        }
        self.targets.push(target);
        true
    }

    /// Removes a previously recorded target
    pub fn retract(&mut self, target: &Target) -> bool {
        match self.targets.iter().position(|t| t == target) {
            Some(index) => {
                self.targets.remove(index);
                true
            }
            None => false,
        }
    }

    /// Pops the next entry and records its tentative target in one step
    ///
    /// Returns None when `max_in_flight` visits are already running, the cap
    /// is reached or nothing is pending. The returned visit is counted as in
    /// flight until [`Frontier::finish_visit`].
    pub fn dispatch(&mut self, max_in_flight: usize) -> Option<(FrontierEntry, Target)> {
        if self.in_flight >= max_in_flight || self.is_capped() {
            return None;
        }

        let entry = self.next_entry()?;
        let target = self.candidate_target(&entry);
        if !self.record_target(target.clone()) {
            return None;
        }

        self.in_flight += 1;
        Some((entry, target))
    }

    /// Marks one dispatched visit as finished
    pub fn finish_visit(&mut self) {
        self.in_flight = self.in_flight.saturating_sub(1);
    }

    /// Returns true once `max_pages` targets are recorded
    pub fn is_capped(&self) -> bool {
        self.targets.len() >= self.max_pages
    }

    /// Returns the number of pending entries
    pub fn pending_len(&self) -> usize {
        self.queue.len()
    }

    /// Returns the number of URLs ever enqueued
    pub fn visited_len(&self) -> usize {
        self.visited.len()
    }

    /// Returns the number of visits currently running
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Returns the recorded targets
    pub fn targets(&self) -> &[Target] {
        &self.targets
    }
}
