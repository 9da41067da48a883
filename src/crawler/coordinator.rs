//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the crawl loop, which:
//! - Opens one browsing session for the whole crawl
//! - Dispatches frontier entries to at most `concurrency` visit tasks
//! - Folds finished visits into the crawl statistics
//! - Closes the session exactly once when the crawl ends
//!
//! Each visit opens its own page, navigates, checks the capture selector and
//! admits same-origin links. A visit that fails retracts its target and the
//! crawl carries on.

use crate::config::{
    CrawlerConfig, Target, Viewport, DEFAULT_CONCURRENCY, DEFAULT_MAX_DEPTH, DEFAULT_MAX_PAGES,
    DEFAULT_NAVIGATION_TIMEOUT_MS, WHOLE_PAGE_SELECTOR,
};
use crate::crawler::browser::{Browser, Page, Session, WaitUntil};
use crate::crawler::scheduler::{Frontier, FrontierEntry, TargetDefaults};
use crate::output::CrawlStatistics;
use crate::state::PageState;
use crate::url::same_origin;
use crate::{BrowserError, CrawlError};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex as AsyncMutex;
use tokio::task::JoinSet;
use url::Url;

/// Parameters of a single crawl
#[derive(Debug, Clone, PartialEq)]
pub struct CrawlOptions {
    /// Links found on pages at this depth are not followed
    pub max_depth: u32,

    /// Maximum number of targets to produce
    pub max_pages: usize,

    /// Maximum number of pages open at once
    pub concurrency: usize,

    /// Selector every discovered page must contain
    pub selector: String,

    /// Viewport stamped onto every target
    pub viewport: Viewport,

    /// Upper bound on a single navigation
    pub navigation_timeout: Duration,

    pub wait_until: WaitUntil,
}

impl Default for CrawlOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_pages: DEFAULT_MAX_PAGES,
            concurrency: DEFAULT_CONCURRENCY,
            selector: WHOLE_PAGE_SELECTOR.to_string(),
            viewport: Viewport::default(),
            navigation_timeout: Duration::from_millis(DEFAULT_NAVIGATION_TIMEOUT_MS),
            wait_until: WaitUntil::default(),
        }
    }
}

impl CrawlOptions {
    /// Builds crawl options from the `[crawler]` config section
    pub fn from_config(config: &CrawlerConfig) -> Self {
        Self {
            max_depth: config.max_depth,
            max_pages: config.max_pages,
            concurrency: config.concurrency,
            selector: config.selector.clone(),
            viewport: config.viewport,
            navigation_timeout: Duration::from_millis(config.navigation_timeout),
            wait_until: WaitUntil::default(),
        }
    }
}

/// Outcome of a finished crawl
#[derive(Debug, Clone)]
pub struct CrawlReport {
    /// Discovered targets in dispatch order
    pub targets: Vec<Target>,

    pub stats: CrawlStatistics,
}

/// What a visit task reports back to the loop
#[derive(Debug)]
struct VisitOutcome {
    state: PageState,
    links_admitted: usize,
    cross_origin: usize,
    /// The page loaded but answered with a 4xx or 5xx status
    error_status: bool,
}

impl VisitOutcome {
    fn skipped(state: PageState) -> Self {
        Self {
            state,
            links_admitted: 0,
            cross_origin: 0,
            error_status: false,
        }
    }
}

/// Main crawler coordinator structure
///
/// Built and run only by [`crawl`], so the session it opens is always closed.
struct Coordinator<S: Session> {
    session: Arc<S>,
    frontier: Arc<Mutex<Frontier>>,
    options: Arc<CrawlOptions>,
    /// Normalized seed; only links sharing its origin are followed
    seed: Url,
}

impl<S: Session> Coordinator<S> {
    /// Validates the seed and opens the browsing session
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Ready to run
    /// * `Err(CrawlError::InvalidSeed)` - The seed is not an absolute http(s) URL
    /// * `Err(CrawlError::Setup)` - The browser could not start a session
    async fn new<B>(browser: &B, seed_url: &str, options: CrawlOptions) -> Result<Self, CrawlError>
    where
        B: Browser<Session = S>,
    {
        let mut frontier = Frontier::new(
            options.max_depth,
            options.max_pages,
            TargetDefaults {
                selector: options.selector.clone(),
                viewport: options.viewport,
            },
        );
        let seed = frontier.seed(seed_url)?.url;

        let session = browser.open().await.map_err(CrawlError::Setup)?;

        Ok(Self {
            session: Arc::new(session),
            frontier: Arc::new(Mutex::new(frontier)),
            options: Arc::new(options),
            seed,
        })
    }

    /// Runs the crawl loop to completion and closes the session
    ///
    /// The frontier keeps up to `concurrency` visits in flight. The loop ends
    /// once none is in flight and nothing more can be dispatched, either
    /// because the queue is empty or because `max_pages` targets are held.
    async fn run(self) -> CrawlReport {
        tracing::info!(
            "Starting crawl of {} (max depth {}, max pages {}, concurrency {})",
            self.seed,
            self.options.max_depth,
            self.options.max_pages,
            self.options.concurrency
        );

        let start_time = Instant::now();
        let mut stats = CrawlStatistics::default();
        let mut visits: JoinSet<VisitOutcome> = JoinSet::new();
        let concurrency = self.options.concurrency.max(1);

        loop {
            loop {
                let dispatched = self.frontier.lock().dispatch(concurrency);
                let Some((entry, target)) = dispatched else {
                    break;
                };

                stats.pages_dispatched += 1;
                tracing::debug!("Visiting {} (depth {}) as '{}'", entry.url, entry.depth, target.name);

                visits.spawn(visit(
                    Arc::clone(&self.session),
                    Arc::clone(&self.frontier),
                    Arc::clone(&self.options),
                    self.seed.clone(),
                    entry,
                    target,
                ));
            }

            if self.frontier.lock().in_flight() == 0 {
                break;
            }

            let Some(joined) = visits.join_next().await else {
                break;
            };
            self.frontier.lock().finish_visit();

            match joined {
                Ok(outcome) => {
                    if outcome.error_status {
                        stats.error_status_pages += 1;
                    }
                    stats.record_visit(outcome.state, outcome.links_admitted, outcome.cross_origin)
                }
                Err(e) => {
                    tracing::error!("Visit task failed: {}", e);
                    stats.record_visit(PageState::Failed, 0, 0);
                }
            }

            if stats.pages_finished() % 10 == 0 {
                let frontier = self.frontier.lock();
                tracing::info!(
                    "Progress: {} pages visited, {} targets, {} pending",
                    stats.pages_finished(),
                    frontier.targets().len(),
                    frontier.pending_len()
                );
            }
        }

        if let Err(e) = self.session.close().await {
            tracing::warn!("Failed to close browsing session: {}", e);
        }

        let targets = self.frontier.lock().targets().to_vec();
        stats.targets_found = targets.len() as u64;
        stats.duration = start_time.elapsed();

        tracing::info!(
            "Crawl completed: {} targets from {} pages in {:?}",
            targets.len(),
            stats.pages_dispatched,
            stats.duration
        );

        CrawlReport { targets, stats }
    }
}

/// Crawls a site from `seed_url` and returns the discovered targets
///
/// Per-page failures (timeouts, unreachable pages, non-HTML content, missing
/// selector) only remove that page from the result. A page answering 404 or
/// 500 still loads and is kept. The call fails only if the seed is invalid or
/// the browser cannot start a session.
///
/// # Example
///
/// ```no_run
/// use visreg::crawler::{crawl, CrawlOptions, HttpBrowser};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let report = crawl(&HttpBrowser::default(), "https://example.com", CrawlOptions::default()).await?;
/// for target in &report.targets {
///     println!("{}: {}", target.name, target.url);
/// }
/// # Ok(())
/// # }
/// ```
pub async fn crawl<B: Browser>(
    browser: &B,
    seed_url: &str,
    options: CrawlOptions,
) -> Result<CrawlReport, CrawlError> {
    let coordinator = Coordinator::new(browser, seed_url, options).await?;
    Ok(coordinator.run().await)
}

/// Target recorded at dispatch that is retracted unless the visit succeeds
///
/// Dropping it without calling [`TentativeTarget::keep`] retracts the target,
/// which also covers a visit task that panics.
struct TentativeTarget {
    frontier: Arc<Mutex<Frontier>>,
    target: Option<Target>,
}

impl TentativeTarget {
    fn new(frontier: Arc<Mutex<Frontier>>, target: Target) -> Self {
        Self {
            frontier,
            target: Some(target),
        }
    }

    fn keep(mut self) {
        self.target = None;
    }
}

impl Drop for TentativeTarget {
    fn drop(&mut self) {
        if let Some(target) = self.target.take() {
            self.frontier.lock().retract(&target);
        }
    }
}

/// Visits one page; the page is closed on every path once it was opened
async fn visit<S: Session>(
    session: Arc<S>,
    frontier: Arc<Mutex<Frontier>>,
    options: Arc<CrawlOptions>,
    seed: Url,
    entry: FrontierEntry,
    target: Target,
) -> VisitOutcome {
    let tentative = TentativeTarget::new(Arc::clone(&frontier), target);

    let page = match session.new_page().await {
        Ok(page) => page,
        Err(e) => {
            tracing::warn!("Skipping {}: could not open page: {}", entry.url, e);
            return VisitOutcome::skipped(PageState::from_browser_error(&e));
        }
    };
    let page = Arc::new(AsyncMutex::new(page));

    // Exploring runs in its own task so a panic there still reaches page.close()
    let exploring = tokio::spawn(explore(
        Arc::clone(&page),
        frontier,
        options,
        seed,
        entry.clone(),
    ));
    let result = match exploring.await {
        Ok(result) => result,
        Err(e) => {
            tracing::error!("Visit of {} failed: {}", entry.url, e);
            Err(PageState::Failed)
        }
    };

    match Arc::try_unwrap(page) {
        Ok(page) => {
            if let Err(e) = page.into_inner().close().await {
                tracing::warn!("Failed to close page for {}: {}", entry.url, e);
            }
        }
        Err(_) => tracing::warn!("Page for {} is still referenced and was not closed", entry.url),
    }

    match result {
        Ok(outcome) => {
            tentative.keep();
            outcome
        }
        Err(state) => VisitOutcome::skipped(state),
    }
}

/// Navigates, validates the selector and admits links
///
/// Returns the terminal state of a failed visit as the error.
async fn explore<P: Page>(
    page: Arc<AsyncMutex<P>>,
    frontier: Arc<Mutex<Frontier>>,
    options: Arc<CrawlOptions>,
    seed: Url,
    entry: FrontierEntry,
) -> Result<VisitOutcome, PageState> {
    let mut page = page.lock().await;
    let timeout = options.navigation_timeout;

    // Bound the navigation here as well so a page ignoring its timeout cannot stall a worker
    let navigation = tokio::time::timeout(timeout, page.goto(&entry.url, options.wait_until, timeout));
    let navigated = match navigation.await {
        Ok(result) => result,
        Err(_) => Err(BrowserError::Timeout {
            url: entry.url.to_string(),
            timeout,
        }),
    };
    if let Err(e) = navigated {
        tracing::warn!("Skipping {}: {}", entry.url, e);
        return Err(PageState::from_browser_error(&e));
    }

    let error_status = match page.status() {
        Some(status) if status >= 400 => {
            tracing::info!("{} answered HTTP {}, keeping it as a target", entry.url, status);
            true
        }
        _ => false,
    };

    if options.selector != WHOLE_PAGE_SELECTOR {
        match page.query_selector(&options.selector).await {
            Ok(Some(_)) => {}
            Ok(None) => {
                tracing::warn!("Skipping {}: selector '{}' not found", entry.url, options.selector);
                return Err(PageState::SelectorNotFound);
            }
            Err(e) => {
                tracing::warn!("Skipping {}: {}", entry.url, e);
                return Err(PageState::from_browser_error(&e));
            }
        }
    }

    if entry.depth >= options.max_depth {
        return Ok(VisitOutcome {
            error_status,
            ..VisitOutcome::skipped(PageState::MaxDepthReached)
        });
    }

    let links = match page.extract_links().await {
        Ok(links) => links,
        Err(e) => {
            tracing::warn!("Skipping {}: {}", entry.url, e);
            return Err(PageState::from_browser_error(&e));
        }
    };

    let mut outcome = VisitOutcome {
        error_status,
        ..VisitOutcome::skipped(PageState::Processed)
    };
    let mut frontier = frontier.lock();
    for link in &links {
        match Url::parse(link) {
            Ok(parsed) if same_origin(&parsed, &seed) => {
                if frontier.admit(link, entry.depth) {
                    outcome.links_admitted += 1;
                }
            }
            Ok(_) => outcome.cross_origin += 1,
            Err(_) => tracing::debug!("Dropping link {}: not an absolute URL", link),
        }
    }

    tracing::debug!(
        "{}: {} links, {} admitted, {} cross-origin",
        entry.url,
        links.len(),
        outcome.links_admitted,
        outcome.cross_origin
    );

    Ok(outcome)
}
