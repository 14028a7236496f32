//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the breadth-first crawl loop:
//! - Validating the seed and deriving the scope filter
//! - Draining the frontier one URL at a time
//! - Storing fetched pages and enqueueing in-scope links
//! - Reporting progress and honoring cancellation between iterations

use crate::config::{CrawlerConfig, DEFAULT_MIN_WORD_LENGTH};
use crate::crawler::extractor::Extractor;
use crate::crawler::fetcher::{Fetcher, RawPage};
use crate::crawler::frontier::{Frontier, FrontierEntry};
use crate::crawler::progress::{CrawlEvent, ProgressReporter};
use crate::state::{CrawlState, PageRecord, PageSet};
use crate::url::{canonicalize, validate_seed, ScopeFilter};
use crate::SurveyError;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use url::Url;

/// Pause after each successful fetch before the next request
pub const REQUEST_DELAY: Duration = Duration::from_millis(500);

/// Shared flag used to stop a running crawl
///
/// The coordinator checks it before dequeuing each URL, so an in-flight
/// request always finishes first.
#[derive(Debug, Clone, Default)]
pub struct CancelHandle {
    flag: Arc<AtomicBool>,
}

impl CancelHandle {
    /// Requests cancellation
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// Result of a finished crawl session
#[derive(Debug)]
pub struct CrawlOutcome {
    /// Pages fetched successfully, in fetch order
    pub pages: PageSet,

    /// Final session state (`Completed` or `Aborted`)
    pub state: CrawlState,

    /// Wall-clock duration of the loop
    pub elapsed: Duration,
}

/// Main crawler coordinator structure
///
/// One coordinator owns one session: its HTTP client, frontier, visited set
/// and page set are never shared with another session.
pub struct Coordinator {
    config: CrawlerConfig,
    seed: Url,
    scope: ScopeFilter,
    fetcher: Fetcher,
    extractor: Extractor,
    frontier: Frontier,
    pages: PageSet,
    progress: ProgressReporter,
    cancel: CancelHandle,
    state: CrawlState,
}

impl Coordinator {
    /// Creates a new coordinator for a seed URL
    ///
    /// # Arguments
    ///
    /// * `seed` - Absolute http(s) URL the crawl starts from
    /// * `config` - Page cap, depth limit and timeout
    /// * `progress` - Where progress events are sent
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Session ready to run, in the `Idle` state
    /// * `Err(SurveyError::InvalidSeedUrl)` - The seed has no scheme or host
    pub fn new(
        seed: &str,
        config: CrawlerConfig,
        progress: ProgressReporter,
    ) -> Result<Self, SurveyError> {
        let invalid_seed = |source| SurveyError::InvalidSeedUrl {
            url: seed.to_string(),
            source,
        };
        let seed_url = validate_seed(seed).map_err(invalid_seed)?;
        let scope = ScopeFilter::from_seed(&seed_url).map_err(invalid_seed)?;

        let fetcher = Fetcher::new(config.timeout())?;
        let extractor = Extractor::new(DEFAULT_MIN_WORD_LENGTH)?;

        let mut frontier = Frontier::new();
        frontier.push(FrontierEntry::new(canonicalize(&seed_url), 0));

        Ok(Self {
            config,
            seed: seed_url,
            scope,
            fetcher,
            extractor,
            frontier,
            pages: PageSet::new(),
            progress,
            cancel: CancelHandle::default(),
            state: CrawlState::Idle,
        })
    }

    /// Current session state
    pub fn state(&self) -> CrawlState {
        self.state
    }

    /// The scope derived from the seed
    pub fn scope(&self) -> &ScopeFilter {
        &self.scope
    }

    /// Handle that can cancel this session from another task
    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    fn transition(&mut self, next: CrawlState) -> Result<(), SurveyError> {
        if !self.state.can_transition_to(next) {
            return Err(SurveyError::InvalidTransition {
                from: self.state,
                to: next,
            });
        }
        tracing::debug!("Crawl state {} -> {}", self.state, next);
        self.state = next;
        Ok(())
    }

    /// Runs the breadth-first crawl loop until the frontier is empty, the
    /// page cap is reached, or cancellation is requested
    ///
    /// Fetch failures are reported as `Failed` events and never end the
    /// crawl.
    pub async fn run(mut self) -> Result<CrawlOutcome, SurveyError> {
        self.transition(CrawlState::Running)?;
        let start_time = Instant::now();

        tracing::info!(
            "Scope: domain {}, path {}",
            self.scope.base_domain(),
            if self.scope.base_path().is_empty() {
                "(unrestricted)"
            } else {
                self.scope.base_path()
            }
        );
        self.progress.emit(CrawlEvent::Started {
            seed: self.seed.to_string(),
        });

        let mut cancelled = false;

        while self.pages.len() < self.config.max_pages {
            if self.cancel.is_cancelled() {
                cancelled = true;
                break;
            }

            let Some(entry) = self.frontier.pop_front() else {
                tracing::info!("Frontier is empty, crawl complete");
                break;
            };

            if self.frontier.is_visited(&entry.url) || entry.depth > self.config.max_depth {
                continue;
            }
            self.frontier.mark_visited(&entry.url);

            self.progress.emit(CrawlEvent::Fetching {
                url: entry.url.clone(),
                depth: entry.depth,
            });

            let fetched = self.fetcher.fetch(&entry.url).await;
            match fetched {
                Ok(raw) => {
                    self.handle_page(entry, raw);

                    if self.pages.len() < self.config.max_pages && !self.frontier.is_empty() {
                        tokio::time::sleep(REQUEST_DELAY).await;
                    }
                }
                Err(e) => {
                    self.progress.emit(CrawlEvent::Failed {
                        url: entry.url,
                        reason: e.to_string(),
                    });
                }
            }
        }

        let pages = self.pages.len();
        let (final_state, event) = if cancelled {
            (CrawlState::Aborted, CrawlEvent::Aborted { pages })
        } else {
            (CrawlState::Completed, CrawlEvent::Completed { pages })
        };
        self.transition(final_state)?;

        let elapsed = start_time.elapsed();
        tracing::info!(
            "Crawl {}: {} pages fetched, {} URLs visited in {:?}",
            final_state,
            pages,
            self.frontier.visited_count(),
            elapsed
        );
        self.progress.finish(event);

        Ok(CrawlOutcome {
            pages: self.pages,
            state: final_state,
            elapsed,
        })
    }

    /// Stores a fetched page and enqueues its in-scope links
    fn handle_page(&mut self, entry: FrontierEntry, raw: RawPage) {
        let final_url = Url::parse(&raw.final_url).ok();
        if let Some(target) = final_url.as_ref().map(canonicalize) {
            if target != entry.url {
                if self.frontier.is_visited(&target) {
                    tracing::debug!("{} redirected to already visited {}", entry.url, target);
                    return;
                }
                self.frontier.mark_visited(&target);
            }
        }

        let record = PageRecord::new(
            entry.url.clone(),
            raw.status_code,
            raw.body,
            raw.headers,
            entry.depth,
        );

        self.progress.emit(CrawlEvent::Fetched {
            url: entry.url.clone(),
            status_code: record.status_code(),
            size: record.size(),
        });

        // Links are only worth extracting if their depth is still allowed
        let links = if record.is_html() && entry.depth < self.config.max_depth {
            self.extractor.links(record.body())
        } else {
            Vec::new()
        };

        self.pages.insert(record);

        if links.is_empty() {
            return;
        }

        // Resolve against the post-redirect URL
        let page_url = match final_url.map_or_else(|| Url::parse(&entry.url), Ok) {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!("Cannot resolve links of {}: {}", entry.url, e);
                return;
            }
        };
        self.enqueue_links(&page_url, entry.depth + 1, &links);
    }

    fn enqueue_links(&mut self, page_url: &Url, depth: u32, links: &[String]) {
        let mut seen_on_page = HashSet::new();
        let mut queued = 0;

        for href in links {
            let Some(url) = self.scope.admit(href, page_url) else {
                continue;
            };
            if !seen_on_page.insert(url.clone()) || self.frontier.is_visited(&url) {
                continue;
            }
            if self.frontier.is_full() {
                tracing::debug!("Frontier full, dropping remaining links from {}", page_url);
                break;
            }
            if self.frontier.push(FrontierEntry::new(url, depth)) {
                queued += 1;
            }
        }

        tracing::debug!(
            "Queued {} of {} links from {} ({} in frontier)",
            queued,
            links.len(),
            page_url,
            self.frontier.len()
        );
    }
}

/// Runs a complete crawl session and returns the fetched pages
///
/// # Arguments
///
/// * `seed` - The seed URL
/// * `config` - The crawler configuration
/// * `progress` - Where progress events are sent
///
/// # Returns
///
/// * `Ok(PageSet)` - Pages fetched, possibly empty
/// * `Err(SurveyError)` - The seed was invalid or the session could not start
pub async fn run_crawl(
    seed: &str,
    config: CrawlerConfig,
    progress: ProgressReporter,
) -> Result<PageSet, SurveyError> {
    let coordinator = Coordinator::new(seed, config, progress)?;
    let outcome = coordinator.run().await?;
    Ok(outcome.pages)
}
