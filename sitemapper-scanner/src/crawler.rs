use crate::classifier::is_site_url;
use crate::error::Result;
use crate::extractor::{HtmlLinkExtractor, LinkExtractor};
use crate::fetcher::{DEFAULT_REQUEST_TIMEOUT, HttpFetcher, PageFetcher};
use crate::frontier::Frontier;
use crate::normalizer::{NormalizedUrl, normalize_from};
use crate::result::{CrawlOutcome, CrawlResult};
use crate::root::RootUrl;
use indexmap::IndexSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info};
use url::Url;

pub const DEFAULT_TIME_BUDGET: Duration = Duration::from_secs(1000);

pub type ProgressCallback = Arc<dyn Fn(&CrawlEvent) + Send + Sync>;

#[derive(Debug, Clone, PartialEq)]
pub enum CrawlEvent {
    Started {
        root: String,
    },
    /// A page was fetched and joined the site URLs.
    Added {
        url: String,
        total: usize,
    },
    /// A page failed to fetch and is out of this crawl for good.
    Dropped {
        url: String,
        total: usize,
    },
    Finished {
        root: String,
        outcome: CrawlOutcome,
        total: usize,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrawlState {
    Idle,
    Running,
    Completed,
    Aborted,
}

/// Mutable state of a single crawl: frontier, accepted URLs, clock and counters.
pub struct CrawlSession {
    root: RootUrl,
    frontier: Frontier,
    site_urls: IndexSet<String>,
    state: CrawlState,
    budget: Duration,
    started: Option<Instant>,
    elapsed: Duration,
    pages_fetched: usize,
    fetch_failures: usize,
}

impl CrawlSession {
    pub fn new(root: RootUrl, budget: Duration) -> Self {
        Self {
            root,
            frontier: Frontier::new(),
            site_urls: IndexSet::new(),
            state: CrawlState::Idle,
            budget,
            started: None,
            elapsed: Duration::ZERO,
            pages_fetched: 0,
            fetch_failures: 0,
        }
    }

    pub fn state(&self) -> CrawlState {
        self.state
    }

    pub fn root(&self) -> &RootUrl {
        &self.root
    }

    pub fn frontier(&self) -> &Frontier {
        &self.frontier
    }

    pub fn site_urls(&self) -> &IndexSet<String> {
        &self.site_urls
    }

    /// Idle -> Running. The root is queued and marked seen but never becomes a
    /// site URL.
    pub fn start(&mut self) {
        if self.state != CrawlState::Idle {
            return;
        }
        self.frontier.seed(&self.root);
        self.started = Some(Instant::now());
        self.transition(CrawlState::Running);
    }

    /// Next URL to visit. An empty frontier completes the crawl.
    pub fn next_url(&mut self) -> Option<NormalizedUrl> {
        if self.state != CrawlState::Running {
            return None;
        }
        let next = self.frontier.dequeue();
        if next.is_none() {
            self.transition(CrawlState::Completed);
        }
        next
    }

    /// Accepts a fetched page and queues its in-scope links in extraction order.
    /// Returns true if the page was newly added to the site URLs.
    pub fn record_success(&mut self, url: &NormalizedUrl, hrefs: &[String]) -> bool {
        self.pages_fetched += 1;
        let added =
            url.as_str() != self.root.as_str() && self.site_urls.insert(url.as_str().to_string());

        let page = Url::parse(url.as_str()).unwrap_or_else(|_| self.root.as_url().clone());
        for href in hrefs {
            if !is_site_url(href, &self.root) {
                debug!("Skipping out-of-scope link {:?} on {}", href, url);
                continue;
            }
            let Some(candidate) = normalize_from(href, &page, &self.root) else {
                continue;
            };
            if !self.frontier.is_seen(&candidate) {
                debug!("Queueing {} (found on {})", candidate, url);
                self.frontier.enqueue(candidate);
            }
        }

        added
    }

    /// A failed fetch is final: the URL leaves the site URLs and stays seen.
    pub fn record_failure(&mut self, url: &NormalizedUrl) {
        self.fetch_failures += 1;
        self.site_urls.shift_remove(url.as_str());
        self.frontier.mark_seen(url);
    }

    /// Running -> Aborted once the elapsed time exceeds the budget.
    pub fn check_budget(&mut self) -> bool {
        let Some(started) = self.started else {
            return false;
        };
        self.elapsed = started.elapsed();
        if self.state == CrawlState::Running && self.elapsed > self.budget {
            self.transition(CrawlState::Aborted);
            return true;
        }
        false
    }

    pub fn finish(mut self) -> CrawlResult {
        if let Some(started) = self.started {
            self.elapsed = started.elapsed();
        }
        let outcome = match self.state {
            CrawlState::Aborted => CrawlOutcome::Aborted,
            _ => CrawlOutcome::Completed,
        };

        CrawlResult {
            root_url: self.root.as_str().to_string(),
            urls: self.site_urls,
            elapsed: self.elapsed,
            outcome,
            pages_fetched: self.pages_fetched,
            fetch_failures: self.fetch_failures,
        }
    }

    fn transition(&mut self, next: CrawlState) {
        debug!("Crawl of {}: {:?} -> {:?}", self.root, self.state, next);
        self.state = next;
    }
}

/// Breadth-first crawler for a single site.
///
/// Holds no per-crawl state, so one instance can run any number of crawls,
/// including concurrent ones for different roots.
pub struct Crawler<F = HttpFetcher, X = HtmlLinkExtractor> {
    fetcher: F,
    extractor: X,
    time_budget: Duration,
    progress_callback: Option<ProgressCallback>,
}

impl Crawler {
    pub fn new() -> Result<Self> {
        Self::with_timeout(DEFAULT_REQUEST_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        Ok(Self::with_parts(
            HttpFetcher::with_timeout(timeout)?,
            HtmlLinkExtractor::new(),
        ))
    }
}

impl<F: PageFetcher, X: LinkExtractor> Crawler<F, X> {
    pub fn with_parts(fetcher: F, extractor: X) -> Self {
        Self {
            fetcher,
            extractor,
            time_budget: DEFAULT_TIME_BUDGET,
            progress_callback: None,
        }
    }

    pub fn with_time_budget(mut self, budget: Duration) -> Self {
        self.time_budget = budget;
        self
    }

    pub fn with_progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    pub fn time_budget(&self) -> Duration {
        self.time_budget
    }

    /// Crawls the site under `root_url`.
    ///
    /// Only an unusable root is an error. Fetch failures and an exhausted time
    /// budget still produce a (possibly partial) result.
    pub async fn crawl(&self, root_url: &str) -> Result<CrawlResult> {
        let root = RootUrl::parse(root_url)?;
        info!(
            "Starting crawl of {} (time budget {}s)",
            root,
            self.time_budget.as_secs()
        );

        let mut session = CrawlSession::new(root, self.time_budget);
        session.start();
        self.emit(CrawlEvent::Started {
            root: session.root().to_string(),
        });

        while let Some(url) = session.next_url() {
            match self.fetcher.fetch(url.as_str()).await {
                Ok(content) => {
                    let hrefs = self.extractor.extract(&content);
                    if session.record_success(&url, &hrefs) {
                        let total = session.site_urls().len();
                        info!("{} URLs found, ADDED [{}]", total, url);
                        self.emit(CrawlEvent::Added {
                            url: url.to_string(),
                            total,
                        });
                    }
                }
                Err(e) => {
                    session.record_failure(&url);
                    let total = session.site_urls().len();
                    info!("{} URLs found, DROPPED [{}]: {}", total, url, e);
                    self.emit(CrawlEvent::Dropped {
                        url: url.to_string(),
                        total,
                    });
                }
            }

            if session.check_budget() {
                info!(
                    "Time budget of {}s exhausted for {}, stopping with a partial result",
                    self.time_budget.as_secs(),
                    session.root()
                );
                break;
            }
        }

        let result = session.finish();
        info!(
            "Crawl of {} {} in {:.2}s: {} URLs",
            result.root_url,
            result.outcome,
            result.elapsed_secs(),
            result.len()
        );
        self.emit(CrawlEvent::Finished {
            root: result.root_url.clone(),
            outcome: result.outcome,
            total: result.len(),
        });

        Ok(result)
    }

    fn emit(&self, event: CrawlEvent) {
        if let Some(callback) = &self.progress_callback {
            callback(&event);
        }
    }
}
