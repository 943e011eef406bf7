use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// How a crawl ended. Both are successful terminations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CrawlOutcome {
    /// The frontier ran dry.
    Completed,
    /// The time budget ran out; the URL set is partial.
    Aborted,
}

impl fmt::Display for CrawlOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CrawlOutcome::Completed => f.write_str("completed"),
            CrawlOutcome::Aborted => f.write_str("aborted"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlResult {
    pub root_url: String,
    /// Successfully fetched site URLs in discovery order, root excluded.
    pub urls: IndexSet<String>,
    pub elapsed: Duration,
    pub outcome: CrawlOutcome,
    pub pages_fetched: usize,
    pub fetch_failures: usize,
}

impl CrawlResult {
    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }

    pub fn is_aborted(&self) -> bool {
        self.outcome == CrawlOutcome::Aborted
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }

    pub fn contains(&self, url: &str) -> bool {
        self.urls.contains(url)
    }
}
