use crate::normalizer::NormalizedUrl;
use crate::root::RootUrl;
use std::collections::{HashSet, VecDeque};

/// Breadth-first work queue with an at-most-once guarantee.
///
/// `seen` holds every URL that was ever queued or visited, so a URL can enter
/// `queue` only once for the lifetime of the frontier.
#[derive(Debug, Default)]
pub struct Frontier {
    queue: VecDeque<NormalizedUrl>,
    seen: HashSet<NormalizedUrl>,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the root as the first URL to visit.
    pub fn seed(&mut self, root: &RootUrl) -> bool {
        self.enqueue(NormalizedUrl::from(root))
    }

    /// Returns `false` if the URL was already seen.
    pub fn enqueue(&mut self, url: NormalizedUrl) -> bool {
        if !self.seen.insert(url.clone()) {
            return false;
        }
        self.queue.push_back(url);
        true
    }

    pub fn dequeue(&mut self) -> Option<NormalizedUrl> {
        self.queue.pop_front()
    }

    pub fn mark_seen(&mut self, url: &NormalizedUrl) {
        self.seen.insert(url.clone());
    }

    pub fn is_seen(&self, url: &NormalizedUrl) -> bool {
        self.seen.contains(url)
    }

    /// Number of URLs still waiting to be visited.
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn seen_count(&self) -> usize {
        self.seen.len()
    }
}
