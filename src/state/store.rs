use crate::state::PageResult;
use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Synchronized state shared by every page and download task of a run
///
/// Claims are atomic: checking whether a URL was seen and marking it happen
/// inside one critical section, so two discoverers can never both win.
#[derive(Debug, Default)]
pub struct CrawlStore {
    visited_pages: Mutex<HashSet<String>>,
    visited_sources: Mutex<HashSet<String>>,
    results: Mutex<Vec<PageResult>>,
}

/// Locks a mutex, recovering the data if another task panicked while holding it
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl CrawlStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks a page URL as visited; returns false if it already was
    pub fn claim_page(&self, url: &str) -> bool {
        lock(&self.visited_pages).insert(url.to_string())
    }

    /// Marks a source URL as downloaded; returns false if it already was
    pub fn claim_source(&self, url: &str) -> bool {
        lock(&self.visited_sources).insert(url.to_string())
    }

    /// Number of source URLs claimed so far
    pub fn claimed_sources(&self) -> usize {
        lock(&self.visited_sources).len()
    }

    /// Appends a result
    pub fn push(&self, result: PageResult) {
        lock(&self.results).push(result);
    }

    /// Number of results accumulated so far
    pub(crate) fn len(&self) -> usize {
        lock(&self.results).len()
    }

    /// Takes the accumulated results out of the store, sorted by URL
    ///
    /// Entries with an already-seen URL are dropped, so the returned
    /// sequence never repeats a URL.
    pub fn take_sorted_results(&self) -> Vec<PageResult> {
        let mut results = std::mem::take(&mut *lock(&self.results));

        results.sort_by(|a, b| a.url.cmp(&b.url));
        results.dedup_by(|a, b| a.url == b.url);
        results
    }
}
