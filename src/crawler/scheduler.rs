//! Scheduler for page fetches and source downloads
//!
//! This module handles:
//! - Global concurrency limiting of page fetches via a semaphore
//! - The randomized politeness delay before each page request
//! - The optional, independent concurrency cap on source downloads

use rand::Rng;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// Bounded pool gating page fetches
#[derive(Debug, Clone)]
pub struct Scheduler {
    /// Semaphore limiting concurrent page fetches
    page_permits: Arc<Semaphore>,

    /// Semaphore limiting concurrent downloads, when capped
    download_permits: Option<Arc<Semaphore>>,

    /// Upper bound of the politeness delay
    max_delay: Duration,
}

impl Scheduler {
    /// Creates a new scheduler
    ///
    /// # Arguments
    ///
    /// * `parallelism` - Maximum concurrent page fetches
    /// * `max_delay` - Upper bound of the random delay before each request
    /// * `max_downloads` - Optional cap on concurrent source downloads
    pub fn new(parallelism: usize, max_delay: Duration, max_downloads: Option<usize>) -> Self {
        Self {
            page_permits: Arc::new(Semaphore::new(parallelism.max(1))),
            download_permits: max_downloads.map(|n| Arc::new(Semaphore::new(n.max(1)))),
            max_delay,
        }
    }

    /// Waits for a page-fetch slot, then for the politeness delay
    ///
    /// The returned permit frees the slot when dropped.
    pub async fn acquire_page_slot(&self) -> Option<OwnedSemaphorePermit> {
        let permit = self.page_permits.clone().acquire_owned().await.ok()?;

        let delay = self.jitter();
        if !delay.is_zero() {
            tracing::trace!("Politeness delay of {:?}", delay);
            tokio::time::sleep(delay).await;
        }

        Some(permit)
    }

    /// Waits for a download slot when downloads are capped
    ///
    /// Returns None immediately when downloads are unbounded.
    pub async fn acquire_download_slot(&self) -> Option<OwnedSemaphorePermit> {
        match &self.download_permits {
            Some(permits) => permits.clone().acquire_owned().await.ok(),
            None => None,
        }
    }

    #[cfg(test)]
    fn available_page_slots(&self) -> usize {
        self.page_permits.available_permits()
    }

    /// Draws a delay uniformly from `[0, max_delay]`
    pub fn jitter(&self) -> Duration {
        let max_ms = u64::try_from(self.max_delay.as_millis()).unwrap_or(u64::MAX);
        if max_ms == 0 {
            return Duration::ZERO;
        }
        Duration::from_millis(rand::thread_rng().gen_range(0..=max_ms))
    }
}
