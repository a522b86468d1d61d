//! Request admission: global concurrency and politeness delay
//!
//! Every request, list or detail, passes through the same scheduler:
//! - Global concurrency limiting via a semaphore
//! - A minimum delay between the starts of two requests

use crate::config::CrawlerConfig;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, OwnedSemaphorePermit, Semaphore};
use tokio::time::Instant;

/// Shared admission gate for all outgoing requests
///
/// Cloning is cheap; clones share the same semaphore and delay slot.
#[derive(Debug, Clone)]
pub struct Scheduler {
    /// Global semaphore for limiting concurrent fetches
    semaphore: Arc<Semaphore>,

    /// Earliest instant the next request may start
    next_slot: Arc<Mutex<Instant>>,

    /// Minimum time between request starts
    delay: Duration,
}

impl Scheduler {
    /// Creates a scheduler from the crawler configuration
    pub fn new(config: &CrawlerConfig) -> Self {
        Self::with_limits(
            config.max_concurrent_requests as usize,
            Duration::from_millis(config.download_delay),
        )
    }

    /// Creates a scheduler with explicit limits
    pub fn with_limits(max_concurrent: usize, delay: Duration) -> Self {
        Self {
            semaphore: Arc::new(Semaphore::new(max_concurrent.max(1))),
            next_slot: Arc::new(Mutex::new(Instant::now())),
            delay,
        }
    }

    /// Waits until a request may start
    ///
    /// The request must hold the returned permit until it completes. Returns
    /// `None` only if the semaphore has been closed.
    pub async fn acquire(&self) -> Option<OwnedSemaphorePermit> {
        let permit = self.semaphore.clone().acquire_owned().await.ok()?;

        if !self.delay.is_zero() {
            let start = {
                let mut slot = self.next_slot.lock().await;
                let start = (*slot).max(Instant::now());
                *slot = start + self.delay;
                start
            };
            tokio::time::sleep_until(start).await;
        }

        Some(permit)
    }

    /// Number of requests that could start right now, ignoring the delay
    pub fn available_permits(&self) -> usize {
        self.semaphore.available_permits()
    }

    /// Minimum time between request starts
    pub fn delay(&self) -> Duration {
        self.delay
    }
}
