//! Crawler module: the network side of a crawl
//!
//! This module contains the runtime that drives the catalog controller:
//! - HTTP fetching through an optional proxy pool
//! - Request admission (concurrency limit and politeness delay)
//! - Overall crawl coordination

mod coordinator;
mod fetcher;
pub mod proxy;
mod scheduler;

pub use coordinator::{run_crawl, Coordinator};
pub use fetcher::{build_http_client, FetchResult, Fetcher, DEFAULT_ACCEPT};
pub use scheduler::Scheduler;

use crate::config::Config;
use crate::output::CrawlStatistics;
use crate::CrawlError;

/// Runs a complete crawl operation
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Resolve the category list
/// 2. Build the HTTP clients
/// 3. Walk every category and fetch every listed product
/// 4. Stream the records into the result file
///
/// # Returns
///
/// * `Ok(CrawlStatistics)` - Crawl completed; individual failures are counted
/// * `Err(CrawlError)` - Crawl could not start or the result file failed
pub async fn crawl(config: &Config) -> Result<CrawlStatistics, CrawlError> {
    run_crawl(config).await
}
