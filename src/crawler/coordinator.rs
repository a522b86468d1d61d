//! Crawler coordinator - main crawl orchestration logic
//!
//! This module runs the category controller over the network:
//! - Seeding one list request per category
//! - Fanning each list page out into detail requests
//! - Issuing at most one follow-up list request per list page
//! - Writing normalized records to the sink as they complete

use crate::catalog::{
    CategoryCrawlController, CrawlContext, DetailRequest, FetchRequest, PaginationStep,
    ProductNormalizer,
};
use crate::config::{load_categories, load_proxies, CategorySeed, Config};
use crate::crawler::fetcher::{FetchResult, Fetcher};
use crate::crawler::scheduler::Scheduler;
use crate::output::{CrawlStatistics, JsonArraySink, RecordSink};
use crate::state::ChainEnd;
use crate::url::ApiEndpoints;
use crate::{CrawlError, ResponseError};
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinSet;

/// What a finished fetch task hands back to the coordinator
enum TaskOutput {
    List {
        ctx: CrawlContext,
        result: FetchResult,
    },
    Detail {
        detail: DetailRequest,
        result: FetchResult,
    },
}

/// Main crawler coordinator structure
///
/// Every request runs as its own task in a `JoinSet`. Responses are handled
/// on the coordinator, one at a time, in completion order. A category's next
/// list page is only spawned from the handler of its current list page, so
/// each category is a serial chain while detail requests complete freely.
pub struct Coordinator<S: RecordSink> {
    controller: Arc<CategoryCrawlController>,
    fetcher: Arc<Fetcher>,
    scheduler: Scheduler,
    city_uuid: String,
    item_limit: u32,
    sink: S,
    stats: CrawlStatistics,
    tasks: JoinSet<TaskOutput>,
}

impl<S: RecordSink> Coordinator<S> {
    /// Creates a new coordinator instance
    ///
    /// # Arguments
    ///
    /// * `config` - The crawler configuration
    /// * `sink` - Destination for normalized records
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Successfully created coordinator
    /// * `Err(CrawlError)` - Base URL or HTTP client setup failed
    pub fn new(config: &Config, sink: S) -> Result<Self, CrawlError> {
        let endpoints = ApiEndpoints::new(&config.spider.base_url)?;
        let normalizer = ProductNormalizer::new(config.spider.product_url_prefix());
        let controller = CategoryCrawlController::new(
            endpoints,
            normalizer,
            config.spider.per_page,
            config.region.city_cookie.clone(),
        );

        let proxies = load_proxies(config.proxy.file.as_deref());
        let fetcher = Fetcher::new(&config.user_agent, &config.crawler, &proxies)?;
        let scheduler = Scheduler::new(&config.crawler);

        Ok(Self {
            controller: Arc::new(controller),
            fetcher: Arc::new(fetcher),
            scheduler,
            city_uuid: config.region.city_uuid().to_string(),
            item_limit: config.spider.item_limit,
            sink,
            stats: CrawlStatistics::new(),
            tasks: JoinSet::new(),
        })
    }

    /// Crawls every category until all chains and detail requests are done
    ///
    /// Individual request and response failures are logged and counted; only
    /// a failing sink aborts the run.
    pub async fn run(&mut self, categories: &[CategorySeed]) -> Result<CrawlStatistics, CrawlError> {
        let start_time = Instant::now();
        tracing::info!(
            "Starting crawl of {} categories as city {}",
            categories.len(),
            self.city_uuid
        );

        for category in categories {
            let ctx = self
                .controller
                .seed(&self.city_uuid, &category.slug, self.item_limit);
            tracing::debug!(
                "Seeding category {} ({}), up to {} pages",
                category.slug,
                category.url,
                ctx.max_pages()
            );
            self.stats.categories_seeded += 1;
            self.spawn_list(ctx);
        }

        while let Some(joined) = self.tasks.join_next().await {
            match joined {
                Ok(TaskOutput::List { ctx, result }) => self.handle_list(ctx, result),
                Ok(TaskOutput::Detail { detail, result }) => self.handle_detail(detail, result)?,
                Err(e) => tracing::error!("Fetch task failed: {}", e),
            }
        }

        self.sink.finish()?;
        self.stats.elapsed = start_time.elapsed();

        tracing::info!(
            "Crawl completed: {} records from {} categories in {:?}",
            self.stats.records,
            self.stats.categories_seeded,
            self.stats.elapsed
        );

        Ok(self.stats.clone())
    }

    /// Statistics collected so far
    pub fn statistics(&self) -> &CrawlStatistics {
        &self.stats
    }

    /// Consumes the coordinator and returns its sink
    pub fn into_sink(self) -> S {
        self.sink
    }

    fn spawn_list(&mut self, ctx: CrawlContext) {
        let request = self.controller.list_request(&ctx);
        self.stats.list_pages += 1;

        let fetcher = Arc::clone(&self.fetcher);
        let scheduler = self.scheduler.clone();
        self.tasks.spawn(async move {
            let result = fetch_scheduled(&fetcher, &scheduler, &request).await;
            TaskOutput::List { ctx, result }
        });
    }

    fn spawn_detail(&mut self, detail: DetailRequest) {
        let request = self.controller.detail_request(&detail);
        self.stats.detail_requests += 1;

        let fetcher = Arc::clone(&self.fetcher);
        let scheduler = self.scheduler.clone();
        self.tasks.spawn(async move {
            let result = fetch_scheduled(&fetcher, &scheduler, &request).await;
            TaskOutput::Detail { detail, result }
        });
    }

    fn handle_list(&mut self, ctx: CrawlContext, result: FetchResult) {
        let body = match result {
            FetchResult::Success { body, .. } => body,
            failed => {
                self.stats.transport_failures += 1;
                tracing::warn!(
                    "List page {} of {} failed: {}",
                    ctx.current_page(),
                    ctx.category_slug(),
                    failed.failure_reason().unwrap_or_default()
                );
                self.end_chain(&ctx, ChainEnd::Transport);
                return;
            }
        };

        let outcome = match self.controller.on_list_response(&ctx, &body) {
            Ok(outcome) => outcome,
            Err(e) => {
                self.count_response_error(&e);
                tracing::warn!(
                    "List page {} of {} rejected: {}",
                    ctx.current_page(),
                    ctx.category_slug(),
                    e
                );
                self.end_chain(&ctx, ChainEnd::from(&e));
                return;
            }
        };

        self.stats.skipped_items += outcome.skipped as u64;
        tracing::debug!(
            "List page {} of {}: {} products, {} skipped",
            ctx.current_page(),
            ctx.category_slug(),
            outcome.details.len(),
            outcome.skipped
        );

        for detail in outcome.details {
            self.spawn_detail(detail);
        }

        match outcome.step {
            PaginationStep::Continue(next) => self.spawn_list(next),
            PaginationStep::Done(end) => self.end_chain(&ctx, end),
        }
    }

    fn handle_detail(&mut self, detail: DetailRequest, result: FetchResult) -> Result<(), CrawlError> {
        let body = match result {
            FetchResult::Success { body, .. } => body,
            failed => {
                self.stats.transport_failures += 1;
                tracing::warn!(
                    "Product {} failed: {}",
                    detail.product_uuid,
                    failed.failure_reason().unwrap_or_default()
                );
                return Ok(());
            }
        };

        match self.controller.on_detail_response(&detail, &body) {
            Ok(record) => {
                self.sink.write_record(&record)?;
                self.stats.records += 1;

                if self.stats.records % 50 == 0 {
                    tracing::info!(
                        "Progress: {} records written, {} requests in flight",
                        self.stats.records,
                        self.tasks.len()
                    );
                }
            }
            Err(e) => {
                self.count_response_error(&e);
                tracing::warn!("Product {} dropped: {}", detail.product_uuid, e);
            }
        }

        Ok(())
    }

    fn count_response_error(&mut self, err: &ResponseError) {
        match err {
            ResponseError::Decode(_) => self.stats.decode_failures += 1,
            ResponseError::Business(_) => self.stats.business_failures += 1,
        }
    }

    fn end_chain(&mut self, ctx: &CrawlContext, end: ChainEnd) {
        self.stats.record_chain_end(end);
        if end.is_failure() {
            tracing::warn!(
                "Category {} stopped at page {}: {}",
                ctx.category_slug(),
                ctx.current_page(),
                end
            );
        } else {
            tracing::info!(
                "Category {} finished at page {}: {}",
                ctx.category_slug(),
                ctx.current_page(),
                end
            );
        }
    }
}

/// Waits for admission, then performs the request
async fn fetch_scheduled(
    fetcher: &Fetcher,
    scheduler: &Scheduler,
    request: &FetchRequest,
) -> FetchResult {
    let Some(_permit) = scheduler.acquire().await else {
        return FetchResult::NetworkError {
            error: "request scheduler closed".to_string(),
        };
    };
    fetcher.fetch(request).await
}

/// Runs the main crawl operation
///
/// This function orchestrates the entire crawl process:
///
/// 1. Read and resolve the category file (fatal if unreadable)
/// 2. Create the result file
/// 3. Build the HTTP clients and scheduler
/// 4. Crawl every category to completion
/// 5. Close the result file
///
/// # Example
///
/// ```no_run
/// use alkoteka_crawler::config::load_config;
/// use alkoteka_crawler::crawler::run_crawl;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("config.toml"))?;
/// let stats = run_crawl(&config).await?;
/// println!("{} records", stats.records);
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: &Config) -> Result<CrawlStatistics, CrawlError> {
    let categories = load_categories(&config.spider.categories_file, &config.spider.base_url)?;
    if categories.is_empty() {
        tracing::warn!(
            "No categories found in {}",
            config.spider.categories_file.display()
        );
    }

    let sink = JsonArraySink::create(&config.output.result_path)?;
    let mut coordinator = Coordinator::new(config, sink)?;
    coordinator.run(&categories).await
}
