//! Per-run crawl counters

use crate::state::ChainEnd;
use std::collections::BTreeMap;
use std::time::Duration;

/// Counters collected over one crawl run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CrawlStatistics {
    /// Categories that produced a seed request
    pub categories_seeded: u64,

    /// List pages requested
    pub list_pages: u64,

    /// Detail requests issued
    pub detail_requests: u64,

    /// Records written to the sink
    pub records: u64,

    /// List entries without an identifier
    pub skipped_items: u64,

    /// Responses that were not a JSON object
    pub decode_failures: u64,

    /// Responses that reported failure
    pub business_failures: u64,

    /// Requests that failed at the HTTP or network level
    pub transport_failures: u64,

    /// Pagination chains by the reason they stopped
    pub chains_ended: BTreeMap<ChainEnd, u64>,

    /// Wall time of the run
    pub elapsed: Duration,
}

impl CrawlStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the end of one category's pagination chain
    pub fn record_chain_end(&mut self, end: ChainEnd) {
        *self.chains_ended.entry(end).or_insert(0) += 1;
    }

    /// Number of chains that stopped for the given reason
    pub fn chains_ended_by(&self, end: ChainEnd) -> u64 {
        self.chains_ended.get(&end).copied().unwrap_or(0)
    }

    /// Total failed responses of any kind
    pub fn total_failures(&self) -> u64 {
        self.decode_failures + self.business_failures + self.transport_failures
    }

    /// Share of detail requests that produced a record, as a percentage
    pub fn detail_success_rate(&self) -> f64 {
        if self.detail_requests == 0 {
            return 0.0;
        }
        (self.records as f64 / self.detail_requests as f64) * 100.0
    }
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &CrawlStatistics) {
    println!("=== Crawl Statistics ===\n");

    println!("Overview:");
    println!("  Categories seeded: {}", stats.categories_seeded);
    println!("  List pages fetched: {}", stats.list_pages);
    println!("  Detail requests: {}", stats.detail_requests);
    println!("  Records written: {}", stats.records);
    println!("  Skipped list entries: {}", stats.skipped_items);
    println!("  Elapsed: {:.1}s", stats.elapsed.as_secs_f64());
    println!();

    if stats.total_failures() > 0 {
        println!("Failures:");
        println!("  Decode: {}", stats.decode_failures);
        println!("  Business: {}", stats.business_failures);
        println!("  Transport: {}", stats.transport_failures);
        println!();
    }

    println!("Category chains:");
    for end in ChainEnd::all() {
        let count = stats.chains_ended_by(end);
        if count > 0 {
            println!("  {}: {}", end, count);
        }
    }
    println!();

    println!(
        "Success Rate: {:.1}% ({} / {} products normalized)",
        stats.detail_success_rate(),
        stats.records,
        stats.detail_requests
    );
}
