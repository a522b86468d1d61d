//! Output module for crawl results
//!
//! This module handles:
//! - Streaming normalized records into the result file
//! - Recording crawl statistics
//! - Checking the structure of a finished result file

mod json;
pub mod stats;
mod traits;
pub mod validate;

pub use json::JsonArraySink;
pub use stats::{print_statistics, CrawlStatistics};
pub use traits::{OutputError, OutputResult, RecordSink};
pub use validate::{validate_file, validate_records, ValidationError, ValidationReport};
