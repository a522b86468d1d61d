//! Alkoteka crawler: a catalog API harvester
//!
//! This crate walks the paginated product listing of each configured category,
//! fans out to per-product detail requests, and normalizes every product payload
//! into one canonical record shape.

pub mod catalog;
pub mod config;
pub mod crawler;
pub mod output;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for crawler operations
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Failed to read category file {path}: {source}")]
    CategorySource {
        path: String,
        source: std::io::Error,
    },
}

/// Errors raised while interpreting an API response body
///
/// Both variants end the chain they occurred in (one category's pagination
/// or one product) and nothing else.
#[derive(Debug, Error)]
pub enum ResponseError {
    #[error("Response is not a JSON object: {0}")]
    Decode(String),

    #[error("API reported failure: {0}")]
    Business(String),
}

impl ResponseError {
    /// Short label used in logs and statistics
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Decode(_) => "decode",
            Self::Business(_) => "business",
        }
    }
}

impl From<serde_json::Error> for ResponseError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

/// Result type alias for crawler operations
pub type Result<T> = std::result::Result<T, CrawlError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use catalog::{CanonicalRecord, CategoryCrawlController, CrawlContext, ProductNormalizer};
pub use config::Config;
pub use crawler::{crawl, Coordinator};
pub use output::{CrawlStatistics, RecordSink};
pub use state::ChainState;
pub use url::resolve_slug;
