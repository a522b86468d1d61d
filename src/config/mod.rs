//! Configuration module
//!
//! This module handles loading, parsing, and validating the TOML configuration
//! file, plus the two line-oriented inputs it points at: the category list and
//! the proxy list.
//!
//! # Example
//!
//! ```no_run
//! use alkoteka_crawler::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("config.toml")).unwrap();
//! println!("Crawling as city {}", config.region.city_uuid());
//! ```

mod categories;
mod parser;
mod proxies;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, CrawlerConfig, OutputConfig, Overrides, ProxyConfig, RegionConfig, SpiderConfig,
    UserAgentConfig,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};

pub use categories::{load_categories, parse_categories, CategorySeed};
pub use proxies::{load_proxies, parse_proxies};
pub use validation::validate;
