//! Alkoteka crawler main entry point
//!
//! This is the command-line interface for the catalog crawler.

use alkoteka_crawler::config::{
    load_categories, load_config_with_hash, load_proxies, validate, Config, Overrides,
};
use alkoteka_crawler::crawler::crawl;
use alkoteka_crawler::output::print_statistics;
use anyhow::Context;
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Configuration file picked up when none is given
const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Alkoteka crawler: a catalog API harvester
///
/// Walks the product listing of every configured category, fetches each
/// product's detail record and writes them all, normalized, to one JSON file.
#[derive(Parser, Debug)]
#[command(name = "alkoteka-crawler")]
#[command(version = "1.0.0")]
#[command(about = "Harvests the Alkoteka product catalog", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (defaults to ./config.toml if present)
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long)]
    dry_run: bool,

    /// Category list file, overriding the configuration
    #[arg(long, value_name = "FILE")]
    categories: Option<PathBuf>,

    /// Storefront base URL, overriding the configuration
    #[arg(long, value_name = "URL")]
    base_url: Option<String>,

    /// City to crawl as, overriding the configuration
    #[arg(long)]
    city: Option<String>,

    /// Result file, overriding the configuration
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = load(&cli)?;

    if cli.dry_run {
        handle_dry_run(&config)
    } else {
        handle_crawl(&config).await
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("alkoteka_crawler=info,warn"),
            1 => EnvFilter::new("alkoteka_crawler=debug,info"),
            2 => EnvFilter::new("alkoteka_crawler=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads the configuration file (if any) and applies command line overrides
fn load(cli: &Cli) -> anyhow::Result<Config> {
    let path = cli.config.clone().or_else(|| {
        let default = PathBuf::from(DEFAULT_CONFIG_PATH);
        default.exists().then_some(default)
    });

    let config = match path {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(&path)
                .with_context(|| format!("failed to load configuration {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => {
            tracing::info!("No configuration file, using defaults");
            Config::default()
        }
    };

    let config = config.with_overrides(Overrides {
        categories_file: cli.categories.clone(),
        base_url: cli.base_url.clone(),
        city: cli.city.clone(),
        result_path: cli.output.clone(),
    });
    validate(&config).context("invalid command line override")?;

    Ok(config)
}

/// Handles the --dry-run mode: validates config and shows what would be crawled
fn handle_dry_run(config: &Config) -> anyhow::Result<()> {
    println!("=== Alkoteka Crawler Dry Run ===\n");

    println!("Spider Configuration:");
    println!("  Base URL: {}", config.spider.base_url);
    println!("  Item limit per category: {}", config.spider.item_limit);
    println!("  Page size: {}", config.spider.per_page);
    println!("  Product URL prefix: {}", config.spider.product_url_prefix());

    println!("\nRegion:");
    println!(
        "  City: {}",
        config.region.city.as_deref().unwrap_or("(fallback)")
    );
    println!("  City UUID: {}", config.region.city_uuid());
    println!(
        "  Region cookie: {}",
        config.region.city_cookie.as_deref().unwrap_or("(none)")
    );

    println!("\nCrawler Configuration:");
    println!(
        "  Max concurrent requests: {}",
        config.crawler.max_concurrent_requests
    );
    println!("  Download delay: {}ms", config.crawler.download_delay);
    println!("  Request timeout: {}s", config.crawler.request_timeout);

    println!("\nUser Agent:");
    println!("  {}", config.user_agent.value);

    let proxies = load_proxies(config.proxy.file.as_deref());
    println!("\nProxies: {}", proxies.len());

    println!("\nOutput:");
    println!("  Result file: {}", config.output.result_path.display());

    let categories = load_categories(&config.spider.categories_file, &config.spider.base_url)?;
    println!(
        "\nCategories ({}, from {}):",
        categories.len(),
        config.spider.categories_file.display()
    );
    for category in &categories {
        println!("  - {} ({})", category.slug, category.url);
    }

    println!("\n✓ Configuration is valid");
    println!(
        "✓ Would start crawling with {} categories",
        categories.len()
    );

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: &Config) -> anyhow::Result<()> {
    let result_path: &Path = &config.output.result_path;

    // Run the crawler
    match crawl(config).await {
        Ok(stats) => {
            tracing::info!("Crawl completed successfully");
            print_statistics(&stats);
            println!("\nResults written to {}", result_path.display());
            Ok(())
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e.into())
        }
    }
}
