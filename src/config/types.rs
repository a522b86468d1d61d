use serde::Deserialize;
use std::collections::HashMap;
use std::path::PathBuf;

/// Main configuration structure for the crawler
///
/// Every section is optional; an empty file yields the defaults below.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub spider: SpiderConfig,
    #[serde(default)]
    pub region: RegionConfig,
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub proxy: ProxyConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// What to crawl
#[derive(Debug, Clone, Deserialize)]
pub struct SpiderConfig {
    /// Storefront base URL; API endpoints and relative category entries hang off it
    #[serde(rename = "base-url", default = "default_base_url")]
    pub base_url: String,

    /// Text file with one category URL or path per line
    #[serde(rename = "categories-file", default = "default_categories_file")]
    pub categories_file: PathBuf,

    /// Maximum number of products to list per category
    #[serde(rename = "item-limit", default = "default_item_limit")]
    pub item_limit: u32,

    /// Page size requested from the list endpoint
    #[serde(rename = "per-page", default = "default_per_page")]
    pub per_page: u32,

    /// Prefix for product page URLs; defaults to `{base-url}/product/`
    #[serde(rename = "product-url-prefix", default)]
    pub product_url_prefix: Option<String>,
}

/// Which storefront region to crawl as
#[derive(Debug, Clone, Deserialize)]
pub struct RegionConfig {
    /// City name looked up in `cities`
    #[serde(default)]
    pub city: Option<String>,

    /// Value of the `current_city_id` cookie sent with seed requests
    #[serde(rename = "city-cookie", default = "default_city_cookie")]
    pub city_cookie: Option<String>,

    /// City UUID used when the lookup fails
    #[serde(rename = "fallback-city-uuid", default = "default_city_uuid")]
    pub fallback_city_uuid: String,

    /// City name to city UUID
    #[serde(default)]
    pub cities: HashMap<String, String>,
}

/// Transport behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Maximum number of requests in flight
    #[serde(rename = "max-concurrent-requests", default = "default_max_concurrent")]
    pub max_concurrent_requests: u32,

    /// Minimum time between the starts of two requests (milliseconds)
    #[serde(rename = "download-delay", default = "default_download_delay")]
    pub download_delay: u64,

    /// Per-request timeout (seconds)
    #[serde(rename = "request-timeout", default = "default_request_timeout")]
    pub request_timeout: u64,
}

/// Request identification headers
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Full `User-Agent` header value
    #[serde(default = "default_user_agent")]
    pub value: String,

    /// `Accept-Language` header value
    #[serde(rename = "accept-language", default = "default_accept_language")]
    pub accept_language: String,
}

/// Outgoing proxy configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProxyConfig {
    /// File with one proxy URL per line; missing file means direct connections
    #[serde(default)]
    pub file: Option<PathBuf>,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path of the JSON array of records
    #[serde(rename = "result-path", default = "default_result_path")]
    pub result_path: PathBuf,
}

/// Values given on the command line, applied over the file configuration
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub categories_file: Option<PathBuf>,
    pub base_url: Option<String>,
    pub city: Option<String>,
    pub result_path: Option<PathBuf>,
}

impl Config {
    /// Applies command line overrides
    pub fn with_overrides(mut self, overrides: Overrides) -> Self {
        if let Some(path) = overrides.categories_file {
            self.spider.categories_file = path;
        }
        if let Some(base_url) = overrides.base_url {
            self.spider.base_url = base_url;
        }
        if let Some(city) = overrides.city {
            self.region.city = Some(city);
        }
        if let Some(path) = overrides.result_path {
            self.output.result_path = path;
        }
        self
    }
}

impl SpiderConfig {
    /// Product page prefix, derived from the base URL unless configured
    pub fn product_url_prefix(&self) -> String {
        match &self.product_url_prefix {
            Some(prefix) => prefix.clone(),
            None => format!("{}/product/", self.base_url.trim_end_matches('/')),
        }
    }
}

impl RegionConfig {
    /// Resolves the configured city to its UUID
    ///
    /// Names compare case-insensitively. An unknown or missing city resolves
    /// to `fallback_city_uuid`.
    pub fn city_uuid(&self) -> &str {
        let Some(city) = self.city.as_deref() else {
            return &self.fallback_city_uuid;
        };

        let wanted = city.trim().to_lowercase();
        match self
            .cities
            .iter()
            .find(|(name, _)| name.trim().to_lowercase() == wanted)
        {
            Some((_, uuid)) => uuid,
            None => {
                tracing::warn!(
                    "City '{}' not found in region table, using fallback {}",
                    city,
                    self.fallback_city_uuid
                );
                &self.fallback_city_uuid
            }
        }
    }
}

fn default_base_url() -> String {
    "https://alkoteka.com".to_string()
}

fn default_categories_file() -> PathBuf {
    PathBuf::from("categories.txt")
}

fn default_item_limit() -> u32 {
    1000
}

fn default_per_page() -> u32 {
    20
}

fn default_city_cookie() -> Option<String> {
    Some("2".to_string())
}

fn default_city_uuid() -> String {
    "4a70f9e0-46ae-11e7-83ff-00155d026416".to_string()
}

fn default_max_concurrent() -> u32 {
    8
}

fn default_download_delay() -> u64 {
    1000
}

fn default_request_timeout() -> u64 {
    30
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) \
     Chrome/120.0.0.0 Safari/537.36"
        .to_string()
}

fn default_accept_language() -> String {
    "ru-RU,ru;q=0.9,en-US;q=0.8,en;q=0.7".to_string()
}

fn default_result_path() -> PathBuf {
    PathBuf::from("result.json")
}

impl Default for SpiderConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            categories_file: default_categories_file(),
            item_limit: default_item_limit(),
            per_page: default_per_page(),
            product_url_prefix: None,
        }
    }
}

impl Default for RegionConfig {
    fn default() -> Self {
        Self {
            city: None,
            city_cookie: default_city_cookie(),
            fallback_city_uuid: default_city_uuid(),
            cities: HashMap::new(),
        }
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_concurrent_requests: default_max_concurrent(),
            download_delay: default_download_delay(),
            request_timeout: default_request_timeout(),
        }
    }
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            value: default_user_agent(),
            accept_language: default_accept_language(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            result_path: default_result_path(),
        }
    }
}
