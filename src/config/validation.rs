use crate::config::types::{
    Config, CrawlerConfig, OutputConfig, RegionConfig, SpiderConfig, UserAgentConfig,
};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_spider_config(&config.spider)?;
    validate_region_config(&config.region)?;
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates what-to-crawl settings
fn validate_spider_config(config: &SpiderConfig) -> Result<(), ConfigError> {
    validate_http_url("base_url", &config.base_url)?;

    if config.item_limit < 1 {
        return Err(ConfigError::Validation(format!(
            "item_limit must be >= 1, got {}",
            config.item_limit
        )));
    }

    if config.per_page < 1 || config.per_page > 100 {
        return Err(ConfigError::Validation(format!(
            "per_page must be between 1 and 100, got {}",
            config.per_page
        )));
    }

    if let Some(prefix) = &config.product_url_prefix {
        validate_http_url("product_url_prefix", prefix)?;
    }

    Ok(())
}

/// Validates region settings
fn validate_region_config(config: &RegionConfig) -> Result<(), ConfigError> {
    if config.fallback_city_uuid.trim().is_empty() {
        return Err(ConfigError::Validation(
            "fallback_city_uuid cannot be empty".to_string(),
        ));
    }

    if let Some((name, _)) = config.cities.iter().find(|(_, uuid)| uuid.trim().is_empty()) {
        return Err(ConfigError::Validation(format!(
            "city '{}' has an empty uuid",
            name
        )));
    }

    if config.city_cookie.as_deref().is_some_and(|c| c.trim().is_empty()) {
        return Err(ConfigError::Validation(
            "city_cookie cannot be empty when set".to_string(),
        ));
    }

    Ok(())
}

/// Validates transport settings
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.max_concurrent_requests < 1 || config.max_concurrent_requests > 100 {
        return Err(ConfigError::Validation(format!(
            "max_concurrent_requests must be between 1 and 100, got {}",
            config.max_concurrent_requests
        )));
    }

    if config.download_delay > 60_000 {
        return Err(ConfigError::Validation(format!(
            "download_delay must be <= 60000ms, got {}ms",
            config.download_delay
        )));
    }

    if config.request_timeout < 1 {
        return Err(ConfigError::Validation(
            "request_timeout must be >= 1 second".to_string(),
        ));
    }

    Ok(())
}

/// Validates request headers
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.value.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.result_path.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "result_path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates that `value` is an absolute http(s) URL
fn validate_http_url(name: &str, value: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid {} '{}': {}", name, value, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "{} '{}' must use http or https",
            name, value
        )));
    }

    Ok(())
}
