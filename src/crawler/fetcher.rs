//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building HTTP clients with the configured headers and timeout
//! - Keeping one client per proxy and picking one per request
//! - Error classification

use crate::catalog::FetchRequest;
use crate::config::{CrawlerConfig, UserAgentConfig};
use crate::crawler::proxy;
use crate::CrawlError;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, COOKIE};
use reqwest::{Client, Proxy};
use std::time::Duration;

/// Value of the `Accept` header sent with every request
pub const DEFAULT_ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";

/// Result of a fetch operation
#[derive(Debug)]
pub enum FetchResult {
    /// The server answered with a 2xx status
    Success {
        /// HTTP status code
        status_code: u16,
        /// Response body
        body: String,
    },

    /// The server answered with a non-success status
    HttpError {
        /// The HTTP status code
        status_code: u16,
    },

    /// Network error (connection refused, timeout, etc.)
    NetworkError {
        /// Error description
        error: String,
    },
}

impl FetchResult {
    /// Short description of a failed fetch, for logs
    pub fn failure_reason(&self) -> Option<String> {
        match self {
            Self::Success { .. } => None,
            Self::HttpError { status_code } => Some(format!("HTTP {}", status_code)),
            Self::NetworkError { error } => Some(error.clone()),
        }
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `user_agent` - Identification headers
/// * `timeout` - Per-request timeout
/// * `proxy` - Outgoing proxy, or `None` for direct connections
pub fn build_http_client(
    user_agent: &UserAgentConfig,
    timeout: Duration,
    proxy: Option<Proxy>,
) -> Result<Client, CrawlError> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static(DEFAULT_ACCEPT));
    headers.insert(
        ACCEPT_LANGUAGE,
        HeaderValue::from_str(&user_agent.accept_language)?,
    );

    let mut builder = Client::builder()
        .user_agent(user_agent.value.as_str())
        .default_headers(headers)
        .timeout(timeout)
        .connect_timeout(timeout.min(Duration::from_secs(10)))
        .gzip(true)
        .brotli(true);

    if let Some(proxy) = proxy {
        builder = builder.proxy(proxy);
    }

    Ok(builder.build()?)
}

/// Performs requests, spreading them over the configured proxies
#[derive(Debug, Clone)]
pub struct Fetcher {
    direct: Client,
    proxied: Vec<(String, Client)>,
}

impl Fetcher {
    /// Creates a fetcher with one client per usable proxy
    ///
    /// Proxy entries that reqwest cannot parse are logged and skipped. With no
    /// usable proxies every request goes out directly.
    pub fn new(
        user_agent: &UserAgentConfig,
        crawler: &CrawlerConfig,
        proxies: &[String],
    ) -> Result<Self, CrawlError> {
        let timeout = Duration::from_secs(crawler.request_timeout);
        let direct = build_http_client(user_agent, timeout, None)?;

        let mut proxied = Vec::with_capacity(proxies.len());
        for entry in proxies {
            match Proxy::all(entry.as_str()) {
                Ok(proxy) => {
                    let client = build_http_client(user_agent, timeout, Some(proxy))?;
                    proxied.push((entry.clone(), client));
                }
                Err(e) => tracing::warn!("Skipping invalid proxy {}: {}", entry, e),
            }
        }

        if !proxied.is_empty() {
            tracing::info!("Using {} proxies", proxied.len());
        }

        Ok(Self { direct, proxied })
    }

    /// Number of usable proxies
    pub fn proxy_count(&self) -> usize {
        self.proxied.len()
    }

    fn pick_client(&self) -> (&Client, Option<&str>) {
        match proxy::choose(&self.proxied) {
            Some((name, client)) => (client, Some(name.as_str())),
            None => (&self.direct, None),
        }
    }

    /// Performs one GET request and classifies the outcome
    pub async fn fetch(&self, request: &FetchRequest) -> FetchResult {
        let (client, proxy) = self.pick_client();
        tracing::trace!("GET {} via {}", request.url, proxy.unwrap_or("direct"));

        let mut builder = client.get(request.url.clone());
        if let Some(cookie) = &request.cookie {
            builder = builder.header(COOKIE, cookie.as_str());
        }

        match builder.send().await {
            Ok(response) => {
                let status = response.status();
                if !status.is_success() {
                    return FetchResult::HttpError {
                        status_code: status.as_u16(),
                    };
                }

                match response.text().await {
                    Ok(body) => FetchResult::Success {
                        status_code: status.as_u16(),
                        body,
                    },
                    Err(e) => FetchResult::NetworkError {
                        error: e.to_string(),
                    },
                }
            }
            Err(e) => {
                // Classify error
                if e.is_timeout() {
                    FetchResult::NetworkError {
                        error: "Request timeout".to_string(),
                    }
                } else if e.is_connect() {
                    FetchResult::NetworkError {
                        error: "Connection refused".to_string(),
                    }
                } else {
                    FetchResult::NetworkError {
                        error: e.to_string(),
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_http_client() {
        let client = build_http_client(
            &UserAgentConfig::default(),
            Duration::from_secs(5),
            None,
        );
        assert!(client.is_ok());
    }

    #[test]
    fn test_invalid_accept_language_rejected() {
        let config = UserAgentConfig {
            accept_language: "ru\nRU".to_string(),
            ..UserAgentConfig::default()
        };
        let result = build_http_client(&config, Duration::from_secs(5), None);
        assert!(matches!(result, Err(CrawlError::InvalidHeader(_))));
    }

    #[test]
    fn test_invalid_proxies_are_skipped() {
        let proxies = vec![
            "http://127.0.0.1:3128".to_string(),
            "not a proxy url".to_string(),
        ];
        let fetcher = Fetcher::new(
            &UserAgentConfig::default(),
            &CrawlerConfig::default(),
            &proxies,
        )
        .unwrap();
        assert_eq!(fetcher.proxy_count(), 1);
    }

    #[test]
    fn test_failure_reason() {
        assert_eq!(
            FetchResult::HttpError { status_code: 503 }.failure_reason(),
            Some("HTTP 503".to_string())
        );
        assert!(FetchResult::Success {
            status_code: 200,
            body: String::new()
        }
        .failure_reason()
        .is_none());
    }
}
