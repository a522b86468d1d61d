//! Proxy list loading

use std::path::Path;

/// Reads the proxy list, one proxy URL per line
///
/// Blank lines and `#` comments are ignored. No file configured, or a file
/// that cannot be read, means direct connections.
pub fn load_proxies(path: Option<&Path>) -> Vec<String> {
    let Some(path) = path else {
        return Vec::new();
    };

    match std::fs::read_to_string(path) {
        Ok(content) => parse_proxies(&content),
        Err(e) => {
            tracing::warn!(
                "Proxy file {} not readable ({}), using direct connections",
                path.display(),
                e
            );
            Vec::new()
        }
    }
}

/// Extracts proxy entries from already-read text
pub fn parse_proxies(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}
