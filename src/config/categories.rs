//! Category source file loading

use crate::url::{resolve_category_entry, resolve_slug};
use crate::ConfigError;
use std::path::Path;

/// One category to crawl, resolved from a line of the category file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategorySeed {
    /// Absolute category URL
    pub url: String,
    /// Final non-empty path segment of `url`
    pub slug: String,
}

/// Reads the category file and resolves every entry
///
/// Blank lines are ignored. Entries without a usable slug are logged and
/// skipped. An unreadable file is fatal: there is nothing to crawl without it.
pub fn load_categories(path: &Path, base_url: &str) -> Result<Vec<CategorySeed>, ConfigError> {
    let content =
        std::fs::read_to_string(path).map_err(|source| ConfigError::CategorySource {
            path: path.display().to_string(),
            source,
        })?;

    Ok(parse_categories(&content, base_url))
}

/// Resolves category entries from already-read text
pub fn parse_categories(content: &str, base_url: &str) -> Vec<CategorySeed> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(|line| {
            let url = resolve_category_entry(line, base_url);
            match resolve_slug(&url) {
                Some(slug) => Some(CategorySeed { url, slug }),
                None => {
                    tracing::warn!("Skipping category entry without a slug: {}", line);
                    None
                }
            }
        })
        .collect()
}
