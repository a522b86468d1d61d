//! URL handling module
//!
//! This module provides slug extraction, category entry resolution against the
//! configured base URL, and the catalog API endpoint builders.

mod endpoints;
mod slug;

pub use endpoints::ApiEndpoints;
pub use slug::resolve_slug;

/// Resolves one category file entry into an absolute URL
///
/// Entries that already carry a scheme (anything starting with `http`) are used
/// as-is. Everything else is treated as a path relative to `base_url`, with
/// exactly one `/` placed between the two.
///
/// # Examples
///
/// ```
/// use alkoteka_crawler::url::resolve_category_entry;
///
/// assert_eq!(
///     resolve_category_entry("/catalog/vino", "https://alkoteka.com/"),
///     "https://alkoteka.com/catalog/vino"
/// );
/// assert_eq!(
///     resolve_category_entry("https://other.example/catalog/pivo", "https://alkoteka.com"),
///     "https://other.example/catalog/pivo"
/// );
/// ```
pub fn resolve_category_entry(entry: &str, base_url: &str) -> String {
    let entry = entry.trim();
    if entry.starts_with("http") {
        return entry.to_string();
    }

    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        entry.trim_start_matches('/')
    )
}
