use url::Url;

/// Extracts the catalog slug from a URL or a bare path
///
/// Trailing separators are ignored and the last non-empty path segment wins.
/// For absolute URLs only the path is considered, so query strings and
/// fragments never leak into the slug. Percent-escapes are decoded, so the
/// slug is always the raw segment text.
///
/// # Arguments
///
/// * `input` - A category URL (`https://host/catalog/vino`) or path (`/catalog/vino/`)
///
/// # Returns
///
/// * `Some(String)` - The last path segment
/// * `None` - The input is empty or consists only of separators
///
/// # Examples
///
/// ```
/// use alkoteka_crawler::url::resolve_slug;
///
/// assert_eq!(resolve_slug("https://example.com/catalog/vino"), Some("vino".to_string()));
/// assert_eq!(resolve_slug("/catalog/abc/"), Some("abc".to_string()));
/// assert_eq!(resolve_slug(""), None);
/// ```
pub fn resolve_slug(input: &str) -> Option<String> {
    let input = input.trim();

    let path = match Url::parse(input) {
        Ok(url) if url.has_host() => url.path().to_string(),
        _ => input.to_string(),
    };

    let segment = path
        .trim_end_matches('/')
        .split('/')
        .filter(|segment| !segment.is_empty())
        .next_back()?;

    // Url::path() is percent-encoded; the API wants the raw slug
    match urlencoding::decode(segment) {
        Ok(decoded) => Some(decoded.into_owned()),
        Err(_) => Some(segment.to_string()),
    }
}
