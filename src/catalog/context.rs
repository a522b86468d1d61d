/// Per-category crawl state threaded through every list and detail request
///
/// A context is never mutated. Advancing pagination produces a new value via
/// [`CrawlContext::next_page`], so a context captured by an in-flight request
/// always describes exactly the page that request was issued for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlContext {
    city_uuid: String,
    category_slug: String,
    current_page: u32,
    max_pages: u32,
}

impl CrawlContext {
    /// Creates the seed context (page 1) for one category
    ///
    /// `max_pages` below 1 is raised to 1: every category gets at least its
    /// first page.
    pub fn new(city_uuid: impl Into<String>, category_slug: impl Into<String>, max_pages: u32) -> Self {
        Self {
            city_uuid: city_uuid.into(),
            category_slug: category_slug.into(),
            current_page: 1,
            max_pages: max_pages.max(1),
        }
    }

    /// Creates the seed context with `max_pages = ceil(item_limit / page_size)`
    pub fn with_item_limit(
        city_uuid: impl Into<String>,
        category_slug: impl Into<String>,
        item_limit: u32,
        page_size: u32,
    ) -> Self {
        Self::new(city_uuid, category_slug, max_pages_for(item_limit, page_size))
    }

    /// Returns the context for the page following `page`
    pub fn next_page(&self, page: u32) -> Self {
        Self {
            current_page: page.saturating_add(1),
            ..self.clone()
        }
    }

    pub fn city_uuid(&self) -> &str {
        &self.city_uuid
    }

    pub fn category_slug(&self) -> &str {
        &self.category_slug
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn max_pages(&self) -> u32 {
        self.max_pages
    }

    /// True for the seed request of a category
    pub fn is_seed(&self) -> bool {
        self.current_page == 1
    }
}

/// Number of list pages needed to cover `item_limit` items, at least 1
pub fn max_pages_for(item_limit: u32, page_size: u32) -> u32 {
    if page_size == 0 {
        return 1;
    }
    item_limit.div_ceil(page_size).max(1)
}
