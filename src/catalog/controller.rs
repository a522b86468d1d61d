//! Category crawl orchestration, independent of any transport
//!
//! The controller only says which requests to issue and how to read their
//! responses. The crawler runtime performs the requests and feeds the bodies
//! back in.

use crate::catalog::dispatch::{dispatch_details, DetailRequest};
use crate::catalog::listing::ListPage;
use crate::catalog::pagination::{next_step, PaginationStep};
use crate::catalog::{CanonicalRecord, CrawlContext, ProductNormalizer};
use crate::url::ApiEndpoints;
use crate::ResponseError;
use url::Url;

/// Name of the cookie that pins the storefront region
pub const REGION_COOKIE: &str = "current_city_id";

/// A request the runtime should perform
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub url: Url,

    /// Value for the `Cookie` header, if any
    pub cookie: Option<String>,
}

/// Everything learned from one list page
#[derive(Debug, Clone, PartialEq)]
pub struct ListOutcome {
    pub details: Vec<DetailRequest>,

    /// List entries without an identifier
    pub skipped: usize,

    pub step: PaginationStep,
}

/// Drives one category from its seed request to its last list page
#[derive(Debug, Clone)]
pub struct CategoryCrawlController {
    endpoints: ApiEndpoints,
    normalizer: ProductNormalizer,
    per_page: u32,
    region_cookie: Option<String>,
}

impl CategoryCrawlController {
    /// Creates a controller
    ///
    /// # Arguments
    ///
    /// * `endpoints` - API endpoint builders
    /// * `normalizer` - Detail payload normalizer
    /// * `per_page` - Page size requested from the list endpoint
    /// * `region_cookie` - Value of the region cookie sent with seed requests
    pub fn new(
        endpoints: ApiEndpoints,
        normalizer: ProductNormalizer,
        per_page: u32,
        region_cookie: Option<String>,
    ) -> Self {
        Self {
            endpoints,
            normalizer,
            per_page: per_page.max(1),
            region_cookie,
        }
    }

    pub fn per_page(&self) -> u32 {
        self.per_page
    }

    /// Creates the seed context for a category
    pub fn seed(&self, city_uuid: &str, category_slug: &str, item_limit: u32) -> CrawlContext {
        CrawlContext::with_item_limit(city_uuid, category_slug, item_limit, self.per_page)
    }

    /// The list request for a context; seed requests carry the region cookie
    pub fn list_request(&self, ctx: &CrawlContext) -> FetchRequest {
        let cookie = if ctx.is_seed() {
            self.region_cookie
                .as_ref()
                .map(|city_id| format!("{}={}", REGION_COOKIE, city_id))
        } else {
            None
        };

        FetchRequest {
            url: self.endpoints.list_url(
                ctx.city_uuid(),
                ctx.category_slug(),
                ctx.current_page(),
                self.per_page,
            ),
            cookie,
        }
    }

    /// The detail request for one dispatched product
    pub fn detail_request(&self, detail: &DetailRequest) -> FetchRequest {
        FetchRequest {
            url: self
                .endpoints
                .detail_url(&detail.product_uuid, detail.context.city_uuid()),
            cookie: None,
        }
    }

    /// Interprets a list page body
    ///
    /// Detail fan-out and the pagination decision are computed from the same
    /// located page but independently of each other.
    ///
    /// # Errors
    ///
    /// Returns a [`ResponseError`] when the body is undecodable or reports
    /// failure; the category's chain ends there.
    pub fn on_list_response(
        &self,
        ctx: &CrawlContext,
        body: &str,
    ) -> Result<ListOutcome, ResponseError> {
        let payload = ListPage::decode(body)?;
        let page = ListPage::parse(&payload)?;

        let dispatch = dispatch_details(&page, ctx);
        let step = next_step(&page, ctx);

        Ok(ListOutcome {
            details: dispatch.requests,
            skipped: dispatch.skipped,
            step,
        })
    }

    /// Interprets a detail body into a canonical record
    pub fn on_detail_response(
        &self,
        detail: &DetailRequest,
        body: &str,
    ) -> Result<CanonicalRecord, ResponseError> {
        self.normalizer.normalize_body(body, Some(&detail.fallback))
    }
}
