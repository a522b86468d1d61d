use url::Url;

/// Path segments shared by the list and detail endpoints
const PRODUCT_API_PATH: [&str; 3] = ["api", "v1", "product"];

/// Builders for the catalog API endpoints
///
/// All URLs are derived from one base (scheme + host, optionally a path prefix).
#[derive(Debug, Clone)]
pub struct ApiEndpoints {
    base: Url,
}

impl ApiEndpoints {
    /// Creates endpoint builders rooted at `base_url`
    ///
    /// # Errors
    ///
    /// Returns a parse error if `base_url` is not an absolute URL.
    pub fn new(base_url: &str) -> Result<Self, url::ParseError> {
        let mut base = Url::parse(base_url)?;
        if base.cannot_be_a_base() {
            return Err(url::ParseError::RelativeUrlWithCannotBeABaseBase);
        }
        base.set_query(None);
        base.set_fragment(None);
        Ok(Self { base })
    }

    /// `GET {base}/api/v1/product?city_uuid=..&root_category_slug=..&page=..&per_page=..`
    pub fn list_url(&self, city_uuid: &str, category_slug: &str, page: u32, per_page: u32) -> Url {
        let mut url = self.product_api(&[]);
        url.query_pairs_mut()
            .append_pair("city_uuid", city_uuid)
            .append_pair("root_category_slug", category_slug)
            .append_pair("page", &page.to_string())
            .append_pair("per_page", &per_page.to_string());
        url
    }

    /// `GET {base}/api/v1/product/{product_uuid}?city_uuid=..`
    pub fn detail_url(&self, product_uuid: &str, city_uuid: &str) -> Url {
        let mut url = self.product_api(&[product_uuid]);
        url.query_pairs_mut().append_pair("city_uuid", city_uuid);
        url
    }

    fn product_api(&self, extra: &[&str]) -> Url {
        let mut url = self.base.clone();
        // cannot-be-a-base URLs are rejected in new()
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(PRODUCT_API_PATH)
                .extend(extra);
        }
        url
    }
}
