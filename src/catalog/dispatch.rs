use crate::catalog::listing::{product_uuid, ListPage};
use crate::catalog::CrawlContext;
use serde_json::Value;

/// One product detail fetch, carrying the list entry it came from
#[derive(Debug, Clone, PartialEq)]
pub struct DetailRequest {
    pub product_uuid: String,

    /// Context of the list page the product was listed on
    pub context: CrawlContext,

    /// The list entry, used when the detail payload lacks a field
    pub fallback: Value,
}

/// Detail requests produced from one list page
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dispatch {
    pub requests: Vec<DetailRequest>,

    /// List entries dropped for lacking an identifier
    pub skipped: usize,
}

/// Emits one detail request per identifiable product on a list page
///
/// Entries without a `uuid` (or that are not objects at all) are counted as
/// skipped. They are not errors.
pub fn dispatch_details(page: &ListPage<'_>, ctx: &CrawlContext) -> Dispatch {
    let mut dispatch = Dispatch::default();

    for summary in page.products() {
        match product_uuid(summary) {
            Some(uuid) => dispatch.requests.push(DetailRequest {
                product_uuid: uuid,
                context: ctx.clone(),
                fallback: summary.clone(),
            }),
            None => {
                tracing::debug!(
                    "Skipping list entry without uuid in {} page {}",
                    ctx.category_slug(),
                    ctx.current_page()
                );
                dispatch.skipped += 1;
            }
        }
    }

    dispatch
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_dispatch_from_array_results() {
        let ctx = CrawlContext::new("city", "vino", 3);
        let payload = json!({
            "results": [
                {"uuid": "p1", "slug": "wine-1"},
                {"name": "no id"},
                {"uuid": "p2"},
                "garbage"
            ]
        });
        let page = ListPage::parse(&payload).unwrap();
        let dispatch = dispatch_details(&page, &ctx);

        assert_eq!(dispatch.skipped, 2);
        let uuids: Vec<&str> = dispatch
            .requests
            .iter()
            .map(|r| r.product_uuid.as_str())
            .collect();
        assert_eq!(uuids, vec!["p1", "p2"]);
        assert_eq!(dispatch.requests[0].fallback["slug"], "wine-1");
        assert_eq!(dispatch.requests[0].context, ctx);
    }

    #[test]
    fn test_dispatch_from_nested_products() {
        let ctx = CrawlContext::new("city", "pivo", 3);
        let payload = json!({"results": {"products": [{"uuid": "x"}], "total_pages": 2}});
        let page = ListPage::parse(&payload).unwrap();
        let dispatch = dispatch_details(&page, &ctx);

        assert_eq!(dispatch.requests.len(), 1);
        assert_eq!(dispatch.requests[0].product_uuid, "x");
        assert_eq!(dispatch.skipped, 0);
    }

    #[test]
    fn test_empty_page() {
        let ctx = CrawlContext::new("city", "pivo", 3);
        let payload = json!({"results": []});
        let page = ListPage::parse(&payload).unwrap();
        assert_eq!(dispatch_details(&page, &ctx), Dispatch::default());
    }
}
