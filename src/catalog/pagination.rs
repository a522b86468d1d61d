//! Per-category pagination decisions
//!
//! Given one decoded list page and the context it was requested with, decide
//! whether the category's chain continues and with which context.

use crate::catalog::fields::{coerce_u64, first_present};
use crate::catalog::listing::ListPage;
use crate::catalog::CrawlContext;
use crate::state::{ChainEnd, ChainState};

/// Page size assumed when neither block reports one
pub const DEFAULT_PER_PAGE: u64 = 20;

/// A pagination lookup over a located list page
pub type PageCandidate = fn(&ListPage<'_>) -> Option<u64>;

/// Where the total page count may be found, highest priority first
pub const TOTAL_PAGES_CANDIDATES: [(&str, PageCandidate); 4] = [
    ("meta.last_page", |page| coerce_u64(page.meta_value("last_page"))),
    ("meta.total_pages", |page| coerce_u64(page.meta_value("total_pages"))),
    ("results.total_pages", |page| coerce_u64(page.results_value("total_pages"))),
    ("computed", computed_total_pages),
];

/// Where the current page number may be found, highest priority first
pub const CURRENT_PAGE_CANDIDATES: [(&str, PageCandidate); 2] = [
    ("meta.current_page", |page| {
        coerce_u64(page.meta_value("current_page")).filter(|p| *p >= 1)
    }),
    ("results.current_page", |page| {
        coerce_u64(page.results_value("current_page")).filter(|p| *p >= 1)
    }),
];

/// Resolved pagination position of one list page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageInfo {
    pub current_page: u64,
    pub total_pages: u64,
    /// Name of the candidate that supplied `total_pages`
    pub total_source: &'static str,
}

/// Outcome of one pagination transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaginationStep {
    /// Request the next list page with this context
    Continue(CrawlContext),

    /// The chain ends here
    Done(ChainEnd),
}

impl PaginationStep {
    pub fn state(&self) -> ChainState {
        match self {
            Self::Continue(_) => ChainState::Paginating,
            Self::Done(end) => ChainState::Done(*end),
        }
    }

    pub fn next_context(&self) -> Option<&CrawlContext> {
        match self {
            Self::Continue(ctx) => Some(ctx),
            Self::Done(_) => None,
        }
    }
}

/// `ceil(total / per_page)`, meta block preferred over the results block
fn computed_total_pages(page: &ListPage<'_>) -> Option<u64> {
    let total = coerce_u64(page.meta_value("total"))
        .or_else(|| coerce_u64(page.results_value("total")))?;

    let per_page = coerce_u64(page.meta_value("per_page"))
        .or_else(|| coerce_u64(page.results_value("per_page")))
        .filter(|n| *n > 0)
        .unwrap_or(DEFAULT_PER_PAGE);

    Some(total.div_ceil(per_page))
}

/// Resolves the current and total page numbers of a list page
///
/// The current page falls back to the page the request was issued for, and
/// never goes below it, so every accepted transition moves strictly forward.
pub fn page_info(page: &ListPage<'_>, ctx: &CrawlContext) -> PageInfo {
    let requested = u64::from(ctx.current_page());

    let current_page = first_present(page, &CURRENT_PAGE_CANDIDATES)
        .map_or(requested, |(_, current)| current.max(requested));

    let (total_source, total_pages) =
        first_present(page, &TOTAL_PAGES_CANDIDATES).unwrap_or(("default", 1));

    PageInfo {
        current_page,
        total_pages,
        total_source,
    }
}

/// Decides the next step of a category's pagination chain
///
/// A next page is requested iff `current_page < total_pages` and
/// `current_page < max_pages`.
pub fn next_step(page: &ListPage<'_>, ctx: &CrawlContext) -> PaginationStep {
    let info = page_info(page, ctx);
    let max_pages = u64::from(ctx.max_pages());

    if info.current_page >= max_pages {
        tracing::debug!(
            "Category {} reached page limit {} (api total {} from {})",
            ctx.category_slug(),
            max_pages,
            info.total_pages,
            info.total_source
        );
        return PaginationStep::Done(ChainEnd::PageLimit);
    }

    if info.current_page >= info.total_pages {
        tracing::debug!(
            "Category {} finished at page {}/{} ({})",
            ctx.category_slug(),
            info.current_page,
            info.total_pages,
            info.total_source
        );
        return PaginationStep::Done(ChainEnd::LastPage);
    }

    // current_page < max_pages <= u32::MAX here
    PaginationStep::Continue(ctx.next_page(info.current_page as u32))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn step(payload: Value, ctx: &CrawlContext) -> PaginationStep {
        let page = ListPage::parse(&payload).unwrap();
        next_step(&page, ctx)
    }

    fn info(payload: Value, ctx: &CrawlContext) -> PageInfo {
        let page = ListPage::parse(&payload).unwrap();
        page_info(&page, ctx)
    }

    #[test]
    fn test_candidate_tables_resolve_over_borrowed_page() {
        let payload = json!({
            "meta": {"current_page": 2, "total_pages": 7},
            "results": {"products": []}
        });
        let page = ListPage::parse(&payload).unwrap();

        assert_eq!(
            first_present(&page, &TOTAL_PAGES_CANDIDATES),
            Some(("meta.total_pages", 7))
        );
        assert_eq!(
            first_present(&page, &CURRENT_PAGE_CANDIDATES),
            Some(("meta.current_page", 2))
        );
    }

    #[test]
    fn test_meta_last_page_wins() {
        let ctx = CrawlContext::new("c", "vino", 50);
        let info = info(
            json!({
                "results": [],
                "meta": {"last_page": 3, "total_pages": 7, "total": 500},
                "total_pages": 9
            }),
            &ctx,
        );
        assert_eq!(info.total_pages, 3);
        assert_eq!(info.total_source, "meta.last_page");
    }

    #[test]
    fn test_meta_total_pages_second() {
        let ctx = CrawlContext::new("c", "vino", 50);
        let info = info(
            json!({"results": [], "meta": {"total_pages": "7"}, "total_pages": 9}),
            &ctx,
        );
        assert_eq!(info.total_pages, 7);
        assert_eq!(info.total_source, "meta.total_pages");
    }

    #[test]
    fn test_results_block_total_pages_third() {
        let ctx = CrawlContext::new("c", "vino", 50);
        let info = info(
            json!({"results": {"products": [], "total_pages": 4}, "meta": {"total": 1000}}),
            &ctx,
        );
        assert_eq!(info.total_pages, 4);
        assert_eq!(info.total_source, "results.total_pages");
    }

    #[test]
    fn test_computed_from_totals() {
        let ctx = CrawlContext::new("c", "vino", 50);
        let info = info(
            json!({"results": {"products": [], "total": 45, "per_page": 10}}),
            &ctx,
        );
        assert_eq!(info.total_pages, 5);
        assert_eq!(info.total_source, "computed");
    }

    #[test]
    fn test_computed_prefers_meta_and_defaults_per_page() {
        let ctx = CrawlContext::new("c", "vino", 50);
        let info = info(
            json!({"results": {"products": [], "total": 1000}, "meta": {"total": "41"}}),
            &ctx,
        );
        // 41 items at the default 20 per page
        assert_eq!(info.total_pages, 3);
    }

    #[test]
    fn test_zero_per_page_uses_default() {
        let ctx = CrawlContext::new("c", "vino", 50);
        let info = info(json!({"meta": {"total": 40, "per_page": 0}}), &ctx);
        assert_eq!(info.total_pages, 2);
    }

    #[test]
    fn test_unresolved_total_is_single_page() {
        let ctx = CrawlContext::new("c", "vino", 50);
        let info = info(json!({"results": [{"uuid": "a"}]}), &ctx);
        assert_eq!(info.total_pages, 1);
        assert_eq!(info.total_source, "default");
        assert_eq!(
            step(json!({"results": [{"uuid": "a"}]}), &ctx),
            PaginationStep::Done(ChainEnd::LastPage)
        );
    }

    #[test]
    fn test_current_page_resolution() {
        let ctx = CrawlContext::new("c", "vino", 50);
        assert_eq!(info(json!({"meta": {"current_page": 2}}), &ctx).current_page, 2);
        assert_eq!(
            info(json!({"results": {"current_page": "3"}}), &ctx).current_page,
            3
        );
        assert_eq!(info(json!({}), &ctx).current_page, 1);

        let third = ctx.next_page(2);
        assert_eq!(info(json!({}), &third).current_page, 3);
    }

    #[test]
    fn test_current_page_never_moves_backwards() {
        let ctx = CrawlContext::new("c", "vino", 50).next_page(4);
        let info = info(json!({"meta": {"current_page": 1, "last_page": 9}}), &ctx);
        assert_eq!(info.current_page, 5);
    }

    #[test]
    fn test_continue_emits_next_page() {
        let ctx = CrawlContext::new("city", "vino", 10);
        let next = step(json!({"meta": {"current_page": 1, "last_page": 3}}), &ctx);
        let expected = ctx.next_page(1);
        assert_eq!(next, PaginationStep::Continue(expected));
        assert_eq!(next.state(), ChainState::Paginating);
        assert_eq!(next.next_context().unwrap().current_page(), 2);
        assert_eq!(next.next_context().unwrap().city_uuid(), "city");
    }

    #[test]
    fn test_stops_on_last_page() {
        let ctx = CrawlContext::new("c", "vino", 10).next_page(2);
        assert_eq!(
            step(json!({"meta": {"current_page": 3, "last_page": 3}}), &ctx),
            PaginationStep::Done(ChainEnd::LastPage)
        );
    }

    #[test]
    fn test_stops_at_page_limit() {
        let ctx = CrawlContext::new("c", "vino", 2).next_page(1);
        let result = step(json!({"meta": {"current_page": 2, "last_page": 30}}), &ctx);
        assert_eq!(result, PaginationStep::Done(ChainEnd::PageLimit));
        assert!(result.state().is_terminal());
    }

    #[test]
    fn test_never_continues_past_either_bound() {
        for max_pages in 1..6u32 {
            for total in 0..6u64 {
                let mut ctx = CrawlContext::new("c", "s", max_pages);
                let mut requested = 1;
                loop {
                    let payload = json!({"meta": {"last_page": total}});
                    match step(payload, &ctx) {
                        PaginationStep::Continue(next) => {
                            let current = u64::from(ctx.current_page());
                            assert!(current < total);
                            assert!(current < u64::from(max_pages));
                            ctx = next;
                            requested += 1;
                        }
                        PaginationStep::Done(_) => break,
                    }
                }
                let expected = total.clamp(1, u64::from(max_pages));
                assert_eq!(requested, expected, "max_pages={} total={}", max_pages, total);
            }
        }
    }
}
