//! Catalog module: pagination, fan-out and product normalization
//!
//! Everything in here is pure. It consumes response bodies and produces
//! request descriptions and records; the crawler module owns the network.
//!
//! # Components
//!
//! - `CategoryCrawlController`: seeds categories and routes responses
//! - `pagination`: decides whether a category's chain continues
//! - `dispatch_details`: one detail request per listed product
//! - `ProductNormalizer`: detail payload to `CanonicalRecord`

mod context;
mod controller;
mod dispatch;
pub mod fields;
mod listing;
mod normalize;
pub mod pagination;
mod record;

pub use context::{max_pages_for, CrawlContext};
pub use controller::{CategoryCrawlController, FetchRequest, ListOutcome, REGION_COOKIE};
pub use dispatch::{dispatch_details, DetailRequest, Dispatch};
pub use listing::{product_uuid, ListPage};
pub use normalize::{
    compose_title, sale_tag, section, spec_value, ProductNormalizer, DEFAULT_PRODUCT_URL_PREFIX,
    KNOWN_SPEC_KEYS, MAX_SECTION_DEPTH,
};
pub use pagination::{next_step, page_info, PageInfo, PaginationStep};
pub use record::{Assets, CanonicalRecord, MarketingTag, PriceData, Stock, DESCRIPTION_KEY};
