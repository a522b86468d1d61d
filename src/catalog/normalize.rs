//! Product payload normalization
//!
//! Turns one detail response into a [`CanonicalRecord`]. Every field has a
//! defined fallback, so once the envelope check passes normalization cannot
//! fail, whatever shape the individual fields arrive in.

use crate::catalog::fields::{
    coerce_count, coerce_f64, coerce_string, field, is_truthy, object_field, str_field,
    string_or_empty, Object,
};
use crate::catalog::record::{
    Assets, CanonicalRecord, MarketingTag, PriceData, Stock, DESCRIPTION_KEY,
};
use crate::ResponseError;
use serde_json::Value;
use std::collections::BTreeMap;

/// Product specification keys lifted into metadata when present
pub const KNOWN_SPEC_KEYS: [&str; 6] = ["country", "region", "strength", "sugar", "grape", "color"];

/// Upper bound on category `parent` links followed for one product
pub const MAX_SECTION_DEPTH: usize = 32;

/// Default public product page prefix
pub const DEFAULT_PRODUCT_URL_PREFIX: &str = "https://alkoteka.com/product/";

/// Converts raw product payloads into canonical records
#[derive(Debug, Clone)]
pub struct ProductNormalizer {
    url_prefix: String,
}

impl Default for ProductNormalizer {
    fn default() -> Self {
        Self::new(DEFAULT_PRODUCT_URL_PREFIX)
    }
}

impl ProductNormalizer {
    /// Creates a normalizer building product URLs as `url_prefix + slug`
    pub fn new(url_prefix: impl Into<String>) -> Self {
        Self {
            url_prefix: url_prefix.into(),
        }
    }

    pub fn url_prefix(&self) -> &str {
        &self.url_prefix
    }

    /// Normalizes a raw detail body, stamping the current time
    ///
    /// # Errors
    ///
    /// * [`ResponseError::Decode`] - the body is not a JSON object
    /// * [`ResponseError::Business`] - `success` is not truthy, or `results` is
    ///   missing, not an object, or empty
    pub fn normalize_body(
        &self,
        body: &str,
        fallback: Option<&Value>,
    ) -> Result<CanonicalRecord, ResponseError> {
        let payload: Value = serde_json::from_str(body)?;
        self.normalize(&payload, fallback)
    }

    /// Normalizes a decoded detail payload, stamping the current time
    pub fn normalize(
        &self,
        payload: &Value,
        fallback: Option<&Value>,
    ) -> Result<CanonicalRecord, ResponseError> {
        self.normalize_at(payload, fallback, chrono::Utc::now().timestamp())
    }

    /// Normalizes a decoded detail payload with an explicit timestamp
    pub fn normalize_at(
        &self,
        payload: &Value,
        fallback: Option<&Value>,
        timestamp: i64,
    ) -> Result<CanonicalRecord, ResponseError> {
        let results = detail_results(payload)?;

        let slug = results
            .get("slug")
            .and_then(Value::as_str)
            .filter(|slug| !slug.is_empty())
            .or_else(|| fallback.and_then(|summary| str_field(summary, "slug")))
            .unwrap_or_default();

        Ok(CanonicalRecord {
            timestamp,
            rpc: string_or_empty(results.get("vendor_code")),
            url: format!("{}{}", self.url_prefix, slug),
            title: build_title(results),
            marketing_tags: marketing_tags(results),
            brand: brand(results),
            section: section(results.get("category")),
            price_data: price_data(results),
            stock: Stock::from_count(coerce_count(results.get("quantity_total"))),
            assets: Assets::from_main_image(string_or_empty(results.get("image_url"))),
            metadata: metadata(results),
            variants: 0,
        })
    }
}

/// Checks the detail envelope and returns its `results` object
fn detail_results(payload: &Value) -> Result<&Object, ResponseError> {
    if !payload.is_object() {
        return Err(ResponseError::Decode(
            "detail payload is not an object".to_string(),
        ));
    }

    if !is_truthy(field(payload, "success")) {
        return Err(ResponseError::Business(
            "detail endpoint did not report success".to_string(),
        ));
    }

    match object_field(payload, "results") {
        Some(results) if !results.is_empty() => Ok(results),
        Some(_) => Err(ResponseError::Business(
            "detail results object is empty".to_string(),
        )),
        None => Err(ResponseError::Business(
            "detail payload has no results object".to_string(),
        )),
    }
}

fn brand(results: &Object) -> String {
    results
        .get("brand")
        .and_then(|brand| str_field(brand, "name"))
        .unwrap_or_default()
        .to_string()
}

/// `"{name}, {volume}"` unless the volume is already part of the name
pub fn compose_title(name: &str, volume: &str) -> String {
    let name = name.trim();
    let volume = volume.trim();

    if !volume.is_empty() && !name.is_empty() && !name.contains(volume) {
        format!("{}, {}", name, volume)
    } else if !name.is_empty() {
        name.to_string()
    } else {
        volume.to_string()
    }
}

fn build_title(results: &Object) -> String {
    compose_title(
        &string_or_empty(results.get("name")),
        &string_or_empty(results.get("volume")),
    )
}

/// Walks a category node up its `parent` links, returning names root first
///
/// Traversal stops at the first node that is not an object or has no parent,
/// and after [`MAX_SECTION_DEPTH`] nodes regardless of the data.
pub fn section(category: Option<&Value>) -> Vec<String> {
    let mut names = Vec::new();
    let mut node = category;

    for _ in 0..MAX_SECTION_DEPTH {
        let Some(current) = node.and_then(Value::as_object) else {
            break;
        };

        if let Some(name) = current.get("name").and_then(Value::as_str) {
            if !name.is_empty() {
                names.push(name.to_string());
            }
        }

        node = current.get("parent");
    }

    names.reverse();
    names
}

/// Sale label for a discount, empty when there is none
///
/// The percentage is rounded half to even.
pub fn sale_tag(current: f64, original: f64) -> String {
    if original > current && current > 0.0 {
        let percent = (100.0 - current / original * 100.0).round_ties_even();
        format!("Скидка {}%", percent as i64)
    } else {
        String::new()
    }
}

fn price_data(results: &Object) -> PriceData {
    let current = coerce_f64(results.get("price")).unwrap_or(0.0).max(0.0);

    let original = match coerce_f64(results.get("prev_price")).unwrap_or(0.0).max(0.0) {
        prev if prev == 0.0 => current,
        prev => prev,
    };

    PriceData {
        current,
        original,
        sale_tag: sale_tag(current, original),
    }
}

/// Extracts a display value for one product specification
///
/// Objects contribute their `name`, strings and numbers their string form.
/// Anything else, booleans included, yields an empty string, which callers
/// treat as absent.
pub fn spec_value(raw: Option<&Value>) -> String {
    match raw {
        Some(Value::Object(object)) if object.contains_key("name") => {
            string_or_empty(object.get("name"))
        }
        other => string_or_empty(other),
    }
}

fn description(results: &Object) -> String {
    if let Some(text) = results.get("description").and_then(Value::as_str) {
        return text.to_string();
    }

    results
        .get("description_blocks")
        .and_then(Value::as_array)
        .map(|blocks| {
            blocks
                .iter()
                .filter_map(|block| coerce_string(Some(block)))
                .filter(|text| !text.is_empty())
                .collect::<Vec<_>>()
                .join(" ")
        })
        .unwrap_or_default()
}

fn metadata(results: &Object) -> BTreeMap<String, String> {
    let mut metadata = BTreeMap::new();
    metadata.insert(DESCRIPTION_KEY.to_string(), description(results));

    for key in KNOWN_SPEC_KEYS {
        let value = spec_value(results.get(key));
        if !value.is_empty() {
            metadata.insert(key.to_string(), value);
        }
    }

    if let Some(properties) = results.get("properties").and_then(Value::as_object) {
        for (key, raw) in properties {
            let value = spec_value(Some(raw));
            if !value.is_empty() {
                metadata.insert(key.clone(), value);
            }
        }
    }

    metadata
}

fn marketing_tags(results: &Object) -> Vec<String> {
    [
        (MarketingTag::New, "is_new"),
        (MarketingTag::Gift, "is_gift"),
    ]
    .into_iter()
    .filter(|(_, flag)| is_truthy(results.get(*flag)))
    .map(|(tag, _)| tag.as_str().to_string())
    .collect()
}
