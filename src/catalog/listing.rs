use crate::catalog::fields::{field, is_truthy, Object};
use crate::ResponseError;
use serde_json::Value;

/// A decoded list-page payload with its blocks located
///
/// The list endpoint comes in two shapes:
///
/// - `{"results": [..products..], "meta": {..}, ..}`
/// - `{"results": {"products": [..], ..pagination..}, "meta": {..}}`
///
/// The shape decides where products live and which object acts as the
/// "results block" for pagination lookups: the `results` object itself, or
/// the top-level payload when `results` is a plain array.
#[derive(Debug, Clone, Copy)]
pub struct ListPage<'a> {
    products: &'a [Value],
    meta: Option<&'a Object>,
    results_block: &'a Object,
}

impl<'a> ListPage<'a> {
    /// Locates products and pagination blocks in a decoded payload
    ///
    /// # Errors
    ///
    /// * [`ResponseError::Decode`] - the payload is not a JSON object
    /// * [`ResponseError::Business`] - the payload carries an explicit falsy `success`
    pub fn parse(payload: &'a Value) -> Result<Self, ResponseError> {
        let top = payload
            .as_object()
            .ok_or_else(|| ResponseError::Decode("list payload is not an object".to_string()))?;

        if let Some(flag) = top.get("success") {
            if !flag.is_null() && !is_truthy(Some(flag)) {
                return Err(ResponseError::Business(format!(
                    "list endpoint returned success={}",
                    flag
                )));
            }
        }

        let (products, results_block): (&'a [Value], &'a Object) = match top.get("results") {
            Some(Value::Array(items)) => (items.as_slice(), top),
            Some(Value::Object(results)) => {
                let products = results
                    .get("products")
                    .and_then(Value::as_array)
                    .map(Vec::as_slice)
                    .unwrap_or_default();
                (products, results)
            }
            _ => (Default::default(), top),
        };

        Ok(Self {
            products,
            meta: top.get("meta").and_then(Value::as_object),
            results_block,
        })
    }

    /// Decodes a raw body and locates its blocks
    pub fn decode(body: &str) -> Result<Value, ResponseError> {
        Ok(serde_json::from_str(body)?)
    }

    pub fn products(&self) -> &'a [Value] {
        self.products
    }

    pub fn meta(&self) -> Option<&'a Object> {
        self.meta
    }

    /// Reads `key` from the meta block
    pub fn meta_value(&self, key: &str) -> Option<&'a Value> {
        self.meta.and_then(|meta| meta.get(key))
    }

    /// Reads `key` from the results block
    pub fn results_value(&self, key: &str) -> Option<&'a Value> {
        self.results_block.get(key)
    }
}

/// Identifier of a list entry, if it has a usable one
pub fn product_uuid(summary: &Value) -> Option<String> {
    crate::catalog::fields::coerce_string(field(summary, "uuid"))
        .map(|uuid| uuid.trim().to_string())
        .filter(|uuid| !uuid.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_results_as_array() {
        let payload = json!({
            "success": true,
            "results": [{"uuid": "a"}, {"uuid": "b"}],
            "meta": {"last_page": 3},
            "total_pages": 9
        });
        let page = ListPage::parse(&payload).unwrap();
        assert_eq!(page.products().len(), 2);
        assert_eq!(page.meta_value("last_page"), Some(&json!(3)));
        // the top-level object acts as the results block
        assert_eq!(page.results_value("total_pages"), Some(&json!(9)));
    }

    #[test]
    fn test_results_as_object() {
        let payload = json!({
            "results": {"products": [{"uuid": "a"}], "total_pages": 4}
        });
        let page = ListPage::parse(&payload).unwrap();
        assert_eq!(page.products().len(), 1);
        assert!(page.meta().is_none());
        assert_eq!(page.results_value("total_pages"), Some(&json!(4)));
    }

    #[test]
    fn test_results_object_without_products() {
        let payload = json!({"results": {"total": 0}});
        let page = ListPage::parse(&payload).unwrap();
        assert!(page.products().is_empty());
    }

    #[test]
    fn test_missing_results() {
        let payload = json!({"success": true});
        let page = ListPage::parse(&payload).unwrap();
        assert!(page.products().is_empty());
    }

    #[test]
    fn test_explicit_failure() {
        let payload = json!({"success": false, "results": []});
        let err = ListPage::parse(&payload).unwrap_err();
        assert!(matches!(err, ResponseError::Business(_)));
    }

    #[test]
    fn test_null_success_is_not_failure() {
        let payload = json!({"success": null, "results": []});
        assert!(ListPage::parse(&payload).is_ok());
    }

    #[test]
    fn test_non_object_payload() {
        let err = ListPage::parse(&json!([1, 2, 3])).unwrap_err();
        assert!(matches!(err, ResponseError::Decode(_)));
    }

    #[test]
    fn test_decode_invalid_body() {
        let err = ListPage::decode("<html>oops</html>").unwrap_err();
        assert!(matches!(err, ResponseError::Decode(_)));
    }

    #[test]
    fn test_product_uuid() {
        assert_eq!(product_uuid(&json!({"uuid": " a1 "})), Some("a1".to_string()));
        assert_eq!(product_uuid(&json!({"uuid": 17})), Some("17".to_string()));
        assert_eq!(product_uuid(&json!({"uuid": ""})), None);
        assert_eq!(product_uuid(&json!({"uuid": null})), None);
        assert_eq!(product_uuid(&json!({"name": "x"})), None);
        assert_eq!(product_uuid(&json!("a1")), None);
    }
}
