//! Structural checks for a result file
//!
//! Verifies that a result file is a JSON array whose every element carries
//! the full record shape: all top-level keys plus the nested price, stock and
//! metadata keys.

use serde_json::Value;
use std::path::Path;
use thiserror::Error;

/// Keys every record must carry
pub const REQUIRED_TOP_LEVEL_KEYS: [&str; 12] = [
    "timestamp",
    "RPC",
    "url",
    "title",
    "marketing_tags",
    "brand",
    "section",
    "price_data",
    "stock",
    "assets",
    "metadata",
    "variants",
];

/// Keys required inside `price_data`
pub const REQUIRED_PRICE_KEYS: [&str; 3] = ["current", "original", "sale_tag"];

/// Keys required inside `stock`
pub const REQUIRED_STOCK_KEYS: [&str; 2] = ["in_stock", "count"];

/// Keys required inside `metadata`
pub const REQUIRED_METADATA_KEYS: [&str; 1] = ["__description"];

/// Why a result file failed validation
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("File '{0}' not found")]
    NotFound(String),

    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),

    #[error("File is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("JSON root is not a list (got {0})")]
    NotArray(&'static str),

    #[error("Record {index} is missing {section} keys: {}", missing.join(", "))]
    MissingKeys {
        index: usize,
        section: &'static str,
        missing: Vec<String>,
    },
}

/// Outcome of a successful validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    /// Number of records checked
    pub records: usize,

    /// Up to five metadata keys of the first record, for display
    pub sample_metadata_keys: Vec<String>,
}

impl ValidationReport {
    /// An empty array passes but deserves a warning
    pub fn is_empty(&self) -> bool {
        self.records == 0
    }
}

/// Reads and validates a result file
pub fn validate_file(path: &Path) -> Result<ValidationReport, ValidationError> {
    if !path.exists() {
        return Err(ValidationError::NotFound(path.display().to_string()));
    }

    let content = std::fs::read_to_string(path)?;
    let data: Value = serde_json::from_str(&content)?;
    validate_records(&data)
}

/// Validates an already-parsed result document
pub fn validate_records(data: &Value) -> Result<ValidationReport, ValidationError> {
    let items = data
        .as_array()
        .ok_or_else(|| ValidationError::NotArray(json_type_name(data)))?;

    for (index, item) in items.iter().enumerate() {
        check_keys(index, "top-level", Some(item), &REQUIRED_TOP_LEVEL_KEYS)?;
        check_keys(index, "price_data", item.get("price_data"), &REQUIRED_PRICE_KEYS)?;
        check_keys(index, "stock", item.get("stock"), &REQUIRED_STOCK_KEYS)?;
        check_keys(index, "metadata", item.get("metadata"), &REQUIRED_METADATA_KEYS)?;
    }

    let sample_metadata_keys = items
        .first()
        .and_then(|item| item.get("metadata"))
        .and_then(Value::as_object)
        .map(|metadata| metadata.keys().take(5).cloned().collect())
        .unwrap_or_default();

    Ok(ValidationReport {
        records: items.len(),
        sample_metadata_keys,
    })
}

fn check_keys(
    index: usize,
    section: &'static str,
    value: Option<&Value>,
    required: &[&str],
) -> Result<(), ValidationError> {
    let object = value.and_then(Value::as_object);
    let missing: Vec<String> = required
        .iter()
        .filter(|key| !object.is_some_and(|o| o.contains_key(**key)))
        .map(|key| key.to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::MissingKeys {
            index,
            section,
            missing,
        })
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
