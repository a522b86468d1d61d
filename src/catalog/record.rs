use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Metadata key that every record carries, possibly with an empty value
pub const DESCRIPTION_KEY: &str = "__description";

/// Marketing tags the normalizer may attach, in emission order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarketingTag {
    New,
    Gift,
}

impl MarketingTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::New => "Новинка",
            Self::Gift => "Подарок",
        }
    }
}

/// The committed output shape for one product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalRecord {
    /// Unix seconds at normalization time
    pub timestamp: i64,

    /// Vendor reference code
    #[serde(rename = "RPC")]
    pub rpc: String,

    pub url: String,
    pub title: String,
    pub marketing_tags: Vec<String>,
    pub brand: String,

    /// Category chain, root first
    pub section: Vec<String>,

    pub price_data: PriceData,
    pub stock: Stock,
    pub assets: Assets,
    pub metadata: BTreeMap<String, String>,

    /// Reserved for variant grouping, always 0
    pub variants: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceData {
    pub current: f64,
    pub original: f64,
    /// Empty unless a positive discount was computed
    pub sale_tag: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stock {
    pub in_stock: bool,
    pub count: u64,
}

impl Stock {
    pub fn from_count(count: u64) -> Self {
        Self {
            in_stock: count > 0,
            count,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assets {
    pub main_image: String,
    pub set_images: Vec<String>,
    pub view360: Vec<String>,
    pub video: Vec<String>,
}

impl Assets {
    /// Assets for a product that only exposes a single image
    pub fn from_main_image(main_image: String) -> Self {
        let set_images = if main_image.is_empty() {
            Vec::new()
        } else {
            vec![main_image.clone()]
        };

        Self {
            main_image,
            set_images,
            view360: Vec::new(),
            video: Vec::new(),
        }
    }
}
