//! Product list filters.

use serde::{Deserialize, Serialize};

use crate::catalog::CatalogProduct;

/// One-click filters on product flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuickFilter {
    Bestseller,
    Discount,
    New,
    Luxury,
}

impl QuickFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuickFilter::Bestseller => "bestseller",
            QuickFilter::Discount => "discount",
            QuickFilter::New => "new",
            QuickFilter::Luxury => "luxury",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "bestseller" => Some(QuickFilter::Bestseller),
            "discount" => Some(QuickFilter::Discount),
            "new" => Some(QuickFilter::New),
            "luxury" => Some(QuickFilter::Luxury),
            _ => None,
        }
    }

    /// Check the flag this filter selects.
    pub fn matches(&self, product: &CatalogProduct) -> bool {
        match self {
            QuickFilter::Bestseller => product.is_bestseller,
            QuickFilter::Discount => product.has_discount,
            QuickFilter::New => product.is_new,
            QuickFilter::Luxury => product.is_luxury,
        }
    }
}

/// Conditions a listed product must satisfy. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductFilter {
    /// Case-insensitive substring of the product name.
    pub search: Option<String>,
    /// Category slug.
    pub category: Option<String>,
    /// Brand slug.
    pub brand: Option<String>,
    /// Inclusive lower price bound.
    pub min_price: Option<u64>,
    /// Inclusive upper price bound.
    pub max_price: Option<u64>,
    pub quick: Option<QuickFilter>,
}

impl ProductFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, text: impl Into<String>) -> Self {
        let text = text.into().trim().to_string();
        self.search = (!text.is_empty()).then_some(text);
        self
    }

    pub fn category(mut self, slug: impl Into<String>) -> Self {
        self.category = Some(slug.into());
        self
    }

    pub fn brand(mut self, slug: impl Into<String>) -> Self {
        self.brand = Some(slug.into());
        self
    }

    pub fn price_range(mut self, min: Option<u64>, max: Option<u64>) -> Self {
        self.min_price = min;
        self.max_price = max;
        self
    }

    pub fn quick(mut self, quick: QuickFilter) -> Self {
        self.quick = Some(quick);
        self
    }

    /// Check if no condition is set.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Check a product against every set condition.
    pub fn matches(&self, product: &CatalogProduct) -> bool {
        if let Some(search) = &self.search {
            if !product.name.to_lowercase().contains(&search.to_lowercase()) {
                return false;
            }
        }
        if let Some(category) = &self.category {
            if product.category_slug.as_deref() != Some(category.as_str()) {
                return false;
            }
        }
        if let Some(brand) = &self.brand {
            if product.brand_slug.as_deref() != Some(brand.as_str()) {
                return false;
            }
        }
        if self.min_price.is_some_and(|min| product.price < min) {
            return false;
        }
        if self.max_price.is_some_and(|max| product.price > max) {
            return false;
        }
        self.quick.map_or(true, |quick| quick.matches(product))
    }
}

/// Parse a price typed into a filter box, e.g. `"1,250,000"`.
///
/// Returns `None` for empty or non-numeric input.
pub fn parse_price_input(input: &str) -> Option<u64> {
    let cleaned: String = input
        .trim()
        .chars()
        .filter(|c| !matches!(c, ',' | '\u{066c}' | ' '))
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse().ok()
}
