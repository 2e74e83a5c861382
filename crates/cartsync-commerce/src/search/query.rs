//! Product list query: filter plus sort order.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, CatalogProduct};
use crate::search::{parse_price_input, ProductFilter, QuickFilter};

/// Sort options for the product list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum SortOrder {
    /// Catalog order.
    #[default]
    Default,
    /// Sort by price, low to high.
    PriceLow,
    /// Sort by price, high to low.
    PriceHigh,
    /// Highest rated first.
    Rating,
    /// Sort by name A-Z.
    Name,
    /// Newest first; products without a date go last.
    Newest,
    /// Bestsellers first, otherwise catalog order.
    Bestseller,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Default => "default",
            SortOrder::PriceLow => "price-low",
            SortOrder::PriceHigh => "price-high",
            SortOrder::Rating => "rating",
            SortOrder::Name => "name",
            SortOrder::Newest => "newest",
            SortOrder::Bestseller => "bestseller",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "default" | "" => Some(SortOrder::Default),
            "price-low" => Some(SortOrder::PriceLow),
            "price-high" => Some(SortOrder::PriceHigh),
            "rating" => Some(SortOrder::Rating),
            "name" => Some(SortOrder::Name),
            "newest" => Some(SortOrder::Newest),
            "bestseller" => Some(SortOrder::Bestseller),
            _ => None,
        }
    }

    /// Compare two products under this order.
    pub fn compare(&self, a: &CatalogProduct, b: &CatalogProduct) -> Ordering {
        match self {
            SortOrder::Default => Ordering::Equal,
            SortOrder::PriceLow => a.price.cmp(&b.price),
            SortOrder::PriceHigh => b.price.cmp(&a.price),
            SortOrder::Rating => b.rating.total_cmp(&a.rating),
            SortOrder::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
            SortOrder::Newest => b.created_at.cmp(&a.created_at),
            SortOrder::Bestseller => b.is_bestseller.cmp(&a.is_bestseller),
        }
    }
}

/// A product list query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductQuery {
    pub filter: ProductFilter,
    pub sort: SortOrder,
}

impl ProductQuery {
    pub fn new(filter: ProductFilter, sort: SortOrder) -> Self {
        Self { filter, sort }
    }

    /// Matching products, stably sorted.
    pub fn apply<'a>(&self, catalog: &'a Catalog) -> Vec<&'a CatalogProduct> {
        let mut products: Vec<&CatalogProduct> = catalog
            .iter()
            .filter(|p| self.filter.matches(p))
            .collect();
        if self.sort != SortOrder::Default {
            products.sort_by(|a, b| self.sort.compare(a, b));
        }
        products
    }

    /// Build a query from URL query pairs.
    ///
    /// Unknown keys are ignored; unparseable values leave the field unset.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut query = ProductQuery::default();
        for (key, value) in pairs {
            let value = value.as_ref().trim();
            if value.is_empty() {
                continue;
            }
            match key.as_ref() {
                "search" => query.filter = query.filter.search(value),
                "category" => query.filter.category = Some(value.to_string()),
                "brand" => query.filter.brand = Some(value.to_string()),
                "sort" => query.sort = SortOrder::parse(value).unwrap_or_default(),
                "min_price" => query.filter.min_price = parse_price_input(value),
                "max_price" => query.filter.max_price = parse_price_input(value),
                "quick" => query.filter.quick = QuickFilter::parse(value),
                _ => {}
            }
        }
        query
    }

    /// URL query pairs for the set fields, in a fixed order.
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let f = &self.filter;
        let mut pairs = Vec::new();
        if let Some(search) = &f.search {
            pairs.push(("search", search.clone()));
        }
        if let Some(category) = &f.category {
            pairs.push(("category", category.clone()));
        }
        if let Some(brand) = &f.brand {
            pairs.push(("brand", brand.clone()));
        }
        if self.sort != SortOrder::Default {
            pairs.push(("sort", self.sort.as_str().to_string()));
        }
        if let Some(min) = f.min_price {
            pairs.push(("min_price", min.to_string()));
        }
        if let Some(max) = f.max_price {
            pairs.push(("max_price", max.to_string()));
        }
        if let Some(quick) = f.quick {
            pairs.push(("quick", quick.as_str().to_string()));
        }
        pairs
    }
}
