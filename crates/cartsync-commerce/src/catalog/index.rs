//! In-memory product catalog keyed by id.

use std::collections::HashMap;

use crate::cart::StockLimit;
use crate::catalog::{CatalogProduct, ProductPage};
use crate::ids::ProductId;

/// Products in arrival order with an id index.
///
/// Re-inserting a known id replaces the product in place, keeping its position.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: Vec<CatalogProduct>,
    index: HashMap<ProductId, usize>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a product.
    pub fn insert(&mut self, product: CatalogProduct) {
        match self.index.get(&product.id) {
            Some(&pos) => self.products[pos] = product,
            None => {
                self.index.insert(product.id, self.products.len());
                self.products.push(product);
            }
        }
    }

    /// Append all products of a listing page.
    pub fn extend_page(&mut self, page: ProductPage) {
        self.extend(page.products);
    }

    pub fn get(&self, id: ProductId) -> Option<&CatalogProduct> {
        self.index.get(&id).map(|&pos| &self.products[pos])
    }

    /// Stock limit for a product. Unknown products cannot be bought.
    pub fn stock_limit(&self, id: ProductId) -> StockLimit {
        self.get(id)
            .map_or(StockLimit::Units(0), CatalogProduct::stock_limit)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CatalogProduct> {
        self.products.iter()
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

impl Extend<CatalogProduct> for Catalog {
    fn extend<I: IntoIterator<Item = CatalogProduct>>(&mut self, iter: I) {
        for product in iter {
            self.insert(product);
        }
    }
}

impl FromIterator<CatalogProduct> for Catalog {
    fn from_iter<I: IntoIterator<Item = CatalogProduct>>(iter: I) -> Self {
        let mut catalog = Catalog::new();
        catalog.extend(iter);
        catalog
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::product::fixtures::product;

    #[test]
    fn test_lookup_and_order() {
        let catalog: Catalog = vec![product(2, "b", 10, 1), product(1, "a", 20, 0)]
            .into_iter()
            .collect();

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get(ProductId::new(1)).unwrap().name, "a");
        let ids: Vec<u64> = catalog.iter().map(|p| p.id.get()).collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[test]
    fn test_reinsert_replaces_in_place() {
        let mut catalog = Catalog::new();
        catalog.insert(product(1, "old", 10, 1));
        catalog.insert(product(2, "other", 10, 1));
        catalog.insert(product(1, "new", 15, 4));

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.iter().next().unwrap().name, "new");
        assert_eq!(catalog.stock_limit(ProductId::new(1)), StockLimit::Units(4));
    }

    #[test]
    fn test_unknown_product_has_no_stock() {
        let catalog = Catalog::new();
        assert!(catalog.stock_limit(ProductId::new(99)).is_out_of_stock());
    }
}
