//! Product catalog module.
//!
//! Contains the product types of the listing API and the id-indexed catalog
//! that supplies prices and stock limits to the cart.

mod index;
mod product;

pub use index::Catalog;
pub use product::{CatalogProduct, ProductImage, ProductPage};

#[cfg(test)]
pub(crate) use product::fixtures;
