//! Product list search.
//!
//! Contains the filter and sort applied to the catalog by listing pages.

mod filter;
mod query;

pub use filter::{parse_price_input, ProductFilter, QuickFilter};
pub use query::{ProductQuery, SortOrder};
