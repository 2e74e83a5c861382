//! Cart state and storefront domain types for cartsync.
//!
//! This crate owns the client-side cart of a storefront:
//!
//! - **Cart**: line items, stock limits, shipping totals and the persisted record
//! - **CartStore**: the single source of truth, persisted after every mutation
//! - **Catalog**: products from the listing API, the source of prices and stock
//! - **Search**: product list filters and sort orders
//! - **Checkout**: shipping form and order payloads
//!
//! # Example
//!
//! ```rust,ignore
//! use cartsync_commerce::prelude::*;
//! use cartsync_store::MemoryStorage;
//!
//! let mut store = CartStore::open(MemoryStorage::new());
//! store.on_change(|cart| println!("{} items", cart.item_count()));
//!
//! let item = NewItem::new(ProductId::new(1), "Matte Lipstick", 125_000);
//! store.add_item(item, 1, StockLimit::Units(5))?;
//!
//! let totals = store.totals(&ShippingPolicy::default());
//! println!("Total: {}", totals.total_money(Currency::IRT));
//! ```

pub mod error;
pub mod ids;
pub mod lenient;
pub mod money;
pub mod notify;

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod search;

pub use error::{CartError, FormError};
pub use ids::*;
pub use money::{Currency, Money};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::{CartError, FormError};
    pub use crate::ids::*;
    pub use crate::money::{Currency, Money};
    pub use crate::notify::{LogNotifier, Notifier, Severity};

    // Cart
    pub use crate::cart::{
        Cart, CartStore, CartTotals, LineItem, LineItemUpdate, NewItem, ShippingPolicy,
        StockLimit, SubscriptionId,
    };

    // Catalog
    pub use crate::catalog::{Catalog, CatalogProduct, ProductImage, ProductPage};

    // Checkout
    pub use crate::checkout::{City, OrderConfirmation, OrderRequest, OrderResponse, ShippingForm};

    // Search
    pub use crate::search::{ProductFilter, ProductQuery, QuickFilter, SortOrder};
}
