//! Shopping cart module.
//!
//! Contains the cart value type, shipping totals, the persisted record format
//! and the [`CartStore`] that owns the live cart.

mod cart;
mod pricing;
mod record;
mod store;

pub use cart::{Cart, LineItem, LineItemUpdate, NewItem, StockLimit};
pub use pricing::{
    CartTotals, ShippingPolicy, DEFAULT_FLAT_SHIPPING_COST, DEFAULT_FREE_SHIPPING_THRESHOLD,
};
pub use record::{decode_cart, encode_cart, DecodedRecord, CART_KEY};
pub use store::{CartStore, Observer, SubscriptionId};
