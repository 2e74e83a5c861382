//! Checkout module.
//!
//! Contains the shipping form and the order submission payloads.

mod form;
mod order;

pub use form::{ShippingForm, POSTAL_CODE_LEN};
pub use order::{City, OrderConfirmation, OrderRequest, OrderResponse, ORDER_RETRY_MESSAGE};
