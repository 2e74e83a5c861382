//! Client and checkout error types.

use cartsync_commerce::{CartError, FormError};
use thiserror::Error;

/// Errors from storefront HTTP calls.
#[derive(Error, Debug)]
pub enum ClientError {
    /// Transport failure: connection, timeout or body read.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("Unexpected status {status} from {url}")]
    Status { status: u16, url: String },

    /// The response body was not the expected JSON.
    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The configured base URL or a derived URL is unusable.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

/// Errors from placing an order or toggling the wishlist.
#[derive(Error, Debug)]
pub enum CheckoutError {
    /// Nothing to order.
    #[error("Cart is empty")]
    EmptyCart,

    /// The shipping form is incomplete.
    #[error("Invalid shipping form: {0}")]
    InvalidForm(#[from] FormError),

    /// The server refused the order.
    #[error("Order rejected: {0}")]
    Rejected(String),

    /// The request failed.
    #[error(transparent)]
    Client(#[from] ClientError),

    /// Reading or clearing the cart failed.
    #[error(transparent)]
    Cart(#[from] CartError),
}
