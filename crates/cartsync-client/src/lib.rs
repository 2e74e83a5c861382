//! Storefront HTTP client for cartsync.
//!
//! Typed access to the storefront endpoints the cart depends on, plus the
//! checkout and wishlist flows built on them:
//!
//! - [`StorefrontApi`] - the backend seam, implemented by [`StorefrontClient`]
//! - [`place_order`] - submit the cart, clear it on confirmation
//! - [`toggle_wishlist`] - flip a product on the wishlist
//!
//! # Example
//!
//! ```rust,ignore
//! use cartsync_client::{ClientConfig, StorefrontApi, StorefrontClient};
//!
//! let client = StorefrontClient::new(ClientConfig::new("https://shop.example/"))?;
//! let catalog = client.fetch_catalog(10).await?;
//! store.add_from_catalog(&catalog, ProductId::new(12), 1)?;
//! ```

mod api;
mod checkout;
mod error;
mod retry;

pub use api::{ClientConfig, StorefrontApi, StorefrontClient, WishlistToggle};
pub use checkout::{
    place_order, toggle_wishlist, EMPTY_CART_MESSAGE, INVALID_FORM_MESSAGE,
    WISHLIST_ADDED_MESSAGE, WISHLIST_ERROR_MESSAGE, WISHLIST_REMOVED_MESSAGE,
};
pub use error::{CheckoutError, ClientError};
pub use retry::{BackoffStrategy, RetryCondition, RetryPolicy};
