//! Cart error types.

use cartsync_store::StorageError;
use thiserror::Error;

use crate::ids::ProductId;

/// Errors that can occur in cart operations.
///
/// Stock outcomes are validation results the caller shows to the user; none of
/// them leaves the cart in a changed state.
#[derive(Error, Debug)]
pub enum CartError {
    /// The product has no stock at all.
    #[error("Product {product_id} is out of stock")]
    OutOfStock { product_id: ProductId },

    /// The requested or resulting quantity exceeds the stock limit.
    #[error("Insufficient stock for product {product_id}: requested {requested}, available {available}")]
    InsufficientStock {
        product_id: ProductId,
        requested: u64,
        available: u32,
    },

    /// Quantity is not usable for the operation.
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(i64),

    /// Product is not in the catalog.
    #[error("Product not found: {0}")]
    ProductNotFound(ProductId),

    /// Persisted cart record could not be read.
    #[error("Malformed cart record: {0}")]
    MalformedState(String),

    /// Arithmetic overflow.
    #[error("Arithmetic overflow in cart totals")]
    Overflow,

    /// Persisting the cart failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CartError {
    /// Whether this is a stock validation outcome the user should see.
    pub fn is_stock_error(&self) -> bool {
        matches!(
            self,
            CartError::OutOfStock { .. } | CartError::InsufficientStock { .. }
        )
    }
}

/// Shipping form validation failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    /// A required field is empty.
    #[error("Field `{0}` is required")]
    Missing(&'static str),

    /// A field has an unusable value.
    #[error("Field `{field}` is invalid: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

impl FormError {
    /// Name of the offending field.
    pub fn field(&self) -> &'static str {
        match self {
            FormError::Missing(field) | FormError::Invalid { field, .. } => field,
        }
    }
}
