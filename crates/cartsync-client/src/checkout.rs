//! Order placement and wishlist toggling against a [`StorefrontApi`].
//!
//! Both flows report to the customer through a [`Notifier`] and hand the
//! outcome back to the caller. The cart is cleared only when the server
//! confirms the order.

use cartsync_commerce::cart::CartStore;
use cartsync_commerce::checkout::{
    OrderConfirmation, OrderRequest, ShippingForm, ORDER_RETRY_MESSAGE,
};
use cartsync_commerce::ids::ProductId;
use cartsync_commerce::notify::{Notifier, Severity};
use cartsync_store::Storage;
use tracing::{info, warn};

use crate::api::{StorefrontApi, WishlistToggle};
use crate::error::CheckoutError;

pub const EMPTY_CART_MESSAGE: &str = "سبد خرید شما خالی است!";
pub const INVALID_FORM_MESSAGE: &str = "لطفاً اطلاعات ارسال را کامل وارد کنید.";
pub const WISHLIST_ADDED_MESSAGE: &str = "محصول به لیست علاقه‌مندی اضافه شد!";
pub const WISHLIST_REMOVED_MESSAGE: &str = "محصول از لیست علاقه‌مندی حذف شد!";
pub const WISHLIST_ERROR_MESSAGE: &str = "خطا در بروزرسانی لیست علاقه‌مندی";

/// Submit the cart with the shipping form.
///
/// On confirmation the store is cleared and the server's message is shown as a
/// success. A refusal shows the server's message; a failed request shows a
/// generic retry message. In both failure cases the cart is left as it was.
pub async fn place_order<A, S>(
    api: &A,
    store: &mut CartStore<S>,
    form: &ShippingForm,
    notifier: &dyn Notifier,
) -> Result<OrderConfirmation, CheckoutError>
where
    A: StorefrontApi + ?Sized,
    S: Storage,
{
    if store.is_empty() {
        notifier.notify(EMPTY_CART_MESSAGE, Severity::Warning);
        return Err(CheckoutError::EmptyCart);
    }
    if let Err(e) = form.validate() {
        notifier.notify(INVALID_FORM_MESSAGE, Severity::Error);
        return Err(e.into());
    }

    let request = OrderRequest::new(form.clone(), store.cart())?;
    let response = match api.submit_order(&request).await {
        Ok(response) => response,
        Err(e) => {
            warn!(error = %e, "order submission failed");
            notifier.notify(ORDER_RETRY_MESSAGE, Severity::Error);
            return Err(e.into());
        }
    };

    if !response.success {
        let message = if response.message.is_empty() {
            ORDER_RETRY_MESSAGE.to_string()
        } else {
            response.message
        };
        notifier.notify(&message, Severity::Error);
        return Err(CheckoutError::Rejected(message));
    }

    // The order exists server-side; a failed clear must not hide that.
    if let Err(e) = store.clear() {
        warn!(error = %e, "order placed but the cart could not be cleared");
    }
    info!(redirect = ?response.redirect_url, "order placed");
    notifier.notify(&response.message, Severity::Success);

    Ok(OrderConfirmation {
        message: response.message,
        redirect_url: response.redirect_url,
    })
}

/// Toggle a product on the wishlist and tell the customer the result.
pub async fn toggle_wishlist<A>(
    api: &A,
    product_id: ProductId,
    notifier: &dyn Notifier,
) -> Result<WishlistToggle, CheckoutError>
where
    A: StorefrontApi + ?Sized,
{
    match api.toggle_wishlist(product_id).await {
        Ok(toggle) => {
            if toggle.added {
                notifier.notify(WISHLIST_ADDED_MESSAGE, Severity::Success);
            } else {
                notifier.notify(WISHLIST_REMOVED_MESSAGE, Severity::Info);
            }
            Ok(toggle)
        }
        Err(e) => {
            warn!(%product_id, error = %e, "wishlist toggle failed");
            notifier.notify(WISHLIST_ERROR_MESSAGE, Severity::Error);
            Err(e.into())
        }
    }
}
