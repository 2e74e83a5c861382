//! Order submission payloads.

use serde::{Deserialize, Serialize};

use crate::cart::{encode_cart, Cart};
use crate::checkout::ShippingForm;
use crate::error::CartError;
use crate::ids::CityId;

/// Message shown when an order could not be submitted at all.
pub const ORDER_RETRY_MESSAGE: &str = "خطا در پردازش سفارش. لطفاً دوباره تلاش کنید.";

/// An order ready to submit: form fields plus the cart record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderRequest {
    pub form: ShippingForm,
    /// The persisted cart record, sent as `cart_data`.
    pub cart_data: String,
}

impl OrderRequest {
    pub fn new(form: ShippingForm, cart: &Cart) -> Result<Self, CartError> {
        Ok(Self {
            form,
            cart_data: encode_cart(cart)?,
        })
    }

    /// All multipart fields, `cart_data` last.
    pub fn fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = self.form.to_fields();
        fields.push(("cart_data", self.cart_data.clone()));
        fields
    }
}

/// Server answer to an order submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderResponse {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub redirect_url: Option<String>,
}

/// A placed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderConfirmation {
    pub message: String,
    /// Where the storefront sends the customer next.
    pub redirect_url: Option<String>,
}

/// A city offered for a province.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct City {
    pub id: CityId,
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::{NewItem, StockLimit};
    use crate::ids::ProductId;

    #[test]
    fn test_request_carries_cart_record() {
        let mut cart = Cart::new();
        cart.add_item(NewItem::new(ProductId::new(3), "Serum", 90_000), 1, StockLimit::Unlimited)
            .unwrap();
        let request = OrderRequest::new(ShippingForm::default(), &cart).unwrap();

        let fields = request.fields();
        let (name, value) = fields.last().unwrap();
        assert_eq!(*name, "cart_data");
        assert!(value.starts_with(r#"[{"id":3"#));
    }

    #[test]
    fn test_response_defaults() {
        let response: OrderResponse = serde_json::from_str(r#"{"success": false}"#).unwrap();
        assert!(!response.success);
        assert!(response.message.is_empty());
        assert!(response.redirect_url.is_none());
    }
}
