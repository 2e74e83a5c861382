//! The persisted cart record.
//!
//! The record is a JSON array of `{id, name, price, quantity, image}` objects
//! stored under a single key. Older pages wrote prices as strings and added
//! presentation fields (`color`, `iconColor`), so decoding is lenient: anything
//! that cannot form a valid line is dropped and duplicate ids are merged.

use serde_json::{Map, Value};

use crate::cart::{Cart, LineItem};
use crate::error::CartError;
use crate::ids::ProductId;
use crate::lenient;

/// Default storage key of the cart record.
pub const CART_KEY: &str = "cart";

/// Result of decoding a persisted record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodedRecord {
    /// The normalized cart.
    pub cart: Cart,
    /// Entries that could not form a valid line.
    pub dropped: usize,
    /// Entries folded into an earlier line with the same id.
    pub merged: usize,
}

impl DecodedRecord {
    /// Whether the record decoded without repairs.
    pub fn is_clean(&self) -> bool {
        self.dropped == 0 && self.merged == 0
    }
}

/// Serialize a cart into its persisted form.
pub fn encode_cart(cart: &Cart) -> Result<String, CartError> {
    Ok(serde_json::to_string(cart)?)
}

/// Decode persisted text into a cart.
///
/// Empty text and `null` are an empty cart. Text that is not a JSON array is
/// `MalformedState`, as is a record whose subtotal does not fit in a `u64`.
pub fn decode_cart(text: &str) -> Result<DecodedRecord, CartError> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(DecodedRecord::default());
    }

    let value: Value =
        serde_json::from_str(text).map_err(|e| CartError::MalformedState(e.to_string()))?;
    let entries = match value {
        Value::Null => return Ok(DecodedRecord::default()),
        Value::Array(entries) => entries,
        other => {
            return Err(CartError::MalformedState(format!(
                "expected an array, found {}",
                kind_of(&other)
            )))
        }
    };

    let mut items: Vec<LineItem> = Vec::with_capacity(entries.len());
    let mut dropped = 0;
    let mut merged = 0;

    for entry in &entries {
        let Some(line) = entry.as_object().and_then(line_from_object) else {
            dropped += 1;
            continue;
        };
        match items.iter_mut().find(|existing| existing.id == line.id) {
            Some(existing) => {
                existing.quantity = existing.quantity.saturating_add(line.quantity);
                merged += 1;
            }
            None => items.push(line),
        }
    }

    if Cart::checked_subtotal(&items).is_none() {
        return Err(CartError::MalformedState(
            "subtotal exceeds the representable range".into(),
        ));
    }

    Ok(DecodedRecord {
        cart: Cart::from_normalized(items),
        dropped,
        merged,
    })
}

fn line_from_object(obj: &Map<String, Value>) -> Option<LineItem> {
    let id = obj.get("id").and_then(lenient::u64_from_value)?;
    let unit_price = obj.get("price").and_then(lenient::u64_from_value)?;
    let quantity = obj.get("quantity").and_then(lenient::u64_from_value)?;
    let quantity = u32::try_from(quantity).ok().filter(|q| *q >= 1)?;

    let name = match obj.get("name") {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    };
    let image_url = obj
        .get("image")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_owned);

    Some(LineItem {
        id: ProductId::new(id),
        name,
        unit_price,
        quantity,
        image_url,
    })
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::{NewItem, StockLimit};

    #[test]
    fn test_encode_wire_shape() {
        let mut cart = Cart::new();
        cart.add_item(
            NewItem::new(ProductId::new(1), "Lipstick", 125_000).with_image("/media/1.jpg"),
            2,
            StockLimit::Unlimited,
        )
        .unwrap();

        let json = encode_cart(&cart).unwrap();
        assert_eq!(
            json,
            r#"[{"id":1,"name":"Lipstick","price":125000,"quantity":2,"image":"/media/1.jpg"}]"#
        );
        assert_eq!(encode_cart(&Cart::new()).unwrap(), "[]");
    }

    #[test]
    fn test_decode_preserves_order() {
        let text = r#"[{"id":3,"name":"c","price":10,"quantity":1,"image":null},
                       {"id":1,"name":"a","price":20,"quantity":2,"image":null}]"#;
        let decoded = decode_cart(text).unwrap();
        assert!(decoded.is_clean());
        let ids: Vec<u64> = decoded.cart.items().iter().map(|i| i.id.get()).collect();
        assert_eq!(ids, vec![3, 1]);
        assert_eq!(decoded.cart.subtotal(), 50);
    }

    #[test]
    fn test_decode_string_prices_and_extra_fields() {
        let text = r##"[{"id":"7","name":"Mascara","price":"89,000","quantity":1,
                         "image":"/m.jpg","color":"#333","iconColor":"#fff"}]"##;
        let decoded = decode_cart(text).unwrap();
        let line = &decoded.cart.items()[0];
        assert_eq!(line.id, ProductId::new(7));
        assert_eq!(line.unit_price, 89_000);
        assert_eq!(line.image_url.as_deref(), Some("/m.jpg"));
    }

    #[test]
    fn test_decode_drops_invalid_lines() {
        let text = r#"[{"id":1,"name":"a","price":10,"quantity":0},
                       {"id":2,"name":"b","price":-5,"quantity":1},
                       {"name":"c","price":10,"quantity":1},
                       "junk",
                       {"id":5,"name":"e","price":10,"quantity":1}]"#;
        let decoded = decode_cart(text).unwrap();
        assert_eq!(decoded.dropped, 4);
        assert_eq!(decoded.cart.unique_item_count(), 1);
        assert_eq!(decoded.cart.items()[0].id, ProductId::new(5));
    }

    #[test]
    fn test_decode_merges_duplicates() {
        let text = r#"[{"id":1,"name":"a","price":10,"quantity":1},
                       {"id":2,"name":"b","price":10,"quantity":1},
                       {"id":1,"name":"a","price":10,"quantity":2}]"#;
        let decoded = decode_cart(text).unwrap();
        assert_eq!(decoded.merged, 1);
        assert_eq!(decoded.cart.quantity_of(ProductId::new(1)), 3);
        assert_eq!(decoded.cart.items()[0].id, ProductId::new(1));
    }

    #[test]
    fn test_empty_image_survives_round_trip() {
        let mut cart = Cart::new();
        cart.add_item(
            NewItem::new(ProductId::new(1), "Lipstick", 125_000).with_image(""),
            1,
            StockLimit::Unlimited,
        )
        .unwrap();

        let decoded = decode_cart(&encode_cart(&cart).unwrap()).unwrap();
        assert!(decoded.is_clean());
        assert_eq!(decoded.cart, cart);
    }

    #[test]
    fn test_decode_empty_inputs() {
        assert!(decode_cart("").unwrap().cart.is_empty());
        assert!(decode_cart("   ").unwrap().cart.is_empty());
        assert!(decode_cart("null").unwrap().cart.is_empty());
        assert!(decode_cart("[]").unwrap().cart.is_empty());
    }

    #[test]
    fn test_decode_malformed() {
        for text in ["{", "{}", "42", "\"cart\"", "[1,"] {
            assert!(
                matches!(decode_cart(text), Err(CartError::MalformedState(_))),
                "{text} should be malformed"
            );
        }
    }

    #[test]
    fn test_decode_overflowing_subtotal() {
        let text = format!(
            r#"[{{"id":1,"name":"a","price":{},"quantity":2}}]"#,
            u64::MAX
        );
        assert!(matches!(
            decode_cart(&text),
            Err(CartError::MalformedState(_))
        ));
    }
}
