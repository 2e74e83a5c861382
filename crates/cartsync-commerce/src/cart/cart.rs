//! Cart and line item types.

use crate::cart::{CartTotals, ShippingPolicy};
use crate::error::CartError;
use crate::ids::ProductId;
use serde::{Deserialize, Serialize};

/// Maximum purchasable quantity for a line item.
///
/// `Units(0)` means the product is out of stock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum StockLimit {
    /// No limit.
    #[default]
    Unlimited,
    /// At most this many units.
    Units(u32),
}

impl StockLimit {
    /// Build a limit from a catalog stock count. Non-positive counts mean out of stock.
    pub fn from_stock_count(count: i64) -> Self {
        if count <= 0 {
            StockLimit::Units(0)
        } else {
            StockLimit::Units(u32::try_from(count).unwrap_or(u32::MAX))
        }
    }

    /// The limit in units, if bounded.
    pub fn units(&self) -> Option<u32> {
        match self {
            StockLimit::Unlimited => None,
            StockLimit::Units(n) => Some(*n),
        }
    }

    /// Check if nothing can be purchased.
    pub fn is_out_of_stock(&self) -> bool {
        matches!(self, StockLimit::Units(0))
    }

    /// Check if `quantity` units fit within the limit.
    pub fn allows(&self, quantity: u64) -> bool {
        match self {
            StockLimit::Unlimited => true,
            StockLimit::Units(n) => quantity <= u64::from(*n),
        }
    }

    /// Clamp `quantity` to the limit.
    pub fn clamp(&self, quantity: u64) -> u64 {
        match self {
            StockLimit::Unlimited => quantity,
            StockLimit::Units(n) => quantity.min(u64::from(*n)),
        }
    }
}

impl From<Option<u32>> for StockLimit {
    fn from(limit: Option<u32>) -> Self {
        limit.map_or(StockLimit::Unlimited, StockLimit::Units)
    }
}

/// Product details needed to put a new line into the cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewItem {
    pub id: ProductId,
    pub name: String,
    pub unit_price: u64,
    pub image_url: Option<String>,
}

impl NewItem {
    /// Describe a product without an image.
    pub fn new(id: ProductId, name: impl Into<String>, unit_price: u64) -> Self {
        Self {
            id,
            name: name.into(),
            unit_price,
            image_url: None,
        }
    }

    /// Attach an image URL. An empty URL means no image.
    pub fn with_image(mut self, url: impl Into<String>) -> Self {
        let url = url.into();
        self.image_url = (!url.is_empty()).then_some(url);
        self
    }
}

/// Outcome of a successful add.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LineItemUpdate {
    /// Product whose line changed.
    pub product_id: ProductId,
    /// Quantity of the line after the add.
    pub quantity: u32,
    /// The line did not exist before.
    pub is_new: bool,
    /// Fewer units than requested were added because of the stock limit.
    pub clamped: bool,
}

/// A line item in the cart.
///
/// Field names on the wire follow the persisted cart record:
/// `{id, name, price, quantity, image}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LineItem {
    /// Product identifier, unique within the cart.
    pub id: ProductId,
    /// Product name (denormalized for display).
    pub name: String,
    /// Unit price in minor currency units.
    #[serde(rename = "price")]
    pub unit_price: u64,
    /// Quantity, always at least 1.
    pub quantity: u32,
    /// Product image URL.
    #[serde(rename = "image")]
    pub image_url: Option<String>,
}

impl LineItem {
    /// Price of the whole line (`unit_price * quantity`).
    pub fn line_total(&self) -> u64 {
        self.unit_price.saturating_mul(u64::from(self.quantity))
    }
}

/// A shopping cart: line items in insertion order.
///
/// Invariants: product ids are unique, every quantity is at least 1 and the
/// subtotal fits in a `u64`. Failed operations leave the cart unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<LineItem>,
}

impl Cart {
    /// Create an empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a cart from lines that already satisfy the invariants.
    pub(crate) fn from_normalized(items: Vec<LineItem>) -> Self {
        Self { items }
    }

    /// Add units of a product.
    ///
    /// An existing line grows by `requested`, clamped to `limit`; a new line is
    /// appended with `min(requested, limit)` units.
    ///
    /// Returns an error if:
    /// - `requested` is zero
    /// - the product is out of stock
    /// - the line already holds the whole stock
    /// - the subtotal would overflow
    pub fn add_item(
        &mut self,
        item: NewItem,
        requested: u32,
        limit: StockLimit,
    ) -> Result<LineItemUpdate, CartError> {
        if requested == 0 {
            return Err(CartError::InvalidQuantity(0));
        }
        if limit.is_out_of_stock() {
            return Err(CartError::OutOfStock {
                product_id: item.id,
            });
        }

        let existing = self.quantity_of(item.id);
        if let Some(available) = limit.units() {
            if existing >= available {
                return Err(CartError::InsufficientStock {
                    product_id: item.id,
                    requested: u64::from(existing) + u64::from(requested),
                    available,
                });
            }
        }

        let wanted = u64::from(existing) + u64::from(requested);
        let granted = limit.clamp(wanted);
        let quantity = u32::try_from(granted).map_err(|_| CartError::Overflow)?;

        if let Some(unit_price) = self.get(item.id).map(|line| line.unit_price) {
            Self::ensure_fits(&self.items, item.id, unit_price, quantity)?;
            if let Some(line) = self.items.iter_mut().find(|i| i.id == item.id) {
                line.quantity = quantity;
            }
        } else {
            Self::ensure_fits(&self.items, item.id, item.unit_price, quantity)?;
            self.items.push(LineItem {
                id: item.id,
                name: item.name,
                unit_price: item.unit_price,
                quantity,
                image_url: item.image_url.filter(|url| !url.is_empty()),
            });
        }

        Ok(LineItemUpdate {
            product_id: item.id,
            quantity,
            is_new: existing == 0,
            clamped: granted < wanted,
        })
    }

    /// Set a line's quantity exactly.
    ///
    /// A quantity of zero or less removes the line. Returns whether the cart
    /// changed; setting a quantity for a product not in the cart does nothing,
    /// whatever the stock limit.
    pub fn set_quantity(
        &mut self,
        id: ProductId,
        quantity: i64,
        limit: StockLimit,
    ) -> Result<bool, CartError> {
        if quantity <= 0 {
            return Ok(self.remove_item(id));
        }
        let Some(unit_price) = self.get(id).map(|line| line.unit_price) else {
            return Ok(false);
        };

        let wanted = u64::try_from(quantity).map_err(|_| CartError::InvalidQuantity(quantity))?;
        if !limit.allows(wanted) {
            return Err(CartError::InsufficientStock {
                product_id: id,
                requested: wanted,
                available: limit.units().unwrap_or(u32::MAX),
            });
        }
        let quantity = u32::try_from(wanted).map_err(|_| CartError::InvalidQuantity(quantity))?;
        Self::ensure_fits(&self.items, id, unit_price, quantity)?;

        if let Some(line) = self.items.iter_mut().find(|i| i.id == id) {
            line.quantity = quantity;
        }
        Ok(true)
    }

    /// Remove a line. Returns whether it was present.
    pub fn remove_item(&mut self, id: ProductId) -> bool {
        let len_before = self.items.len();
        self.items.retain(|i| i.id != id);
        self.items.len() < len_before
    }

    /// Clear all items from the cart.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Line items in insertion order.
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Get a line by product ID.
    pub fn get(&self, id: ProductId) -> Option<&LineItem> {
        self.items.iter().find(|i| i.id == id)
    }

    /// Quantity of a product in the cart (0 if absent).
    pub fn quantity_of(&self, id: ProductId) -> u32 {
        self.get(id).map_or(0, |line| line.quantity)
    }

    /// Get total item count (sum of quantities).
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.quantity)).sum()
    }

    /// Get number of unique items.
    pub fn unique_item_count(&self) -> usize {
        self.items.len()
    }

    /// Check if cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of all line totals.
    pub fn subtotal(&self) -> u64 {
        self.items
            .iter()
            .fold(0_u64, |acc, line| acc.saturating_add(line.line_total()))
    }

    /// Derive subtotal, shipping fee and total under a shipping policy.
    pub fn totals(&self, policy: &ShippingPolicy) -> CartTotals {
        CartTotals::compute(self.subtotal(), policy)
    }

    /// Checked subtotal of `items`, or `None` on overflow.
    pub(crate) fn checked_subtotal<'a>(items: impl IntoIterator<Item = &'a LineItem>) -> Option<u64> {
        items.into_iter().try_fold(0_u64, |acc, line| {
            line.unit_price
                .checked_mul(u64::from(line.quantity))
                .and_then(|total| acc.checked_add(total))
        })
    }

    /// Verify the subtotal still fits once `id` holds `quantity` units at `unit_price`.
    fn ensure_fits(
        items: &[LineItem],
        id: ProductId,
        unit_price: u64,
        quantity: u32,
    ) -> Result<(), CartError> {
        Self::checked_subtotal(items.iter().filter(|i| i.id != id))
            .and_then(|sum| {
                unit_price
                    .checked_mul(u64::from(quantity))
                    .and_then(|line| sum.checked_add(line))
            })
            .map(|_| ())
            .ok_or(CartError::Overflow)
    }
}
