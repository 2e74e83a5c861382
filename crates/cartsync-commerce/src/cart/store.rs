//! The authoritative cart state, persisted after every mutation.

use std::fmt;

use cartsync_store::{validate_key, Storage};
use tracing::{debug, warn};

use crate::cart::record::{decode_cart, encode_cart, CART_KEY};
use crate::cart::{Cart, CartTotals, LineItem, LineItemUpdate, NewItem, ShippingPolicy, StockLimit};
use crate::catalog::Catalog;
use crate::error::CartError;
use crate::ids::ProductId;

/// Callback invoked with the updated cart after each successful mutation.
pub type Observer = Box<dyn Fn(&Cart) + Send + Sync>;

/// Handle returned by [`CartStore::on_change`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Single source of truth for the cart.
///
/// Every mutation builds the next state, writes it to storage and only then
/// replaces the in-memory cart and runs observers. A failed write leaves both
/// the store and storage holding the previous state.
pub struct CartStore<S: Storage> {
    storage: S,
    key: String,
    cart: Cart,
    observers: Vec<(SubscriptionId, Observer)>,
    next_subscription: u64,
}

impl<S: Storage> CartStore<S> {
    /// Open the store on the default `cart` key and hydrate it.
    pub fn open(storage: S) -> Self {
        let mut store = Self {
            storage,
            key: CART_KEY.to_string(),
            cart: Cart::new(),
            observers: Vec::new(),
            next_subscription: 0,
        };
        store.load();
        store
    }

    /// Open the store on a custom key and hydrate it.
    pub fn with_key(storage: S, key: impl Into<String>) -> Result<Self, CartError> {
        let key = key.into();
        validate_key(&key)?;
        let mut store = Self {
            storage,
            key,
            cart: Cart::new(),
            observers: Vec::new(),
            next_subscription: 0,
        };
        store.load();
        Ok(store)
    }

    /// Read the persisted record into memory.
    ///
    /// Never fails: unreadable storage and malformed records yield an empty
    /// cart. Malformed or repaired records are written back in normalized form.
    pub fn load(&mut self) -> &Cart {
        let text = match self.storage.get(&self.key) {
            Ok(text) => text,
            Err(e) => {
                warn!(key = %self.key, error = %e, "failed to read cart record");
                self.cart = Cart::new();
                return &self.cart;
            }
        };

        let Some(text) = text else {
            self.cart = Cart::new();
            return &self.cart;
        };

        match decode_cart(&text) {
            Ok(decoded) => {
                if !decoded.is_clean() {
                    warn!(
                        key = %self.key,
                        dropped = decoded.dropped,
                        merged = decoded.merged,
                        "repaired cart record"
                    );
                    self.rewrite(&decoded.cart);
                }
                self.cart = decoded.cart;
            }
            Err(e) => {
                warn!(key = %self.key, error = %e, "discarding malformed cart record");
                self.cart = Cart::new();
                self.rewrite(&Cart::new());
            }
        }
        debug!(key = %self.key, lines = self.cart.unique_item_count(), "loaded cart");
        &self.cart
    }

    /// Re-read storage, notifying observers if another writer changed the cart.
    pub fn reload(&mut self) -> &Cart {
        let before = self.cart.clone();
        self.load();
        if self.cart != before {
            self.notify();
        }
        &self.cart
    }

    /// Add units of a product, clamped to its stock limit.
    pub fn add_item(
        &mut self,
        item: NewItem,
        requested: u32,
        limit: StockLimit,
    ) -> Result<LineItemUpdate, CartError> {
        let mut next = self.cart.clone();
        let update = next.add_item(item, requested, limit)?;
        self.commit(next)?;
        debug!(
            product_id = %update.product_id,
            quantity = update.quantity,
            clamped = update.clamped,
            "added to cart"
        );
        Ok(update)
    }

    /// Set a line's quantity exactly. Zero or less removes the line.
    ///
    /// Setting the quantity of a product that is not in the cart does nothing.
    pub fn set_quantity(
        &mut self,
        id: ProductId,
        quantity: i64,
        limit: StockLimit,
    ) -> Result<(), CartError> {
        if quantity <= 0 {
            return self.remove_item(id);
        }
        let mut next = self.cart.clone();
        if !next.set_quantity(id, quantity, limit)? {
            return Ok(());
        }
        self.commit(next)?;
        debug!(product_id = %id, quantity, "set cart quantity");
        Ok(())
    }

    /// Remove a line. Persists even when the line was absent.
    pub fn remove_item(&mut self, id: ProductId) -> Result<(), CartError> {
        let mut next = self.cart.clone();
        let removed = next.remove_item(id);
        self.commit(next)?;
        debug!(product_id = %id, removed, "removed from cart");
        Ok(())
    }

    /// Empty the cart.
    pub fn clear(&mut self) -> Result<(), CartError> {
        self.commit(Cart::new())?;
        debug!("cleared cart");
        Ok(())
    }

    /// Add a catalog product, using its price, image and stock.
    pub fn add_from_catalog(
        &mut self,
        catalog: &Catalog,
        id: ProductId,
        requested: u32,
    ) -> Result<LineItemUpdate, CartError> {
        let product = catalog.get(id).ok_or(CartError::ProductNotFound(id))?;
        self.add_item(product.to_new_item(), requested, product.stock_limit())
    }

    /// Set a quantity against the catalog stock. Zero or less removes the line
    /// even if the product has left the catalog.
    pub fn set_quantity_from_catalog(
        &mut self,
        catalog: &Catalog,
        id: ProductId,
        quantity: i64,
    ) -> Result<(), CartError> {
        if quantity <= 0 {
            return self.remove_item(id);
        }
        let product = catalog.get(id).ok_or(CartError::ProductNotFound(id))?;
        self.set_quantity(id, quantity, product.stock_limit())
    }

    /// Register an observer. Observers run in registration order.
    pub fn on_change<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: Fn(&Cart) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.observers.push((id, Box::new(callback)));
        id
    }

    /// Remove an observer. Returns whether it was registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let len_before = self.observers.len();
        self.observers.retain(|(sub, _)| *sub != id);
        self.observers.len() < len_before
    }

    /// Derive totals under a shipping policy.
    pub fn totals(&self, policy: &ShippingPolicy) -> CartTotals {
        self.cart.totals(policy)
    }

    /// Sum of quantities.
    pub fn item_count(&self) -> u64 {
        self.cart.item_count()
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// An owned copy of the current cart.
    pub fn snapshot(&self) -> Cart {
        self.cart.clone()
    }

    pub fn get(&self, id: ProductId) -> Option<&LineItem> {
        self.cart.get(id)
    }

    pub fn is_empty(&self) -> bool {
        self.cart.is_empty()
    }

    /// Storage key holding the record.
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Persisted form of the current cart.
    pub fn to_record(&self) -> Result<String, CartError> {
        encode_cart(&self.cart)
    }

    fn commit(&mut self, next: Cart) -> Result<(), CartError> {
        let text = encode_cart(&next)?;
        if let Err(e) = self.storage.set(&self.key, &text) {
            warn!(key = %self.key, error = %e, "failed to persist cart");
            return Err(e.into());
        }
        self.cart = next;
        self.notify();
        Ok(())
    }

    fn rewrite(&self, cart: &Cart) {
        let result = encode_cart(cart)
            .and_then(|text| self.storage.set(&self.key, &text).map_err(CartError::from));
        if let Err(e) = result {
            warn!(key = %self.key, error = %e, "failed to rewrite cart record");
        }
    }

    fn notify(&self) {
        for (_, observer) in &self.observers {
            observer(&self.cart);
        }
    }
}

impl<S: Storage> fmt::Debug for CartStore<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CartStore")
            .field("key", &self.key)
            .field("cart", &self.cart)
            .field("observers", &self.observers.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cartsync_store::{MemoryStorage, StorageError};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    fn lipstick() -> NewItem {
        NewItem::new(ProductId::new(1), "Lipstick", 125_000)
    }

    /// Storage whose writes can be switched off.
    #[derive(Default)]
    struct FlakyStorage {
        inner: MemoryStorage,
        fail_writes: std::sync::atomic::AtomicBool,
    }

    impl Storage for FlakyStorage {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            self.inner.get(key)
        }

        fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(StorageError::OpenError("disk full".into()));
            }
            self.inner.set(key, value)
        }

        fn remove(&self, key: &str) -> Result<(), StorageError> {
            self.inner.remove(key)
        }

        fn keys(&self) -> Result<Vec<String>, StorageError> {
            self.inner.keys()
        }
    }

    #[test]
    fn test_mutations_persist() {
        let storage = Arc::new(MemoryStorage::new());
        let mut store = CartStore::open(storage.clone());

        store.add_item(lipstick(), 2, StockLimit::Unlimited).unwrap();
        let record = storage.get(CART_KEY).unwrap().unwrap();
        assert!(record.contains(r#""quantity":2"#));

        store.clear().unwrap();
        assert_eq!(storage.get(CART_KEY).unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_observers_run_in_order_once_per_mutation() {
        let mut store = CartStore::open(MemoryStorage::new());
        let log = Arc::new(Mutex::new(Vec::new()));

        let first = log.clone();
        store.on_change(move |cart| first.lock().unwrap().push(("first", cart.item_count())));
        let second = log.clone();
        store.on_change(move |cart| second.lock().unwrap().push(("second", cart.item_count())));

        store.add_item(lipstick(), 1, StockLimit::Units(5)).unwrap();
        assert_eq!(*log.lock().unwrap(), vec![("first", 1), ("second", 1)]);

        let _ = store.add_item(lipstick(), 1, StockLimit::Units(0));
        let _ = store.set_quantity(ProductId::new(1), 9, StockLimit::Units(5));
        assert_eq!(log.lock().unwrap().len(), 2);
    }

    #[test]
    fn test_unsubscribe() {
        let mut store = CartStore::open(MemoryStorage::new());
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let id = store.on_change(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        store.add_item(lipstick(), 1, StockLimit::Unlimited).unwrap();
        assert!(store.unsubscribe(id));
        assert!(!store.unsubscribe(id));
        store.clear().unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_failed_write_keeps_previous_state() {
        let storage = Arc::new(FlakyStorage::default());
        let mut store = CartStore::open(storage.clone());
        store.add_item(lipstick(), 1, StockLimit::Unlimited).unwrap();

        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        store.on_change(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        storage.fail_writes.store(true, Ordering::SeqCst);
        let err = store.add_item(lipstick(), 1, StockLimit::Unlimited).unwrap_err();
        assert!(matches!(err, CartError::Storage(_)));
        assert_eq!(store.item_count(), 1);
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        let record = storage.get(CART_KEY).unwrap().unwrap();
        assert!(record.contains(r#""quantity":1"#));
    }

    #[test]
    fn test_set_quantity_missing_does_not_persist() {
        let storage = Arc::new(MemoryStorage::new());
        let mut store = CartStore::open(storage.clone());
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        store.on_change(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        store
            .set_quantity(ProductId::new(42), 3, StockLimit::Unlimited)
            .unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(storage.get(CART_KEY).unwrap().is_none());
    }

    #[test]
    fn test_remove_absent_still_persists() {
        let storage = Arc::new(MemoryStorage::new());
        let mut store = CartStore::open(storage.clone());
        store.remove_item(ProductId::new(5)).unwrap();
        assert_eq!(storage.get(CART_KEY).unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_custom_key() {
        let storage = Arc::new(MemoryStorage::new());
        let mut store = CartStore::with_key(storage.clone(), "guest-cart").unwrap();
        store.add_item(lipstick(), 1, StockLimit::Unlimited).unwrap();
        assert!(storage.get("guest-cart").unwrap().is_some());
        assert!(storage.get(CART_KEY).unwrap().is_none());

        assert!(CartStore::with_key(MemoryStorage::new(), "../cart").is_err());
    }

    #[test]
    fn test_reload_notifies_on_external_change() {
        let storage = Arc::new(MemoryStorage::new());
        let mut store = CartStore::open(storage.clone());
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        store.on_change(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        storage
            .set(CART_KEY, r#"[{"id":1,"name":"a","price":10,"quantity":4}]"#)
            .unwrap();
        store.reload();
        assert_eq!(store.item_count(), 4);
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        store.reload();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
