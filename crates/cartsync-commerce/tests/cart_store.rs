//! End-to-end cart store behaviour on both storage backends.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use cartsync_commerce::cart::CART_KEY;
use cartsync_commerce::prelude::*;
use cartsync_store::{FileStorage, MemoryStorage, Storage};
use tempfile::tempdir;

fn lipstick() -> NewItem {
    NewItem::new(ProductId::new(1), "Matte Lipstick", 125_000)
}

#[test]
fn add_twice_then_exceed_stock() {
    let mut store = CartStore::open(MemoryStorage::new());

    let first = store.add_item(lipstick(), 1, StockLimit::Units(5)).unwrap();
    assert_eq!(first.quantity, 1);
    assert_eq!(store.totals(&ShippingPolicy::default()).subtotal, 125_000);

    let second = store.add_item(lipstick(), 1, StockLimit::Units(5)).unwrap();
    assert_eq!(second.quantity, 2);
    assert_eq!(store.totals(&ShippingPolicy::default()).subtotal, 250_000);

    let err = store
        .set_quantity(ProductId::new(1), 10, StockLimit::Units(5))
        .unwrap_err();
    assert!(matches!(err, CartError::InsufficientStock { .. }));
    assert_eq!(store.get(ProductId::new(1)).unwrap().quantity, 2);
}

#[test]
fn out_of_stock_leaves_cart_unchanged() {
    let storage = Arc::new(MemoryStorage::new());
    let mut store = CartStore::open(storage.clone());

    let err = store.add_item(lipstick(), 1, StockLimit::Units(0)).unwrap_err();
    assert!(matches!(err, CartError::OutOfStock { .. }));
    assert!(store.is_empty());
    assert!(storage.get(CART_KEY).unwrap().is_none());
}

#[test]
fn shipping_threshold_scenario() {
    let policy = ShippingPolicy::new(70_000, 500_000);

    let mut store = CartStore::open(MemoryStorage::new());
    store
        .add_item(NewItem::new(ProductId::new(1), "Kit", 250_000), 2, StockLimit::Unlimited)
        .unwrap();
    let totals = store.totals(&policy);
    assert_eq!((totals.shipping_fee, totals.total), (0, 500_000));

    store
        .set_quantity(ProductId::new(1), 1, StockLimit::Unlimited)
        .unwrap();
    store
        .add_item(NewItem::new(ProductId::new(2), "Pin", 249_999), 1, StockLimit::Unlimited)
        .unwrap();
    let totals = store.totals(&policy);
    assert_eq!(totals.subtotal, 499_999);
    assert_eq!((totals.shipping_fee, totals.total), (70_000, 569_999));
    assert_eq!(store.totals(&policy), totals);
}

#[test]
fn clear_persists_empty_record() {
    let dir = tempdir().unwrap();
    let mut store = CartStore::open(FileStorage::open(dir.path()).unwrap());
    store.add_item(lipstick(), 3, StockLimit::Unlimited).unwrap();
    store.clear().unwrap();

    assert_eq!(store.item_count(), 0);
    let reopened = FileStorage::open(dir.path()).unwrap();
    assert_eq!(reopened.get(CART_KEY).unwrap().as_deref(), Some("[]"));
}

#[test]
fn file_round_trip_preserves_order() {
    let dir = tempdir().unwrap();
    {
        let mut store = CartStore::open(FileStorage::open(dir.path()).unwrap());
        for (id, price) in [(5_u64, 10_u64), (2, 20), (9, 30)] {
            store
                .add_item(
                    NewItem::new(ProductId::new(id), format!("p{id}"), price).with_image("/i.jpg"),
                    id as u32,
                    StockLimit::Unlimited,
                )
                .unwrap();
        }
    }

    let store = CartStore::open(FileStorage::open(dir.path()).unwrap());
    let ids: Vec<u64> = store.cart().items().iter().map(|i| i.id.get()).collect();
    assert_eq!(ids, vec![5, 2, 9]);
    assert_eq!(store.item_count(), 16);
    assert_eq!(store.get(ProductId::new(2)).unwrap().image_url.as_deref(), Some("/i.jpg"));
}

#[test]
fn malformed_records_load_empty() {
    for text in ["{", "", "null", "{\"items\":[]}", "not json"] {
        let storage = Arc::new(MemoryStorage::with_entry(CART_KEY, text));
        let store = CartStore::open(storage.clone());
        assert!(store.is_empty(), "{text:?} should load empty");
    }
}

#[test]
fn malformed_record_is_rewritten() {
    let storage = Arc::new(MemoryStorage::with_entry(CART_KEY, "{"));
    let _store = CartStore::open(storage.clone());
    assert_eq!(storage.get(CART_KEY).unwrap().as_deref(), Some("[]"));
}

#[test]
fn legacy_record_is_normalized() {
    let legacy = r##"[
        {"id": 1, "name": "Lipstick", "price": "125000", "quantity": 1, "image": "", "color": "#f00"},
        {"id": 1, "name": "Lipstick", "price": "125000", "quantity": 2},
        {"id": 2, "name": "Broken", "price": "n/a", "quantity": 1}
    ]"##;
    let storage = Arc::new(MemoryStorage::with_entry(CART_KEY, legacy));
    let store = CartStore::open(storage.clone());

    assert_eq!(store.item_count(), 3);
    assert_eq!(store.cart().unique_item_count(), 1);
    assert_eq!(
        storage.get(CART_KEY).unwrap().as_deref(),
        Some(r#"[{"id":1,"name":"Lipstick","price":125000,"quantity":3,"image":null}]"#)
    );
}

#[test]
fn set_zero_equals_remove() {
    let mut a = CartStore::open(MemoryStorage::new());
    let mut b = CartStore::open(MemoryStorage::new());
    for store in [&mut a, &mut b] {
        store.add_item(lipstick(), 2, StockLimit::Unlimited).unwrap();
    }

    a.set_quantity(ProductId::new(1), 0, StockLimit::Unlimited).unwrap();
    b.remove_item(ProductId::new(1)).unwrap();
    assert_eq!(a.snapshot(), b.snapshot());
    assert_eq!(a.to_record().unwrap(), b.to_record().unwrap());
}

#[test]
fn observers_see_each_successful_mutation() {
    let mut store = CartStore::open(MemoryStorage::new());
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    store.on_change(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    store.add_item(lipstick(), 1, StockLimit::Units(1)).unwrap();
    assert!(store.add_item(lipstick(), 1, StockLimit::Units(1)).is_err());
    store.set_quantity(ProductId::new(1), 1, StockLimit::Units(1)).unwrap();
    store.remove_item(ProductId::new(1)).unwrap();
    store.clear().unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 4);
}

#[test]
fn catalog_driven_adds() {
    let page: ProductPage = serde_json::from_str(
        r#"{"products": [
            {"id": 1, "name": "Lipstick", "price": "125000", "stock_quantity": 2,
             "images": [{"id": 1, "image": "/lip.jpg", "is_primary": true, "order": 0}]},
            {"id": 2, "name": "Sold out", "price": "50000", "stock_quantity": 0}
        ], "has_next": false}"#,
    )
    .unwrap();
    let mut catalog = Catalog::new();
    catalog.extend_page(page);

    let mut store = CartStore::open(MemoryStorage::new());
    let update = store.add_from_catalog(&catalog, ProductId::new(1), 5).unwrap();
    assert_eq!(update.quantity, 2);
    assert!(update.clamped);
    assert_eq!(store.get(ProductId::new(1)).unwrap().image_url.as_deref(), Some("/lip.jpg"));

    assert!(matches!(
        store.add_from_catalog(&catalog, ProductId::new(2), 1),
        Err(CartError::OutOfStock { .. })
    ));
    assert!(matches!(
        store.add_from_catalog(&catalog, ProductId::new(3), 1),
        Err(CartError::ProductNotFound(_))
    ));
    assert!(matches!(
        store.set_quantity_from_catalog(&catalog, ProductId::new(1), 3),
        Err(CartError::InsufficientStock { .. })
    ));
    store
        .set_quantity_from_catalog(&catalog, ProductId::new(1), 0)
        .unwrap();
    assert!(store.is_empty());
}
