//! Catalog product types as served by the product listing API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::cart::{NewItem, StockLimit};
use crate::ids::{ImageId, ProductId};
use crate::lenient;

/// A product image.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductImage {
    pub id: ImageId,
    /// Image URL.
    #[serde(rename = "image")]
    pub url: String,
    #[serde(default)]
    pub alt_text: Option<String>,
    #[serde(default)]
    pub is_primary: bool,
    /// Position among the product's images.
    #[serde(default)]
    pub order: i32,
}

/// A product in the storefront catalog.
///
/// Prices arrive as decimal strings (`"125000"`) or numbers. A missing
/// `stock_quantity` counts as zero units.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogProduct {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub slug: String,
    /// Unit price in minor currency units.
    #[serde(deserialize_with = "lenient::price")]
    pub price: u64,
    /// Price before discount.
    #[serde(default, deserialize_with = "lenient::optional_price")]
    pub original_price: Option<u64>,
    #[serde(default)]
    pub discount_percentage: Option<u32>,
    #[serde(default)]
    pub has_discount: bool,
    #[serde(default)]
    pub category_name: Option<String>,
    #[serde(default)]
    pub category_slug: Option<String>,
    #[serde(default)]
    pub brand_name: Option<String>,
    #[serde(default)]
    pub brand_slug: Option<String>,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub review_count: u32,
    #[serde(default)]
    pub is_bestseller: bool,
    #[serde(default)]
    pub is_new: bool,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default)]
    pub is_luxury: bool,
    /// Units in stock.
    #[serde(default, deserialize_with = "lenient::stock_count")]
    pub stock_quantity: i64,
    #[serde(default)]
    pub images: Vec<ProductImage>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub short_description: Option<String>,
    #[serde(default, deserialize_with = "timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

impl CatalogProduct {
    /// The image to show first: the primary one, else the lowest `order`,
    /// else none.
    pub fn primary_image(&self) -> Option<&ProductImage> {
        self.images
            .iter()
            .find(|img| img.is_primary)
            .or_else(|| self.images.iter().min_by_key(|img| img.order))
    }

    /// Purchasable units for the cart.
    pub fn stock_limit(&self) -> StockLimit {
        StockLimit::from_stock_count(self.stock_quantity)
    }

    pub fn is_in_stock(&self) -> bool {
        !self.stock_limit().is_out_of_stock()
    }

    /// Cart line details taken from the structured product data.
    pub fn to_new_item(&self) -> NewItem {
        let item = NewItem::new(self.id, self.name.clone(), self.price);
        match self.primary_image() {
            Some(img) => item.with_image(img.url.clone()),
            None => item,
        }
    }
}

/// One page of the product listing.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ProductPage {
    pub products: Vec<CatalogProduct>,
    /// More pages follow.
    #[serde(default)]
    pub has_next: bool,
    #[serde(default)]
    pub current_page: Option<u32>,
}

fn timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value
        .as_str()
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc)))
}


#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"{
        "products": [{
            "id": 12,
            "name": "Matte Lipstick",
            "slug": "matte-lipstick",
            "price": "125000",
            "original_price": "150000",
            "discount_percentage": 17,
            "has_discount": true,
            "category_name": "Lips",
            "category_slug": "lips",
            "brand_name": null,
            "brand_slug": null,
            "rating": 4.5,
            "review_count": 8,
            "is_bestseller": true,
            "is_new": false,
            "is_featured": false,
            "is_luxury": false,
            "stock_quantity": 3,
            "images": [
                {"id": 2, "image": "/media/b.jpg", "alt_text": "", "is_primary": false, "order": 1},
                {"id": 1, "image": "/media/a.jpg", "alt_text": "", "is_primary": true, "order": 2}
            ],
            "created_at": "2024-03-01T10:00:00Z"
        }],
        "has_next": true,
        "current_page": 1
    }"#;

    #[test]
    fn test_decode_page() {
        let page: ProductPage = serde_json::from_str(PAGE).unwrap();
        assert!(page.has_next);
        let product = &page.products[0];
        assert_eq!(product.price, 125_000);
        assert_eq!(product.original_price, Some(150_000));
        assert_eq!(product.stock_limit(), StockLimit::Units(3));
        assert_eq!(product.primary_image().unwrap().url, "/media/a.jpg");
        assert!(product.created_at.is_some());
    }

    #[test]
    fn test_missing_stock_is_out_of_stock() {
        let product: CatalogProduct =
            serde_json::from_str(r#"{"id": 1, "name": "x", "price": 10}"#).unwrap();
        assert_eq!(product.stock_quantity, 0);
        assert!(!product.is_in_stock());
        assert!(product.created_at.is_none());
    }

    #[test]
    fn test_primary_image_falls_back_to_order() {
        let mut product = fixtures::product(1, "x", 10, 1);
        product.images = vec![
            ProductImage {
                id: ImageId::new(1),
                url: "/late.jpg".into(),
                alt_text: None,
                is_primary: false,
                order: 5,
            },
            ProductImage {
                id: ImageId::new(2),
                url: "/early.jpg".into(),
                alt_text: None,
                is_primary: false,
                order: 0,
            },
        ];
        assert_eq!(product.primary_image().unwrap().url, "/early.jpg");
        assert_eq!(product.to_new_item().image_url.as_deref(), Some("/early.jpg"));
    }

    #[test]
    fn test_to_new_item_uses_structured_price() {
        let item = fixtures::product(4, "Mascara", 89_000, 2).to_new_item();
        assert_eq!(item.unit_price, 89_000);
        assert_eq!(item.name, "Mascara");
        assert!(item.image_url.is_none());
    }

    #[test]
    fn test_to_new_item_drops_empty_image_url() {
        let mut product = fixtures::product(5, "Blush", 60_000, 2);
        product.images = vec![ProductImage {
            id: ImageId::new(1),
            url: String::new(),
            alt_text: None,
            is_primary: true,
            order: 0,
        }];
        assert!(product.to_new_item().image_url.is_none());
    }
}
