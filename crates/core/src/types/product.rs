//! Catalog product as served by the backend.

use serde::{Deserialize, Serialize};

use super::{Price, ProductId};

/// A product from `GET /api/products`.
///
/// Read-only on this side: the storefront never edits products, it only
/// replaces the whole list with a fresh response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub price: Price,
    #[serde(default)]
    pub image_url: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_product_from_backend_json() {
        let json = r#"{
            "id": 1,
            "title": "Zaatar",
            "description": "Aleppo blend",
            "price": 1000,
            "image_url": "https://cdn.example.com/zaatar.jpg"
        }"#;

        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.id, ProductId::new(1));
        assert_eq!(product.price, Price::new(1000));
        assert_eq!(
            product.image_url.as_deref(),
            Some("https://cdn.example.com/zaatar.jpg")
        );
    }

    #[test]
    fn test_product_optional_fields() {
        let json = r#"{"id": 2, "title": "Olive soap", "price": 500, "image_url": null}"#;

        let product: Product = serde_json::from_str(json).unwrap();
        assert!(product.image_url.is_none());
        assert!(product.description.is_empty());
    }
}
