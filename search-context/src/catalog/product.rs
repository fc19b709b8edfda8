use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A product document as stored in the `products` index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub price: f64,
    pub category: String,
}

impl Product {
    /// Create a product with a fresh random ID.
    pub fn new(name: impl Into<String>, price: f64, category: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            price,
            category: category.into(),
        }
    }

    /// Replace the generated ID.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_generates_unique_ids() {
        let a = Product::new("Product 1", 10.0, "Category A");
        let b = Product::new("Product 1", 10.0, "Category A");
        assert_ne!(a.id, b.id);
        assert!(Uuid::parse_str(&a.id).is_ok());
    }

    #[test]
    fn test_document_shape() {
        let product = Product::new("PS5 slim", 1000.0, "Game Console").with_id("1");
        let value = serde_json::to_value(&product).unwrap();
        assert_eq!(
            value,
            json!({"id": "1", "name": "PS5 slim", "price": 1000.0, "category": "Game Console"})
        );
    }
}
