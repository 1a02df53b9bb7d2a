//! Product record owned by the catalog store.

use chrono::{DateTime, Utc};
use common::{Money, ProductId};
use serde::{Deserialize, Serialize};

/// A catalog product.
///
/// `quantity` is the stock available for new orders and is never negative;
/// a decrement that would drive it negative fails at the store level.
/// Soft-deleted products keep their row but are excluded from lookups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub price: Money,
    pub quantity: u32,
    pub deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Returns true if the product can currently be ordered.
    pub fn is_available(&self) -> bool {
        self.quantity > 0 && !self.deleted
    }
}

/// Fields supplied by the caller when creating or replacing a product;
/// the store assigns identity and timestamps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: Money,
    pub quantity: u32,
}

impl NewProduct {
    /// Creates a new product definition.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        price: Money,
        quantity: u32,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            price,
            quantity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(quantity: u32, deleted: bool) -> Product {
        Product {
            id: ProductId::new(),
            name: "Widget".to_string(),
            description: String::new(),
            price: Money::from_cents(1000),
            quantity,
            deleted,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_available_requires_stock() {
        assert!(product(1, false).is_available());
        assert!(!product(0, false).is_available());
    }

    #[test]
    fn test_deleted_product_is_not_available() {
        assert!(!product(10, true).is_available());
    }

    #[test]
    fn test_serialization_roundtrip() {
        let product = product(5, false);
        let json = serde_json::to_string(&product).unwrap();
        let deserialized: Product = serde_json::from_str(&json).unwrap();
        assert_eq!(product, deserialized);
    }
}
