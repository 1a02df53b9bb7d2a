//! Order records and placement request types.

use catalog::Product;
use chrono::{DateTime, Utc};
use common::{LineId, Money, OrderId, ProductId, UserId};
use serde::{Deserialize, Serialize};

/// One requested line of a placement: which product, how many units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineRequest {
    pub product_id: ProductId,
    pub quantity: u32,
}

impl LineRequest {
    /// Creates a line request.
    pub fn new(product_id: ProductId, quantity: u32) -> Self {
        Self {
            product_id,
            quantity,
        }
    }
}

/// A line of a persisted order.
///
/// The unit price is the catalog price captured when the placement read
/// the product; later catalog price changes never affect it. The per-line
/// discount is reserved for future per-line policies and is always zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    pub id: LineId,
    pub product_id: ProductId,
    pub product_name: String,
    pub quantity: u32,
    pub unit_price: Money,
    pub discount: Money,
    pub line_total: Money,
}

/// An immutable, persisted order.
///
/// Lines appear in request order. `order_total` is the subtotal minus
/// `total_discount`; identity and timestamps are assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub lines: Vec<OrderLine>,
    pub order_total: Money,
    pub total_discount: Money,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Sum of line totals before discount.
    pub fn subtotal(&self) -> Money {
        self.lines.iter().map(|line| line.line_total).sum()
    }

    /// Total quantity across all lines.
    pub fn total_quantity(&self) -> u32 {
        self.lines.iter().map(|line| line.quantity).sum()
    }
}

/// A line snapshot built during placement, before the store assigns ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineDraft {
    pub product_id: ProductId,
    pub product_name: String,
    pub quantity: u32,
    pub unit_price: Money,
    pub discount: Money,
    pub line_total: Money,
}

impl LineDraft {
    /// Snapshots a product at its currently read price.
    pub fn capture(product: &Product, quantity: u32) -> Self {
        Self {
            product_id: product.id,
            product_name: product.name.clone(),
            quantity,
            unit_price: product.price,
            discount: Money::zero(),
            line_total: product.price.multiply(quantity),
        }
    }
}

/// A fully computed order awaiting its single durable write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderDraft {
    pub user_id: UserId,
    pub lines: Vec<LineDraft>,
    pub order_total: Money,
    pub total_discount: Money,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(cents: i64, quantity: u32) -> OrderLine {
        let unit_price = Money::from_cents(cents);
        OrderLine {
            id: LineId::new(),
            product_id: ProductId::new(),
            product_name: "Widget".to_string(),
            quantity,
            unit_price,
            discount: Money::zero(),
            line_total: unit_price.multiply(quantity),
        }
    }

    #[test]
    fn test_subtotal_sums_line_totals() {
        let order = Order {
            id: OrderId::new(),
            user_id: UserId::new(),
            lines: vec![line(1000, 2), line(500, 3)],
            order_total: Money::from_cents(3500),
            total_discount: Money::zero(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        assert_eq!(order.subtotal().cents(), 3500);
        assert_eq!(order.total_quantity(), 5);
    }

    #[test]
    fn test_capture_snapshots_price() {
        let product = Product {
            id: ProductId::new(),
            name: "Widget".to_string(),
            description: String::new(),
            price: Money::from_cents(1234),
            quantity: 10,
            deleted: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let draft = LineDraft::capture(&product, 3);
        assert_eq!(draft.unit_price.cents(), 1234);
        assert_eq!(draft.line_total.cents(), 3702);
        assert_eq!(draft.discount, Money::zero());
        assert_eq!(draft.product_name, "Widget");
    }

    #[test]
    fn test_order_serialization_roundtrip() {
        let order = Order {
            id: OrderId::new(),
            user_id: UserId::new(),
            lines: vec![line(999, 1)],
            order_total: Money::from_cents(999),
            total_discount: Money::zero(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_string(&order).unwrap();
        let deserialized: Order = serde_json::from_str(&json).unwrap();
        assert_eq!(order, deserialized);
    }
}
