//! Order error taxonomy.

use catalog::CatalogError;
use common::{Money, OrderId, ProductId};
use thiserror::Error;

/// Errors that can occur when interacting with the order store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A database error occurred.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A database migration error occurred.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Errors surfaced by the order placement engine and its read operations.
///
/// Every failure path maps to exactly one variant; nothing is retried
/// automatically and nothing is swallowed. All validation variants are
/// produced before any stock mutation; mutation failures roll back the
/// in-progress placement before propagating.
#[derive(Debug, Error)]
pub enum OrderError {
    /// The call carried no requester identity.
    #[error("Not authenticated")]
    NotAuthenticated,

    /// The operation requires the admin role.
    #[error("Admin role required")]
    Forbidden,

    /// A requested product is absent or soft-deleted.
    #[error("Product not found: {product_id}")]
    ProductNotFound { product_id: ProductId },

    /// Available stock does not cover the requested quantity.
    #[error(
        "Insufficient stock for product '{product_name}'. Requested: {requested}, Available: {available}"
    )]
    InsufficientStock {
        product_name: String,
        requested: u32,
        available: u32,
    },

    /// The order does not exist, or the requester may not see it;
    /// the two are deliberately indistinguishable.
    #[error("Order not found: {order_id}")]
    OrderNotFound { order_id: OrderId },

    /// The placement request carried no lines.
    #[error("Order must contain at least one line")]
    EmptyOrder,

    /// A line requested a non-positive quantity.
    #[error("Invalid quantity {quantity} for product {product_id} (must be greater than 0)")]
    InvalidQuantity {
        product_id: ProductId,
        quantity: u32,
    },

    /// The configured rule set produced a discount outside `[0, subtotal]`.
    /// Surfaced rather than clamped so a misconfigured rule is visible.
    #[error("Discount configuration violation: discount {discount} for subtotal {subtotal}")]
    Configuration { subtotal: Money, discount: Money },

    /// The catalog store failed.
    #[error("Catalog store failure: {0}")]
    Catalog(#[from] CatalogError),

    /// The order store failed.
    #[error("Order store failure: {0}")]
    Store(#[from] StoreError),
}

/// Result type alias for order operations.
pub type Result<T> = std::result::Result<T, OrderError>;
