//! Order placement engine for the product-order system.
//!
//! This crate provides the core transaction of the system:
//! - `Order`/`OrderLine` immutable order records
//! - a composable, additive discount policy evaluated at placement time
//! - `OrderService`, which validates requests, atomically reserves stock
//!   through the catalog store, and persists orders all-or-nothing
//! - the `OrderStore` contract with in-memory and PostgreSQL backends

pub mod discount;
pub mod error;
pub mod memory;
pub mod order;
pub mod postgres;
pub mod service;
pub mod store;

pub use discount::{DiscountConfig, DiscountPolicy, DiscountRule};
pub use error::{OrderError, StoreError};
pub use memory::InMemoryOrderStore;
pub use order::{LineDraft, LineRequest, Order, OrderDraft, OrderLine};
pub use postgres::PostgresOrderStore;
pub use service::OrderService;
pub use store::OrderStore;
