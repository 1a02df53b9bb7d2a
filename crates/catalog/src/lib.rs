//! Product catalog store for the product-order system.
//!
//! Provides the [`CatalogStore`] contract consumed by the order placement
//! engine (product lookup plus atomic compare-and-decrement of stock),
//! along with an in-memory implementation for tests and a PostgreSQL
//! implementation for production.

pub mod error;
pub mod memory;
pub mod postgres;
pub mod product;
pub mod store;

pub use error::{CatalogError, Result};
pub use memory::InMemoryCatalogStore;
pub use postgres::PostgresCatalogStore;
pub use product::{NewProduct, Product};
pub use store::{CatalogStore, Decrement, ProductFilter};
