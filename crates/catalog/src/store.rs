//! The catalog store contract.

use async_trait::async_trait;
use common::{Money, Page, PageRequest, ProductId};

use crate::Result;
use crate::product::{NewProduct, Product};

/// Outcome of a compare-and-decrement attempt.
///
/// `Conflict` means the product's stored quantity no longer matches the
/// quantity the caller observed (or the product vanished); the caller
/// re-reads and retries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decrement {
    /// The decrement was applied atomically.
    Applied,
    /// The stored quantity did not match the expected value.
    Conflict,
}

impl Decrement {
    /// Returns true if the decrement was applied.
    pub fn is_applied(&self) -> bool {
        matches!(self, Decrement::Applied)
    }
}

/// Search predicates for catalog queries. All filters are conjunctive;
/// soft-deleted products are always excluded.
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    pub name_contains: Option<String>,
    pub min_price: Option<Money>,
    pub max_price: Option<Money>,
    pub available: Option<bool>,
}

impl ProductFilter {
    /// Creates an empty filter matching every live product.
    pub fn new() -> Self {
        Self::default()
    }

    /// Filters by case-insensitive name substring.
    pub fn name_contains(mut self, name: impl Into<String>) -> Self {
        self.name_contains = Some(name.into());
        self
    }

    /// Filters by minimum unit price (inclusive).
    pub fn min_price(mut self, price: Money) -> Self {
        self.min_price = Some(price);
        self
    }

    /// Filters by maximum unit price (inclusive).
    pub fn max_price(mut self, price: Money) -> Self {
        self.max_price = Some(price);
        self
    }

    /// Filters by availability (quantity > 0).
    pub fn available(mut self, available: bool) -> Self {
        self.available = Some(available);
        self
    }

    /// Returns true if the product passes every configured predicate.
    /// Used by the in-memory implementation.
    pub fn matches(&self, product: &Product) -> bool {
        if product.deleted {
            return false;
        }
        if let Some(ref needle) = self.name_contains
            && !product
                .name
                .to_lowercase()
                .contains(&needle.to_lowercase())
        {
            return false;
        }
        if let Some(min) = self.min_price
            && product.price < min
        {
            return false;
        }
        if let Some(max) = self.max_price
            && product.price > max
        {
            return false;
        }
        if let Some(available) = self.available
            && product.is_available() != available
        {
            return false;
        }
        true
    }
}

/// Store of product records with atomic stock reservation.
///
/// `compare_and_decrement` is the serialization point between concurrent
/// order placements: it succeeds only when the stored quantity still
/// matches the value the caller observed and covers the requested amount,
/// so two placements can never both consume the same unit of stock.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Inserts a new product, assigning its id and timestamps.
    async fn insert(&self, product: NewProduct) -> Result<Product>;

    /// Fetches a product by id. Soft-deleted products are absent.
    async fn get(&self, id: ProductId) -> Result<Option<Product>>;

    /// Replaces a product's caller-supplied fields.
    /// Returns the updated record, or `None` if the product is absent.
    async fn update(&self, id: ProductId, product: NewProduct) -> Result<Option<Product>>;

    /// Soft-deletes a product. Returns true if a live product was deleted.
    async fn soft_delete(&self, id: ProductId) -> Result<bool>;

    /// Atomically decrements stock by `amount` if the stored quantity still
    /// equals `expected` and `expected >= amount`.
    async fn compare_and_decrement(
        &self,
        id: ProductId,
        amount: u32,
        expected: u32,
    ) -> Result<Decrement>;

    /// Returns previously decremented stock, compensating a failed
    /// placement. Applies even to products soft-deleted in the interim.
    /// Returns true if the product row exists.
    async fn release(&self, id: ProductId, amount: u32) -> Result<bool>;

    /// Searches live products matching the filter, ordered by name.
    async fn search(&self, filter: ProductFilter, page: PageRequest) -> Result<Page<Product>>;
}
