use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use common::{Page, PageRequest, ProductId};
use tokio::sync::RwLock;

use crate::{
    Result,
    product::{NewProduct, Product},
    store::{CatalogStore, Decrement, ProductFilter},
};

/// In-memory catalog store implementation for testing.
///
/// Stores all products in memory behind a lock and provides the same
/// contract as the PostgreSQL implementation, including the atomicity of
/// compare-and-decrement (the write lock spans the check and the update).
#[derive(Clone, Default)]
pub struct InMemoryCatalogStore {
    products: Arc<RwLock<HashMap<ProductId, Product>>>,
}

impl InMemoryCatalogStore {
    /// Creates a new empty in-memory catalog store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the total number of product rows, soft-deleted included.
    pub async fn product_count(&self) -> usize {
        self.products.read().await.len()
    }

    /// Reads the stored quantity regardless of the deleted flag.
    /// Test helper for asserting rollback behavior.
    pub async fn raw_quantity(&self, id: ProductId) -> Option<u32> {
        self.products.read().await.get(&id).map(|p| p.quantity)
    }
}

#[async_trait]
impl CatalogStore for InMemoryCatalogStore {
    async fn insert(&self, product: NewProduct) -> Result<Product> {
        let now = Utc::now();
        let record = Product {
            id: ProductId::new(),
            name: product.name,
            description: product.description,
            price: product.price,
            quantity: product.quantity,
            deleted: false,
            created_at: now,
            updated_at: now,
        };
        self.products
            .write()
            .await
            .insert(record.id, record.clone());
        Ok(record)
    }

    async fn get(&self, id: ProductId) -> Result<Option<Product>> {
        let products = self.products.read().await;
        Ok(products.get(&id).filter(|p| !p.deleted).cloned())
    }

    async fn update(&self, id: ProductId, product: NewProduct) -> Result<Option<Product>> {
        let mut products = self.products.write().await;
        let Some(record) = products.get_mut(&id).filter(|p| !p.deleted) else {
            return Ok(None);
        };
        record.name = product.name;
        record.description = product.description;
        record.price = product.price;
        record.quantity = product.quantity;
        record.updated_at = Utc::now();
        Ok(Some(record.clone()))
    }

    async fn soft_delete(&self, id: ProductId) -> Result<bool> {
        let mut products = self.products.write().await;
        match products.get_mut(&id).filter(|p| !p.deleted) {
            Some(record) => {
                record.deleted = true;
                record.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn compare_and_decrement(
        &self,
        id: ProductId,
        amount: u32,
        expected: u32,
    ) -> Result<Decrement> {
        let mut products = self.products.write().await;
        let Some(record) = products.get_mut(&id).filter(|p| !p.deleted) else {
            return Ok(Decrement::Conflict);
        };

        if record.quantity != expected || expected < amount {
            return Ok(Decrement::Conflict);
        }

        record.quantity -= amount;
        record.updated_at = Utc::now();
        Ok(Decrement::Applied)
    }

    async fn release(&self, id: ProductId, amount: u32) -> Result<bool> {
        let mut products = self.products.write().await;
        match products.get_mut(&id) {
            Some(record) => {
                record.quantity += amount;
                record.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn search(&self, filter: ProductFilter, page: PageRequest) -> Result<Page<Product>> {
        let products = self.products.read().await;
        let mut matching: Vec<Product> = products
            .values()
            .filter(|p| filter.matches(p))
            .cloned()
            .collect();
        matching.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(Page::paginate(matching, page))
    }
}
