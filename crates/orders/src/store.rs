//! The order store contract.

use async_trait::async_trait;
use common::{OrderId, Page, PageRequest, UserId};

use crate::StoreError;
use crate::order::{Order, OrderDraft};

/// Store of immutable order records.
///
/// `insert` is the single durable write of a placement: the order and all
/// of its lines become visible together or not at all. Identity and
/// timestamps are assigned by the store.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Persists a draft atomically, returning the stored order.
    async fn insert(&self, draft: OrderDraft) -> Result<Order, StoreError>;

    /// Fetches an order with its lines. Soft-deleted orders are absent.
    async fn find_by_id(&self, id: OrderId) -> Result<Option<Order>, StoreError>;

    /// Pages over one user's orders, newest first.
    async fn find_by_owner(
        &self,
        user_id: UserId,
        page: PageRequest,
    ) -> Result<Page<Order>, StoreError>;

    /// Pages over all orders, newest first.
    async fn find_all(&self, page: PageRequest) -> Result<Page<Order>, StoreError>;

    /// Soft-deletes an order and its lines in the same transaction.
    /// Returns true if a live order was deleted.
    async fn delete(&self, id: OrderId) -> Result<bool, StoreError>;
}
