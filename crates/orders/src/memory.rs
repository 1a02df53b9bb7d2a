use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use common::{LineId, OrderId, Page, PageRequest, UserId};
use tokio::sync::RwLock;

use crate::StoreError;
use crate::order::{Order, OrderDraft, OrderLine};
use crate::store::OrderStore;

#[derive(Default)]
struct State {
    orders: HashMap<OrderId, Order>,
    deleted: HashMap<OrderId, Order>,
    fail_on_insert: bool,
}

/// In-memory order store implementation for testing.
///
/// Provides the same contract as the PostgreSQL implementation and can be
/// configured to fail the next insert, for exercising placement rollback.
#[derive(Clone, Default)]
pub struct InMemoryOrderStore {
    state: Arc<RwLock<State>>,
}

impl InMemoryOrderStore {
    /// Creates a new empty in-memory order store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the store to fail insert calls.
    pub async fn set_fail_on_insert(&self, fail: bool) {
        self.state.write().await.fail_on_insert = fail;
    }

    /// Returns the number of live orders.
    pub async fn order_count(&self) -> usize {
        self.state.read().await.orders.len()
    }
}

fn sorted_newest_first(mut orders: Vec<Order>) -> Vec<Order> {
    orders.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.as_uuid().cmp(&a.id.as_uuid())));
    orders
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn insert(&self, draft: OrderDraft) -> Result<Order, StoreError> {
        let mut state = self.state.write().await;

        if state.fail_on_insert {
            return Err(StoreError::Database(sqlx::Error::Io(
                std::io::Error::other("simulated insert failure"),
            )));
        }

        let now = Utc::now();
        let order = Order {
            id: OrderId::new(),
            user_id: draft.user_id,
            lines: draft
                .lines
                .into_iter()
                .map(|line| OrderLine {
                    id: LineId::new(),
                    product_id: line.product_id,
                    product_name: line.product_name,
                    quantity: line.quantity,
                    unit_price: line.unit_price,
                    discount: line.discount,
                    line_total: line.line_total,
                })
                .collect(),
            order_total: draft.order_total,
            total_discount: draft.total_discount,
            created_at: now,
            updated_at: now,
        };

        state.orders.insert(order.id, order.clone());
        Ok(order)
    }

    async fn find_by_id(&self, id: OrderId) -> Result<Option<Order>, StoreError> {
        Ok(self.state.read().await.orders.get(&id).cloned())
    }

    async fn find_by_owner(
        &self,
        user_id: UserId,
        page: PageRequest,
    ) -> Result<Page<Order>, StoreError> {
        let state = self.state.read().await;
        let owned: Vec<Order> = state
            .orders
            .values()
            .filter(|o| o.user_id == user_id)
            .cloned()
            .collect();
        Ok(Page::paginate(sorted_newest_first(owned), page))
    }

    async fn find_all(&self, page: PageRequest) -> Result<Page<Order>, StoreError> {
        let state = self.state.read().await;
        let all: Vec<Order> = state.orders.values().cloned().collect();
        Ok(Page::paginate(sorted_newest_first(all), page))
    }

    async fn delete(&self, id: OrderId) -> Result<bool, StoreError> {
        let mut state = self.state.write().await;
        match state.orders.remove(&id) {
            Some(order) => {
                // Lines travel with the order record, so removing the
                // order removes them in the same step, mirroring the
                // transactional cascade of the SQL implementation.
                state.deleted.insert(id, order);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::order::LineDraft;
    use common::{Money, ProductId};

    fn draft(user_id: UserId, cents: i64) -> OrderDraft {
        let unit_price = Money::from_cents(cents);
        OrderDraft {
            user_id,
            lines: vec![LineDraft {
                product_id: ProductId::new(),
                product_name: "Widget".to_string(),
                quantity: 1,
                unit_price,
                discount: Money::zero(),
                line_total: unit_price,
            }],
            order_total: unit_price,
            total_discount: Money::zero(),
        }
    }

    #[tokio::test]
    async fn insert_assigns_ids_and_timestamps() {
        let store = InMemoryOrderStore::new();
        let user_id = UserId::new();

        let order = store.insert(draft(user_id, 1000)).await.unwrap();

        assert_eq!(order.user_id, user_id);
        assert_eq!(order.lines.len(), 1);
        assert_eq!(order.created_at, order.updated_at);

        let fetched = store.find_by_id(order.id).await.unwrap().unwrap();
        assert_eq!(fetched, order);
    }

    #[tokio::test]
    async fn find_missing_order_is_none() {
        let store = InMemoryOrderStore::new();
        assert!(store.find_by_id(OrderId::new()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn find_by_owner_filters_and_orders_newest_first() {
        let store = InMemoryOrderStore::new();
        let alice = UserId::new();
        let bob = UserId::new();

        let first = store.insert(draft(alice, 100)).await.unwrap();
        let second = store.insert(draft(alice, 200)).await.unwrap();
        store.insert(draft(bob, 300)).await.unwrap();

        let page = store
            .find_by_owner(alice, PageRequest::default())
            .await
            .unwrap();
        assert_eq!(page.total_items, 2);
        let ids: Vec<OrderId> = page.items.iter().map(|o| o.id).collect();
        assert!(ids.contains(&first.id));
        assert!(ids.contains(&second.id));
        // Newest first.
        assert!(page.items[0].created_at >= page.items[1].created_at);
    }

    #[tokio::test]
    async fn find_all_pages() {
        let store = InMemoryOrderStore::new();
        let user_id = UserId::new();
        for cents in 0..5 {
            store.insert(draft(user_id, 100 + cents)).await.unwrap();
        }

        let page = store.find_all(PageRequest::new(0, 2)).await.unwrap();
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.total_items, 5);
        assert_eq!(page.total_pages, 3);
    }

    #[tokio::test]
    async fn delete_removes_order_and_lines() {
        let store = InMemoryOrderStore::new();
        let order = store.insert(draft(UserId::new(), 1000)).await.unwrap();

        assert!(store.delete(order.id).await.unwrap());
        assert!(store.find_by_id(order.id).await.unwrap().is_none());
        assert!(!store.delete(order.id).await.unwrap());
    }

    #[tokio::test]
    async fn fail_on_insert_fails() {
        let store = InMemoryOrderStore::new();
        store.set_fail_on_insert(true).await;

        let result = store.insert(draft(UserId::new(), 1000)).await;
        assert!(result.is_err());
        assert_eq!(store.order_count().await, 0);

        store.set_fail_on_insert(false).await;
        assert!(store.insert(draft(UserId::new(), 1000)).await.is_ok());
    }
}
