//! PostgreSQL integration tests for the order store.
//!
//! These tests use a shared PostgreSQL container for efficiency.
//! Run with:
//!
//! ```bash
//! cargo test -p orders --test postgres_integration -- --test-threads=1
//! ```

use std::sync::Arc;

use common::{Money, PageRequest, ProductId, UserId};
use orders::{LineDraft, OrderDraft, OrderStore, PostgresOrderStore};
use sqlx::PgPool;
use testcontainers::{ContainerAsync, runners::AsyncRunner};
use testcontainers_modules::postgres::Postgres;
use tokio::sync::OnceCell;

/// Shared container info - container stays alive for all tests
struct ContainerInfo {
    #[allow(dead_code)] // Container must stay alive for tests
    container: ContainerAsync<Postgres>,
    connection_string: String,
}

/// Global shared container
static CONTAINER: OnceCell<Arc<ContainerInfo>> = OnceCell::const_new();

async fn get_container_info() -> Arc<ContainerInfo> {
    CONTAINER
        .get_or_init(|| async {
            let container = Postgres::default().start().await.unwrap();

            let host = container.get_host().await.unwrap();
            let port = container.get_host_port_ipv4(5432).await.unwrap();

            let connection_string =
                format!("postgres://postgres:postgres@{}:{}/postgres", host, port);

            // Create a temporary pool just for migrations
            let temp_pool = PgPool::connect(&connection_string).await.unwrap();

            sqlx::raw_sql(include_str!(
                "../../../migrations/001_create_products_table.sql"
            ))
            .execute(&temp_pool)
            .await
            .unwrap();
            sqlx::raw_sql(include_str!(
                "../../../migrations/002_create_orders_tables.sql"
            ))
            .execute(&temp_pool)
            .await
            .unwrap();

            temp_pool.close().await;

            Arc::new(ContainerInfo {
                container,
                connection_string,
            })
        })
        .await
        .clone()
}

/// Get a fresh store with its own pool and cleared tables
async fn get_test_store() -> PostgresOrderStore {
    let info = get_container_info().await;

    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&info.connection_string)
        .await
        .unwrap();

    // Clear tables for test isolation
    sqlx::query("TRUNCATE TABLE order_lines, orders, products")
        .execute(&pool)
        .await
        .unwrap();

    PostgresOrderStore::new(pool)
}

fn line(name: &str, quantity: u32, unit_price: Money) -> LineDraft {
    LineDraft {
        product_id: ProductId::new(),
        product_name: name.to_string(),
        quantity,
        unit_price,
        discount: Money::zero(),
        line_total: unit_price.multiply(quantity),
    }
}

fn draft(user_id: UserId, lines: Vec<LineDraft>) -> OrderDraft {
    let total: Money = lines.iter().map(|l| l.line_total).sum();
    OrderDraft {
        user_id,
        lines,
        order_total: total,
        total_discount: Money::zero(),
    }
}

#[tokio::test]
async fn insert_and_find_order_with_lines() {
    let store = get_test_store().await;
    let user_id = UserId::new();

    let inserted = store
        .insert(draft(
            user_id,
            vec![
                line("Widget", 2, Money::from_dollars(10)),
                line("Gadget", 1, Money::from_dollars(25)),
            ],
        ))
        .await
        .unwrap();

    let fetched = store.find_by_id(inserted.id).await.unwrap().unwrap();
    assert_eq!(fetched.id, inserted.id);
    assert_eq!(fetched.user_id, user_id);
    assert_eq!(fetched.order_total, Money::from_dollars(45));
    assert_eq!(fetched.lines.len(), 2);
    // Lines come back in insertion order.
    assert_eq!(fetched.lines[0].product_name, "Widget");
    assert_eq!(fetched.lines[1].product_name, "Gadget");
    assert_eq!(fetched.lines[0].quantity, 2);
    assert_eq!(fetched.lines[0].unit_price, Money::from_dollars(10));
}

#[tokio::test]
async fn find_unknown_order_returns_none() {
    let store = get_test_store().await;
    assert!(
        store
            .find_by_id(common::OrderId::new())
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn find_by_owner_returns_only_that_users_orders_newest_first() {
    let store = get_test_store().await;
    let alice = UserId::new();
    let bob = UserId::new();

    let first = store
        .insert(draft(alice, vec![line("A", 1, Money::from_dollars(1))]))
        .await
        .unwrap();
    let second = store
        .insert(draft(alice, vec![line("B", 1, Money::from_dollars(2))]))
        .await
        .unwrap();
    store
        .insert(draft(bob, vec![line("C", 1, Money::from_dollars(3))]))
        .await
        .unwrap();

    let page = store
        .find_by_owner(alice, PageRequest::new(0, 10))
        .await
        .unwrap();
    assert_eq!(page.total_items, 2);
    assert_eq!(page.items[0].id, second.id);
    assert_eq!(page.items[1].id, first.id);
    assert!(page.items.iter().all(|o| o.user_id == alice));
    // Paged orders carry their full lines.
    assert_eq!(page.items[0].lines.len(), 1);
}

#[tokio::test]
async fn find_all_paginates_across_users() {
    let store = get_test_store().await;

    for i in 0..5 {
        store
            .insert(draft(
                UserId::new(),
                vec![line(&format!("P{i}"), 1, Money::from_dollars(1))],
            ))
            .await
            .unwrap();
    }

    let page = store.find_all(PageRequest::new(0, 2)).await.unwrap();
    assert_eq!(page.total_items, 5);
    assert_eq!(page.total_pages, 3);
    assert_eq!(page.items.len(), 2);

    let last = store.find_all(PageRequest::new(2, 2)).await.unwrap();
    assert_eq!(last.items.len(), 1);
}

#[tokio::test]
async fn delete_soft_deletes_order_and_lines() {
    let store = get_test_store().await;
    let user_id = UserId::new();

    let order = store
        .insert(draft(user_id, vec![line("Widget", 1, Money::from_dollars(10))]))
        .await
        .unwrap();

    assert!(store.delete(order.id).await.unwrap());
    assert!(store.find_by_id(order.id).await.unwrap().is_none());
    assert!(!store.delete(order.id).await.unwrap());

    // Rows survive as soft-deleted, not removed.
    let remaining: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders WHERE deleted = TRUE")
        .fetch_one(store.pool())
        .await
        .unwrap();
    assert_eq!(remaining, 1);
}

#[tokio::test]
async fn deleted_orders_are_excluded_from_listings() {
    let store = get_test_store().await;
    let user_id = UserId::new();

    let keep = store
        .insert(draft(user_id, vec![line("Keep", 1, Money::from_dollars(1))]))
        .await
        .unwrap();
    let drop = store
        .insert(draft(user_id, vec![line("Drop", 1, Money::from_dollars(1))]))
        .await
        .unwrap();
    store.delete(drop.id).await.unwrap();

    let page = store
        .find_by_owner(user_id, PageRequest::new(0, 10))
        .await
        .unwrap();
    assert_eq!(page.total_items, 1);
    assert_eq!(page.items[0].id, keep.id);
}
