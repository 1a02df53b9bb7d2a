use std::collections::HashMap;

use async_trait::async_trait;
use common::{LineId, Money, OrderId, Page, PageRequest, ProductId, UserId};
use sqlx::{PgPool, Row, postgres::PgRow};
use uuid::Uuid;

use crate::StoreError;
use crate::order::{Order, OrderDraft, OrderLine};
use crate::store::OrderStore;

/// PostgreSQL-backed order store implementation.
///
/// `insert` writes the order row and every line row in one transaction;
/// `delete` soft-deletes the order and cascades to its lines in the same
/// transaction.
#[derive(Clone)]
pub struct PostgresOrderStore {
    pool: PgPool,
}

impl PostgresOrderStore {
    /// Creates a new PostgreSQL order store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("../../migrations").run(&self.pool).await
    }

    fn row_to_line(row: &PgRow) -> Result<OrderLine, StoreError> {
        Ok(OrderLine {
            id: LineId::from_uuid(row.try_get::<Uuid, _>("id")?),
            product_id: ProductId::from_uuid(row.try_get::<Uuid, _>("product_id")?),
            product_name: row.try_get("product_name")?,
            quantity: row.try_get::<i64, _>("quantity")? as u32,
            unit_price: Money::from_cents(row.try_get("unit_price_cents")?),
            discount: Money::from_cents(row.try_get("discount_cents")?),
            line_total: Money::from_cents(row.try_get("line_total_cents")?),
        })
    }

    fn row_to_order(row: &PgRow, lines: Vec<OrderLine>) -> Result<Order, StoreError> {
        Ok(Order {
            id: OrderId::from_uuid(row.try_get::<Uuid, _>("id")?),
            user_id: UserId::from_uuid(row.try_get::<Uuid, _>("user_id")?),
            lines,
            order_total: Money::from_cents(row.try_get("order_total_cents")?),
            total_discount: Money::from_cents(row.try_get("total_discount_cents")?),
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    /// Fetches the lines for a set of orders, grouped by order id and
    /// ordered by position within each order.
    async fn fetch_lines(
        &self,
        order_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, Vec<OrderLine>>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, order_id, product_id, product_name, quantity,
                   unit_price_cents, discount_cents, line_total_cents
            FROM order_lines
            WHERE order_id = ANY($1) AND deleted = FALSE
            ORDER BY order_id, position ASC
            "#,
        )
        .bind(order_ids)
        .fetch_all(&self.pool)
        .await?;

        let mut lines: HashMap<Uuid, Vec<OrderLine>> = HashMap::new();
        for row in rows {
            let order_id: Uuid = row.try_get("order_id")?;
            lines.entry(order_id).or_default().push(Self::row_to_line(&row)?);
        }
        Ok(lines)
    }

    async fn page_orders(
        &self,
        owner: Option<UserId>,
        page: PageRequest,
    ) -> Result<Page<Order>, StoreError> {
        let (count_sql, select_sql) = match owner {
            Some(_) => (
                "SELECT COUNT(*) FROM orders WHERE deleted = FALSE AND user_id = $1",
                "SELECT id, user_id, order_total_cents, total_discount_cents, created_at, updated_at \
                 FROM orders WHERE deleted = FALSE AND user_id = $1 \
                 ORDER BY created_at DESC, id DESC LIMIT $2 OFFSET $3",
            ),
            None => (
                "SELECT COUNT(*) FROM orders WHERE deleted = FALSE",
                "SELECT id, user_id, order_total_cents, total_discount_cents, created_at, updated_at \
                 FROM orders WHERE deleted = FALSE \
                 ORDER BY created_at DESC, id DESC LIMIT $1 OFFSET $2",
            ),
        };

        let mut count_query = sqlx::query_scalar::<_, i64>(count_sql);
        let mut select_query = sqlx::query(select_sql);
        if let Some(user_id) = owner {
            count_query = count_query.bind(user_id.as_uuid());
            select_query = select_query.bind(user_id.as_uuid());
        }

        let total_items = count_query.fetch_one(&self.pool).await?;
        let rows = select_query
            .bind(page.limit() as i64)
            .bind(page.offset() as i64)
            .fetch_all(&self.pool)
            .await?;

        let ids: Vec<Uuid> = rows
            .iter()
            .map(|row| row.try_get::<Uuid, _>("id"))
            .collect::<Result<_, _>>()?;
        let mut lines = self.fetch_lines(&ids).await?;

        let items = rows
            .iter()
            .map(|row| {
                let id: Uuid = row.try_get("id")?;
                Self::row_to_order(row, lines.remove(&id).unwrap_or_default())
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Page::from_parts(items, page, total_items as u64))
    }
}

#[async_trait]
impl OrderStore for PostgresOrderStore {
    async fn insert(&self, draft: OrderDraft) -> Result<Order, StoreError> {
        let mut tx = self.pool.begin().await?;

        let order_id = OrderId::new();
        let order_row = sqlx::query(
            r#"
            INSERT INTO orders (id, user_id, order_total_cents, total_discount_cents)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, order_total_cents, total_discount_cents, created_at, updated_at
            "#,
        )
        .bind(order_id.as_uuid())
        .bind(draft.user_id.as_uuid())
        .bind(draft.order_total.cents())
        .bind(draft.total_discount.cents())
        .fetch_one(&mut *tx)
        .await?;

        let mut lines = Vec::with_capacity(draft.lines.len());
        for (position, line) in draft.lines.into_iter().enumerate() {
            let line_id = LineId::new();
            sqlx::query(
                r#"
                INSERT INTO order_lines
                    (id, order_id, position, product_id, product_name, quantity,
                     unit_price_cents, discount_cents, line_total_cents)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                "#,
            )
            .bind(line_id.as_uuid())
            .bind(order_id.as_uuid())
            .bind(position as i32)
            .bind(line.product_id.as_uuid())
            .bind(&line.product_name)
            .bind(line.quantity as i64)
            .bind(line.unit_price.cents())
            .bind(line.discount.cents())
            .bind(line.line_total.cents())
            .execute(&mut *tx)
            .await?;

            lines.push(OrderLine {
                id: line_id,
                product_id: line.product_id,
                product_name: line.product_name,
                quantity: line.quantity,
                unit_price: line.unit_price,
                discount: line.discount,
                line_total: line.line_total,
            });
        }

        tx.commit().await?;
        Self::row_to_order(&order_row, lines)
    }

    async fn find_by_id(&self, id: OrderId) -> Result<Option<Order>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT id, user_id, order_total_cents, total_discount_cents, created_at, updated_at
            FROM orders
            WHERE id = $1 AND deleted = FALSE
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let mut lines = self.fetch_lines(&[id.as_uuid()]).await?;
        let order = Self::row_to_order(&row, lines.remove(&id.as_uuid()).unwrap_or_default())?;
        Ok(Some(order))
    }

    async fn find_by_owner(
        &self,
        user_id: UserId,
        page: PageRequest,
    ) -> Result<Page<Order>, StoreError> {
        self.page_orders(Some(user_id), page).await
    }

    async fn find_all(&self, page: PageRequest) -> Result<Page<Order>, StoreError> {
        self.page_orders(None, page).await
    }

    async fn delete(&self, id: OrderId) -> Result<bool, StoreError> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            "UPDATE orders SET deleted = TRUE, updated_at = NOW() WHERE id = $1 AND deleted = FALSE",
        )
        .bind(id.as_uuid())
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(false);
        }

        sqlx::query("UPDATE order_lines SET deleted = TRUE WHERE order_id = $1")
            .bind(id.as_uuid())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(true)
    }
}
