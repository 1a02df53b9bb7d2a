use async_trait::async_trait;
use common::{Money, Page, PageRequest, ProductId};
use sqlx::{PgPool, Row, postgres::PgRow};
use uuid::Uuid;

use crate::{
    Result,
    product::{NewProduct, Product},
    store::{CatalogStore, Decrement, ProductFilter},
};

/// PostgreSQL-backed catalog store implementation.
///
/// Compare-and-decrement is a single conditional `UPDATE`, so the
/// quantity check and the write are atomic at the database level.
#[derive(Clone)]
pub struct PostgresCatalogStore {
    pool: PgPool,
}

impl PostgresCatalogStore {
    /// Creates a new PostgreSQL catalog store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> std::result::Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("../../migrations").run(&self.pool).await?;
        tracing::info!("catalog migrations applied");
        Ok(())
    }

    fn row_to_product(row: PgRow) -> Result<Product> {
        Ok(Product {
            id: ProductId::from_uuid(row.try_get::<Uuid, _>("id")?),
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            price: Money::from_cents(row.try_get("price_cents")?),
            quantity: row.try_get::<i64, _>("quantity")? as u32,
            deleted: row.try_get("deleted")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

#[async_trait]
impl CatalogStore for PostgresCatalogStore {
    async fn insert(&self, product: NewProduct) -> Result<Product> {
        let row = sqlx::query(
            r#"
            INSERT INTO products (id, name, description, price_cents, quantity)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, description, price_cents, quantity, deleted, created_at, updated_at
            "#,
        )
        .bind(ProductId::new().as_uuid())
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price.cents())
        .bind(product.quantity as i64)
        .fetch_one(&self.pool)
        .await?;

        Self::row_to_product(row)
    }

    async fn get(&self, id: ProductId) -> Result<Option<Product>> {
        let row = sqlx::query(
            r#"
            SELECT id, name, description, price_cents, quantity, deleted, created_at, updated_at
            FROM products
            WHERE id = $1 AND deleted = FALSE
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_product).transpose()
    }

    async fn update(&self, id: ProductId, product: NewProduct) -> Result<Option<Product>> {
        let row = sqlx::query(
            r#"
            UPDATE products
            SET name = $2, description = $3, price_cents = $4, quantity = $5, updated_at = NOW()
            WHERE id = $1 AND deleted = FALSE
            RETURNING id, name, description, price_cents, quantity, deleted, created_at, updated_at
            "#,
        )
        .bind(id.as_uuid())
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price.cents())
        .bind(product.quantity as i64)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_product).transpose()
    }

    async fn soft_delete(&self, id: ProductId) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE products SET deleted = TRUE, updated_at = NOW() WHERE id = $1 AND deleted = FALSE",
        )
        .bind(id.as_uuid())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn compare_and_decrement(
        &self,
        id: ProductId,
        amount: u32,
        expected: u32,
    ) -> Result<Decrement> {
        let result = sqlx::query(
            r#"
            UPDATE products
            SET quantity = quantity - $2, updated_at = NOW()
            WHERE id = $1
              AND deleted = FALSE
              AND quantity = $3
              AND quantity >= $2
            "#,
        )
        .bind(id.as_uuid())
        .bind(amount as i64)
        .bind(expected as i64)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() > 0 {
            Ok(Decrement::Applied)
        } else {
            tracing::debug!(
                product_id = %id,
                amount,
                expected,
                "stock decrement did not match the expected quantity"
            );
            Ok(Decrement::Conflict)
        }
    }

    async fn release(&self, id: ProductId, amount: u32) -> Result<bool> {
        // Deliberately ignores the deleted flag: compensation must restore
        // stock even if the product was removed mid-placement.
        let result = sqlx::query(
            "UPDATE products SET quantity = quantity + $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(id.as_uuid())
        .bind(amount as i64)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn search(&self, filter: ProductFilter, page: PageRequest) -> Result<Page<Product>> {
        let mut where_clause = String::from(" WHERE deleted = FALSE");
        let mut param_count = 0;

        if filter.name_contains.is_some() {
            param_count += 1;
            where_clause.push_str(&format!(" AND name ILIKE '%' || ${param_count} || '%'"));
        }
        if filter.min_price.is_some() {
            param_count += 1;
            where_clause.push_str(&format!(" AND price_cents >= ${param_count}"));
        }
        if filter.max_price.is_some() {
            param_count += 1;
            where_clause.push_str(&format!(" AND price_cents <= ${param_count}"));
        }
        if let Some(available) = filter.available {
            if available {
                where_clause.push_str(" AND quantity > 0");
            } else {
                where_clause.push_str(" AND quantity = 0");
            }
        }

        let count_sql = format!("SELECT COUNT(*) FROM products{where_clause}");
        let select_sql = format!(
            "SELECT id, name, description, price_cents, quantity, deleted, created_at, updated_at \
             FROM products{where_clause} ORDER BY name ASC LIMIT ${} OFFSET ${}",
            param_count + 1,
            param_count + 2,
        );

        let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
        let mut select_query = sqlx::query(&select_sql);

        if let Some(ref name) = filter.name_contains {
            count_query = count_query.bind(name.clone());
            select_query = select_query.bind(name.clone());
        }
        if let Some(min) = filter.min_price {
            count_query = count_query.bind(min.cents());
            select_query = select_query.bind(min.cents());
        }
        if let Some(max) = filter.max_price {
            count_query = count_query.bind(max.cents());
            select_query = select_query.bind(max.cents());
        }

        let total_items = count_query.fetch_one(&self.pool).await?;
        let rows = select_query
            .bind(page.limit() as i64)
            .bind(page.offset() as i64)
            .fetch_all(&self.pool)
            .await?;

        let items = rows
            .into_iter()
            .map(Self::row_to_product)
            .collect::<Result<Vec<_>>>()?;

        Ok(Page::from_parts(items, page, total_items as u64))
    }
}
