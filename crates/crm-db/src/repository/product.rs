//! # Product Repository
//!
//! Database operations for products, including the low-stock restock pass.

use sqlx::SqlitePool;
use tracing::{debug, info};

use crm_core::filter::{BoundPredicate, SortKey};
use crm_core::{Product, LOW_STOCK_THRESHOLD, RESTOCK_QUANTITY};

use crate::error::{DbError, DbResult};
use crate::query::{bind_values, order_clause, where_clause};
use crate::repository::placeholders;

/// Repository for product operations.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Inserts a new product.
    pub async fn insert(&self, product: &Product) -> DbResult<()> {
        debug!(id = %product.id, name = %product.name, "Inserting product");

        sqlx::query(
            "INSERT INTO products (id, name, price_cents, stock, created_at) \
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(product.price_cents)
        .bind(product.stock)
        .bind(product.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Fetches a product by id.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Product> {
        sqlx::query_as::<_, Product>(
            "SELECT id, name, price_cents, stock, created_at FROM products WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DbError::not_found("Product", id))
    }

    /// Fetches all products with the given ids, ordered by id.
    ///
    /// Missing ids are simply absent from the result; callers compare
    /// lengths to detect them.
    pub async fn get_many(&self, ids: &[String]) -> DbResult<Vec<Product>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let sql = format!(
            "SELECT id, name, price_cents, stock, created_at FROM products \
             WHERE id IN ({}) ORDER BY id ASC",
            placeholders(ids.len())
        );

        let mut query = sqlx::query_as::<_, Product>(&sql);
        for id in ids {
            query = query.bind(id);
        }

        Ok(query.fetch_all(&self.pool).await?)
    }

    /// Lists products matching the given predicates, in the given order.
    pub async fn list(
        &self,
        predicates: &[BoundPredicate],
        sort: &[SortKey],
    ) -> DbResult<Vec<Product>> {
        let (where_sql, binds) = where_clause(predicates);
        let order_sql = order_clause(sort);

        let sql = format!(
            "SELECT id, name, price_cents, stock, created_at FROM products {where_sql} {order_sql}"
        );

        let products = bind_values(sqlx::query_as::<_, Product>(&sql), &binds)
            .fetch_all(&self.pool)
            .await?;

        Ok(products)
    }

    /// Total number of products.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Tops up every low-stock product by the restock quantity.
    ///
    /// Selection and update run in one transaction so a product cannot
    /// be restocked twice by concurrent passes. Returns the updated
    /// products ordered by id; empty when nothing was below threshold.
    pub async fn restock_low_stock(&self) -> DbResult<Vec<Product>> {
        let mut tx = self.pool.begin().await?;

        let low_ids: Vec<String> =
            sqlx::query_scalar("SELECT id FROM products WHERE stock < ? ORDER BY id ASC")
                .bind(LOW_STOCK_THRESHOLD)
                .fetch_all(&mut *tx)
                .await?;

        if low_ids.is_empty() {
            tx.commit().await?;
            return Ok(Vec::new());
        }

        sqlx::query("UPDATE products SET stock = stock + ? WHERE stock < ?")
            .bind(RESTOCK_QUANTITY)
            .bind(LOW_STOCK_THRESHOLD)
            .execute(&mut *tx)
            .await?;

        let sql = format!(
            "SELECT id, name, price_cents, stock, created_at FROM products \
             WHERE id IN ({}) ORDER BY id ASC",
            placeholders(low_ids.len())
        );
        let mut query = sqlx::query_as::<_, Product>(&sql);
        for id in &low_ids {
            query = query.bind(id);
        }
        let restocked = query.fetch_all(&mut *tx).await?;

        tx.commit().await?;

        info!(count = restocked.len(), "Restocked low-stock products");
        Ok(restocked)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
