//! # Order Repository
//!
//! Database operations for orders and their product associations.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crm_core::filter::{BoundPredicate, SortKey};
use crm_core::{Order, Product};

use crate::error::{DbError, DbResult};
use crate::query::{bind_values, order_clause, where_clause};

/// Repository for order operations.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

impl OrderRepository {
    pub fn new(pool: SqlitePool) -> Self {
        OrderRepository { pool }
    }

    /// Inserts an order together with its product associations.
    ///
    /// The order row and every association row commit atomically: a bad
    /// product reference rolls the whole order back, so no header row is
    /// ever left without its lines.
    pub async fn insert_with_products(
        &self,
        order: &Order,
        product_ids: &[String],
    ) -> DbResult<()> {
        debug!(
            id = %order.id,
            customer_id = %order.customer_id,
            products = product_ids.len(),
            "Inserting order"
        );

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "INSERT INTO orders (id, customer_id, total_cents, order_date, created_at) \
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&order.id)
        .bind(&order.customer_id)
        .bind(order.total_cents)
        .bind(order.order_date)
        .bind(order.created_at)
        .execute(&mut *tx)
        .await?;

        for product_id in product_ids {
            sqlx::query("INSERT INTO order_products (order_id, product_id) VALUES (?, ?)")
                .bind(&order.id)
                .bind(product_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    /// Fetches an order by id.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Order> {
        sqlx::query_as::<_, Order>(
            "SELECT id, customer_id, total_cents, order_date, created_at \
             FROM orders WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DbError::not_found("Order", id))
    }

    /// Lists orders matching the given predicates, in the given order.
    pub async fn list(
        &self,
        predicates: &[BoundPredicate],
        sort: &[SortKey],
    ) -> DbResult<Vec<Order>> {
        let (where_sql, binds) = where_clause(predicates);
        let order_sql = order_clause(sort);

        let sql = format!(
            "SELECT id, customer_id, total_cents, order_date, created_at \
             FROM orders {where_sql} {order_sql}"
        );

        let orders = bind_values(sqlx::query_as::<_, Order>(&sql), &binds)
            .fetch_all(&self.pool)
            .await?;

        Ok(orders)
    }

    /// Fetches the products associated with one order, ordered by id.
    pub async fn products_for_order(&self, order_id: &str) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(
            "SELECT p.id, p.name, p.price_cents, p.stock, p.created_at \
             FROM products p \
             JOIN order_products op ON op.product_id = p.id \
             WHERE op.order_id = ? \
             ORDER BY p.id ASC",
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Total number of orders.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Sum of all order totals, in cents.
    ///
    /// Sums the snapshot totals stored on the orders; later price changes
    /// do not move this number.
    pub async fn total_revenue_cents(&self) -> DbResult<i64> {
        let revenue: i64 = sqlx::query_scalar("SELECT COALESCE(SUM(total_cents), 0) FROM orders")
            .fetch_one(&self.pool)
            .await?;
        Ok(revenue)
    }

    /// Orders placed on or after the cutoff, paired with the customer's
    /// email. Ordered by order date, then id.
    pub async fn recent_with_customer_email(
        &self,
        cutoff: DateTime<Utc>,
    ) -> DbResult<Vec<(String, String)>> {
        let rows = sqlx::query_as::<_, (String, String)>(
            "SELECT o.id, c.email \
             FROM orders o \
             JOIN customers c ON c.id = o.customer_id \
             WHERE o.order_date >= ? \
             ORDER BY o.order_date ASC, o.id ASC",
        )
        .bind(cutoff)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use chrono::Duration;
    use crm_core::filter::{Filter, FilterValue, ORDER_FILTERS};
    use crm_core::Customer;
    use uuid::Uuid;

    async fn seed_customer(db: &Database, email: &str) -> Customer {
        let customer = Customer {
            id: Uuid::new_v4().to_string(),
            name: "Test Customer".to_string(),
            email: email.to_string(),
            phone: None,
            created_at: Utc::now(),
        };
        db.customers().insert(&customer).await.unwrap();
        customer
    }

    async fn seed_product(db: &Database, name: &str, price_cents: i64) -> Product {
        let product = Product {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            price_cents,
            stock: 10,
            created_at: Utc::now(),
        };
        db.products().insert(&product).await.unwrap();
        product
    }

    fn order_for(customer_id: &str, total_cents: i64, order_date: DateTime<Utc>) -> Order {
        Order {
            id: Uuid::new_v4().to_string(),
            customer_id: customer_id.to_string(),
            total_cents,
            order_date,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_insert_with_products_and_fetch() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let customer = seed_customer(&db, "alice@example.com").await;
        let mouse = seed_product(&db, "Mouse", 4999).await;
        let keyboard = seed_product(&db, "Keyboard", 7999).await;

        let order = order_for(&customer.id, 4999 + 7999, Utc::now());
        db.orders()
            .insert_with_products(&order, &[mouse.id.clone(), keyboard.id.clone()])
            .await
            .unwrap();

        let fetched = db.orders().get_by_id(&order.id).await.unwrap();
        assert_eq!(fetched.total_cents, 12998);

        let products = db.orders().products_for_order(&order.id).await.unwrap();
        assert_eq!(products.len(), 2);
    }

    #[tokio::test]
    async fn test_unknown_product_rolls_back_whole_order() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let customer = seed_customer(&db, "alice@example.com").await;
        let mouse = seed_product(&db, "Mouse", 4999).await;

        let order = order_for(&customer.id, 4999, Utc::now());
        let err = db
            .orders()
            .insert_with_products(&order, &[mouse.id.clone(), "missing".to_string()])
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));

        // Nothing persisted: no order header, no association rows.
        assert_eq!(db.orders().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_snapshot_total_survives_price_change() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let customer = seed_customer(&db, "alice@example.com").await;
        let widget = seed_product(&db, "Widget", 1500).await;

        let order = order_for(&customer.id, 1500, Utc::now());
        db.orders()
            .insert_with_products(&order, &[widget.id.clone()])
            .await
            .unwrap();

        sqlx::query("UPDATE products SET price_cents = 9999 WHERE id = ?")
            .bind(&widget.id)
            .execute(db.pool())
            .await
            .unwrap();

        let fetched = db.orders().get_by_id(&order.id).await.unwrap();
        assert_eq!(fetched.total_cents, 1500);
    }

    #[tokio::test]
    async fn test_order_date_range_is_inclusive() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let customer = seed_customer(&db, "alice@example.com").await;
        let widget = seed_product(&db, "Widget", 100).await;

        let boundary = Utc::now();
        let order = order_for(&customer.id, 100, boundary);
        db.orders()
            .insert_with_products(&order, &[widget.id.clone()])
            .await
            .unwrap();

        // Order dated exactly on both bounds is included.
        let preds = ORDER_FILTERS
            .bind(&[
                Filter::new("order_date_after", FilterValue::Date(boundary)),
                Filter::new("order_date_before", FilterValue::Date(boundary)),
            ])
            .unwrap();
        let found = db.orders().list(&preds, &[]).await.unwrap();
        assert_eq!(found.len(), 1);

        // Tighten the lower bound past it and it drops out.
        let preds = ORDER_FILTERS
            .bind(&[Filter::new(
                "order_date_after",
                FilterValue::Date(boundary + Duration::seconds(1)),
            )])
            .unwrap();
        assert!(db.orders().list(&preds, &[]).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_revenue_sums_snapshot_totals() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let customer = seed_customer(&db, "alice@example.com").await;
        let widget = seed_product(&db, "Widget", 1000).await;

        for total in [1000_i64, 2500] {
            let order = order_for(&customer.id, total, Utc::now());
            db.orders()
                .insert_with_products(&order, &[widget.id.clone()])
                .await
                .unwrap();
        }

        assert_eq!(db.orders().total_revenue_cents().await.unwrap(), 3500);
    }

    #[tokio::test]
    async fn test_recent_with_customer_email() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let customer = seed_customer(&db, "alice@example.com").await;
        let widget = seed_product(&db, "Widget", 100).await;

        let now = Utc::now();
        let old = order_for(&customer.id, 100, now - Duration::days(30));
        let fresh = order_for(&customer.id, 100, now - Duration::days(2));
        for order in [&old, &fresh] {
            db.orders()
                .insert_with_products(order, &[widget.id.clone()])
                .await
                .unwrap();
        }

        let recent = db
            .orders()
            .recent_with_customer_email(now - Duration::days(7))
            .await
            .unwrap();
        assert_eq!(recent, vec![(fresh.id.clone(), "alice@example.com".to_string())]);
    }
}
