//! # Customer Repository
//!
//! Database operations for customers.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crm_core::filter::{BoundPredicate, SortKey};
use crm_core::Customer;

use crate::error::{DbError, DbResult};
use crate::query::{bind_values, order_clause, where_clause};

/// Repository for customer operations.
#[derive(Debug, Clone)]
pub struct CustomerRepository {
    pool: SqlitePool,
}

impl CustomerRepository {
    pub fn new(pool: SqlitePool) -> Self {
        CustomerRepository { pool }
    }

    /// Inserts a new customer.
    ///
    /// ## Errors
    /// `UniqueViolation` when the email is already taken. The store's
    /// UNIQUE constraint is authoritative even when a service-layer
    /// pre-check raced with a concurrent insert.
    pub async fn insert(&self, customer: &Customer) -> DbResult<()> {
        debug!(id = %customer.id, email = %customer.email, "Inserting customer");

        sqlx::query(
            "INSERT INTO customers (id, name, email, phone, created_at) \
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&customer.id)
        .bind(&customer.name)
        .bind(&customer.email)
        .bind(&customer.phone)
        .bind(customer.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            let err = DbError::from(e);
            if err.is_unique_violation() {
                DbError::duplicate("email", &customer.email)
            } else {
                err
            }
        })?;

        Ok(())
    }

    /// Fetches a customer by id.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Customer> {
        sqlx::query_as::<_, Customer>(
            "SELECT id, name, email, phone, created_at FROM customers WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DbError::not_found("Customer", id))
    }

    /// Whether a customer with this email already exists.
    pub async fn email_exists(&self, email: &str) -> DbResult<bool> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM customers WHERE email = ?")
                .bind(email)
                .fetch_one(&self.pool)
                .await?;
        Ok(count > 0)
    }

    /// Lists customers matching the given predicates, in the given order.
    pub async fn list(
        &self,
        predicates: &[BoundPredicate],
        sort: &[SortKey],
    ) -> DbResult<Vec<Customer>> {
        let (where_sql, binds) = where_clause(predicates);
        let order_sql = order_clause(sort);

        let sql = format!(
            "SELECT id, name, email, phone, created_at FROM customers {where_sql} {order_sql}"
        );

        let customers = bind_values(sqlx::query_as::<_, Customer>(&sql), &binds)
            .fetch_all(&self.pool)
            .await?;

        Ok(customers)
    }

    /// Total number of customers.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM customers")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Deletes customers whose most recent order predates the cutoff.
    ///
    /// Customers with no orders at all are kept. Deletion cascades to the
    /// customer's orders and their product associations.
    pub async fn delete_inactive(&self, cutoff: DateTime<Utc>) -> DbResult<u64> {
        let result = sqlx::query(
            "DELETE FROM customers WHERE id IN (\
                 SELECT customer_id FROM orders \
                 GROUP BY customer_id \
                 HAVING MAX(order_date) < ?\
             )",
        )
        .bind(cutoff)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use crm_core::filter::{Filter, FilterValue, CUSTOMER_FILTERS};
    use uuid::Uuid;

    fn customer(name: &str, email: &str, phone: Option<&str>) -> Customer {
        Customer {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            email: email.to_string(),
            phone: phone.map(str::to_string),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.customers();

        let alice = customer("Alice", "alice@example.com", Some("+12345678901"));
        repo.insert(&alice).await.unwrap();

        let fetched = repo.get_by_id(&alice.id).await.unwrap();
        assert_eq!(fetched.email, "alice@example.com");
        assert_eq!(fetched.phone.as_deref(), Some("+12345678901"));
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected_and_nothing_persisted() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.customers();

        repo.insert(&customer("Alice", "alice@example.com", None))
            .await
            .unwrap();

        let err = repo
            .insert(&customer("Alice Again", "alice@example.com", None))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DbError::UniqueViolation { ref field, ref value }
                if field == "email" && value == "alice@example.com"
        ));

        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_get_by_id_not_found() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let err = db.customers().get_by_id("missing").await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_list_with_name_filter() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.customers();

        repo.insert(&customer("Alice", "alice@example.com", None))
            .await
            .unwrap();
        repo.insert(&customer("Bob", "bob@example.com", None))
            .await
            .unwrap();

        let preds = CUSTOMER_FILTERS
            .bind(&[Filter::new("name", FilterValue::Text("lic".to_string()))])
            .unwrap();
        let matches = repo.list(&preds, &[]).await.unwrap();

        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].name, "Alice");
    }

    #[tokio::test]
    async fn test_new_customer_findable_by_email_filter() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.customers();

        repo.insert(&customer("Alice", "alice@example.com", None))
            .await
            .unwrap();

        let preds = CUSTOMER_FILTERS
            .bind(&[Filter::new(
                "email",
                FilterValue::Text("alice@".to_string()),
            )])
            .unwrap();
        let found = repo.list(&preds, &[]).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Alice");
    }

    #[tokio::test]
    async fn test_email_exists() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.customers();

        repo.insert(&customer("Alice", "alice@example.com", None))
            .await
            .unwrap();

        assert!(repo.email_exists("alice@example.com").await.unwrap());
        assert!(!repo.email_exists("bob@example.com").await.unwrap());
    }
}
