//! # Mutation Service
//!
//! Write commands: each validates its input, talks to the store, and
//! returns a result object or an [`ApiError`].
//!
//! ## Commands
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Mutation Commands                                  │
//! │                                                                         │
//! │  create_customer          one customer, all-or-nothing                  │
//! │  bulk_create_customers    per-entry commits, partial success            │
//! │  create_product           one product, stock defaults to 0              │
//! │  create_order             order + associations in one transaction,      │
//! │                           total snapshotted from current prices         │
//! │  update_low_stock_products  restock pass (also used by the cron job)    │
//! │  clean_inactive_customers   retention pass (also used by the cron job)  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Validation Order
//! Field rules first (pure, from crm-core), then store lookups. The
//! store's own constraints back every pre-check, so a concurrent writer
//! can never sneak a duplicate email or dangling reference past us.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crm_core::validation::{
    validate_customer_name, validate_phone, validate_price_cents, validate_product_ids,
    validate_stock,
};
use crm_core::{Customer, Money, Order, OrderDetail, Product};
use crm_db::Database;

use crate::error::{ApiError, ApiResult};

// =============================================================================
// Inputs
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCustomerInput {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductInput {
    pub name: String,
    /// Price in cents, strictly positive.
    pub price_cents: i64,
    /// Defaults to 0 when omitted.
    pub stock: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderInput {
    pub customer_id: String,
    pub product_ids: Vec<String>,
    /// Defaults to the creation instant when omitted.
    pub order_date: Option<DateTime<Utc>>,
}

// =============================================================================
// Results
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedCustomer {
    pub customer: Customer,
    pub message: String,
}

/// Result of a bulk customer create: both lists can be non-empty at once.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkCreatedCustomers {
    pub customers: Vec<Customer>,
    pub errors: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestockedProducts {
    pub products: Vec<Product>,
    pub message: String,
}

// =============================================================================
// Mutation Service
// =============================================================================

/// Write-side commands over the entity store.
#[derive(Debug, Clone)]
pub struct MutationService {
    db: Database,
}

impl MutationService {
    pub fn new(db: Database) -> Self {
        MutationService { db }
    }

    /// Creates a single customer.
    ///
    /// ## Errors
    /// - `InvalidValue` for an empty name
    /// - `InvalidFormat` for a malformed phone
    /// - `Conflict` when the email is already taken
    pub async fn create_customer(&self, input: CreateCustomerInput) -> ApiResult<CreatedCustomer> {
        debug!(email = %input.email, "create_customer command");

        validate_customer_name(&input.name)?;
        if let Some(phone) = &input.phone {
            validate_phone(phone)?;
        }

        if self.db.customers().email_exists(&input.email).await? {
            return Err(ApiError::conflict("Email already exists"));
        }

        let customer = Customer {
            id: Uuid::new_v4().to_string(),
            name: input.name,
            email: input.email,
            phone: input.phone,
            created_at: Utc::now(),
        };

        // The UNIQUE constraint catches the race a concurrent insert can
        // win between the pre-check above and this write.
        self.db.customers().insert(&customer).await.map_err(|e| {
            if e.is_unique_violation() {
                ApiError::conflict("Email already exists")
            } else {
                ApiError::from(e)
            }
        })?;

        info!(id = %customer.id, email = %customer.email, "Customer created");

        Ok(CreatedCustomer {
            customer,
            message: "Customer created".to_string(),
        })
    }

    /// Creates many customers with partial-success semantics.
    ///
    /// Each entry commits independently: invalid entries land in `errors`
    /// as human-readable strings while valid ones are persisted. The
    /// command as a whole only fails on infrastructure errors.
    pub async fn bulk_create_customers(
        &self,
        inputs: Vec<CreateCustomerInput>,
    ) -> ApiResult<BulkCreatedCustomers> {
        debug!(count = inputs.len(), "bulk_create_customers command");

        let mut customers = Vec::new();
        let mut errors = Vec::new();

        for input in inputs {
            if self.db.customers().email_exists(&input.email).await? {
                errors.push(format!("Email {} already exists", input.email));
                continue;
            }

            if let Some(phone) = &input.phone {
                if validate_phone(phone).is_err() {
                    errors.push(format!("Invalid phone format for {}", input.email));
                    continue;
                }
            }

            if let Err(e) = validate_customer_name(&input.name) {
                errors.push(e.to_string());
                continue;
            }

            let customer = Customer {
                id: Uuid::new_v4().to_string(),
                name: input.name,
                email: input.email,
                phone: input.phone,
                created_at: Utc::now(),
            };

            match self.db.customers().insert(&customer).await {
                Ok(()) => customers.push(customer),
                // Lost a race with a concurrent insert of the same email
                Err(e) if e.is_unique_violation() => {
                    errors.push(format!("Email {} already exists", customer.email));
                }
                Err(e) => return Err(e.into()),
            }
        }

        info!(
            created = customers.len(),
            failed = errors.len(),
            "Bulk customer create complete"
        );

        Ok(BulkCreatedCustomers { customers, errors })
    }

    /// Creates a single product.
    ///
    /// ## Errors
    /// - `InvalidValue` for a non-positive price or negative stock
    pub async fn create_product(&self, input: CreateProductInput) -> ApiResult<Product> {
        debug!(name = %input.name, "create_product command");

        if input.name.trim().is_empty() {
            return Err(ApiError::invalid_value("name is invalid: must not be empty"));
        }
        validate_price_cents(input.price_cents)?;
        let stock = validate_stock(input.stock)?;

        let product = Product {
            id: Uuid::new_v4().to_string(),
            name: input.name,
            price_cents: input.price_cents,
            stock,
            created_at: Utc::now(),
        };

        self.db.products().insert(&product).await?;

        info!(id = %product.id, name = %product.name, "Product created");

        Ok(product)
    }

    /// Creates an order for an existing customer over existing products.
    ///
    /// The order's total is a snapshot of the referenced products' prices
    /// at this instant; later price changes never move it. The order row
    /// and its associations commit atomically.
    ///
    /// ## Errors
    /// - `InvalidValue` for an empty or duplicated product list
    /// - `NotFound` for an unknown customer or product id
    pub async fn create_order(&self, input: CreateOrderInput) -> ApiResult<OrderDetail> {
        debug!(
            customer_id = %input.customer_id,
            products = input.product_ids.len(),
            "create_order command"
        );

        validate_product_ids(&input.product_ids)?;

        let customer = self.db.customers().get_by_id(&input.customer_id).await?;

        let products = self.db.products().get_many(&input.product_ids).await?;
        if products.len() != input.product_ids.len() {
            let found: HashSet<&str> = products.iter().map(|p| p.id.as_str()).collect();
            let missing = input
                .product_ids
                .iter()
                .find(|id| !found.contains(id.as_str()))
                .map(String::as_str)
                .unwrap_or("unknown");
            return Err(ApiError::not_found("Product", missing));
        }

        let total: Money = products.iter().map(Product::price).sum();
        let now = Utc::now();

        let order = Order {
            id: Uuid::new_v4().to_string(),
            customer_id: customer.id.clone(),
            total_cents: total.cents(),
            order_date: input.order_date.unwrap_or(now),
            created_at: now,
        };

        self.db
            .orders()
            .insert_with_products(&order, &input.product_ids)
            .await?;

        info!(
            id = %order.id,
            customer_id = %order.customer_id,
            total = %total,
            "Order created"
        );

        Ok(OrderDetail {
            order,
            customer,
            products,
        })
    }

    /// Tops up every low-stock product by the restock quantity.
    ///
    /// Idempotent once no product is below threshold: the second pass
    /// returns an empty product list with the same message.
    pub async fn update_low_stock_products(&self) -> ApiResult<RestockedProducts> {
        debug!("update_low_stock_products command");

        let products = self.db.products().restock_low_stock().await?;

        info!(count = products.len(), "Low stock restock complete");

        Ok(RestockedProducts {
            products,
            message: "Low stock products updated successfully".to_string(),
        })
    }

    /// Deletes customers whose most recent order predates the cutoff.
    ///
    /// Customers with no orders at all are kept. Returns the number of
    /// customers removed.
    pub async fn clean_inactive_customers(&self, cutoff: DateTime<Utc>) -> ApiResult<u64> {
        debug!(cutoff = %cutoff, "clean_inactive_customers command");

        let deleted = self.db.customers().delete_inactive(cutoff).await?;

        if deleted > 0 {
            warn!(deleted, "Removed inactive customers");
        }

        Ok(deleted)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::query::QueryService;
    use crm_db::DbConfig;

    async fn service() -> (MutationService, QueryService) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        (MutationService::new(db.clone()), QueryService::new(db))
    }

    fn customer_input(name: &str, email: &str, phone: Option<&str>) -> CreateCustomerInput {
        CreateCustomerInput {
            name: name.to_string(),
            email: email.to_string(),
            phone: phone.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_create_customer_success() {
        let (mutations, _) = service().await;

        let created = mutations
            .create_customer(customer_input(
                "Alice",
                "alice@example.com",
                Some("+12345678901"),
            ))
            .await
            .unwrap();

        assert_eq!(created.message, "Customer created");
        assert_eq!(created.customer.email, "alice@example.com");
        assert!(!created.customer.id.is_empty());
    }

    #[tokio::test]
    async fn test_create_customer_duplicate_email_conflict() {
        let (mutations, queries) = service().await;

        mutations
            .create_customer(customer_input("Alice", "alice@example.com", None))
            .await
            .unwrap();

        let err = mutations
            .create_customer(customer_input("Imposter", "alice@example.com", None))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);

        // Nothing persisted for the losing attempt
        let customers = queries.customers(&[], &[]).await.unwrap();
        assert_eq!(customers.len(), 1);
        assert_eq!(customers[0].name, "Alice");
    }

    #[tokio::test]
    async fn test_create_customer_bad_phone_format() {
        let (mutations, _) = service().await;

        let err = mutations
            .create_customer(customer_input("Alice", "alice@example.com", Some("12345")))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidFormat);
    }

    #[tokio::test]
    async fn test_bulk_create_partial_success() {
        let (mutations, queries) = service().await;

        mutations
            .create_customer(customer_input("Existing", "taken@example.com", None))
            .await
            .unwrap();

        let result = mutations
            .bulk_create_customers(vec![
                customer_input("Valid", "valid@example.com", Some("123-456-7890")),
                customer_input("Dup", "taken@example.com", None),
                customer_input("BadPhone", "badphone@example.com", Some("12345")),
            ])
            .await
            .unwrap();

        assert_eq!(result.customers.len(), 1);
        assert_eq!(result.customers[0].email, "valid@example.com");
        assert_eq!(
            result.errors,
            vec![
                "Email taken@example.com already exists".to_string(),
                "Invalid phone format for badphone@example.com".to_string(),
            ]
        );

        // The valid entry committed despite its siblings failing
        let customers = queries.customers(&[], &[]).await.unwrap();
        assert_eq!(customers.len(), 2);
    }

    #[tokio::test]
    async fn test_create_product_rejects_bad_values() {
        let (mutations, _) = service().await;

        let err = mutations
            .create_product(CreateProductInput {
                name: "Freebie".to_string(),
                price_cents: 0,
                stock: None,
            })
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidValue);

        let err = mutations
            .create_product(CreateProductInput {
                name: "Ghost".to_string(),
                price_cents: 100,
                stock: Some(-5),
            })
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidValue);
    }

    #[tokio::test]
    async fn test_create_product_stock_defaults_to_zero() {
        let (mutations, _) = service().await;

        let product = mutations
            .create_product(CreateProductInput {
                name: "Cable".to_string(),
                price_cents: 999,
                stock: None,
            })
            .await
            .unwrap();
        assert_eq!(product.stock, 0);
    }

    #[tokio::test]
    async fn test_create_order_snapshots_total() {
        let (mutations, _) = service().await;

        let customer = mutations
            .create_customer(customer_input("Alice", "alice@example.com", None))
            .await
            .unwrap()
            .customer;
        let a = mutations
            .create_product(CreateProductInput {
                name: "A".to_string(),
                price_cents: 1000,
                stock: Some(5),
            })
            .await
            .unwrap();
        let b = mutations
            .create_product(CreateProductInput {
                name: "B".to_string(),
                price_cents: 500,
                stock: Some(5),
            })
            .await
            .unwrap();

        let detail = mutations
            .create_order(CreateOrderInput {
                customer_id: customer.id.clone(),
                product_ids: vec![a.id.clone(), b.id.clone()],
                order_date: None,
            })
            .await
            .unwrap();

        assert_eq!(detail.order.total_cents, 1500);
        assert_eq!(detail.order.total_amount().to_string(), "$15.00");
        assert_eq!(detail.customer.id, customer.id);
        assert_eq!(detail.products.len(), 2);
    }

    #[tokio::test]
    async fn test_create_order_rejects_empty_product_list() {
        let (mutations, _) = service().await;

        let customer = mutations
            .create_customer(customer_input("Alice", "alice@example.com", None))
            .await
            .unwrap()
            .customer;

        let err = mutations
            .create_order(CreateOrderInput {
                customer_id: customer.id,
                product_ids: vec![],
                order_date: None,
            })
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidValue);
    }

    #[tokio::test]
    async fn test_create_order_unknown_product_persists_nothing() {
        let (mutations, queries) = service().await;

        let customer = mutations
            .create_customer(customer_input("Alice", "alice@example.com", None))
            .await
            .unwrap()
            .customer;

        let err = mutations
            .create_order(CreateOrderInput {
                customer_id: customer.id,
                product_ids: vec!["missing".to_string()],
                order_date: None,
            })
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
        assert!(err.message.contains("missing"));

        assert!(queries.orders(&[], &[]).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_order_unknown_customer() {
        let (mutations, _) = service().await;

        let err = mutations
            .create_order(CreateOrderInput {
                customer_id: "nobody".to_string(),
                product_ids: vec!["p1".to_string()],
                order_date: None,
            })
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_restock_is_idempotent_once_topped_up() {
        let (mutations, _) = service().await;

        for (name, stock) in [("A", 3), ("B", 15), ("C", 8)] {
            mutations
                .create_product(CreateProductInput {
                    name: name.to_string(),
                    price_cents: 100,
                    stock: Some(stock),
                })
                .await
                .unwrap();
        }

        let first = mutations.update_low_stock_products().await.unwrap();
        assert_eq!(first.message, "Low stock products updated successfully");
        let mut stocks: Vec<i64> = first.products.iter().map(|p| p.stock).collect();
        stocks.sort_unstable();
        assert_eq!(stocks, vec![13, 18]);

        let second = mutations.update_low_stock_products().await.unwrap();
        assert!(second.products.is_empty());
        assert_eq!(second.message, "Low stock products updated successfully");
    }

    #[tokio::test]
    async fn test_clean_inactive_customers() {
        let (mutations, queries) = service().await;

        let stale = mutations
            .create_customer(customer_input("Stale", "stale@example.com", None))
            .await
            .unwrap()
            .customer;
        let fresh = mutations
            .create_customer(customer_input("Fresh", "fresh@example.com", None))
            .await
            .unwrap()
            .customer;
        let orderless = mutations
            .create_customer(customer_input("Orderless", "orderless@example.com", None))
            .await
            .unwrap()
            .customer;
        let widget = mutations
            .create_product(CreateProductInput {
                name: "Widget".to_string(),
                price_cents: 100,
                stock: Some(5),
            })
            .await
            .unwrap();

        let now = Utc::now();
        mutations
            .create_order(CreateOrderInput {
                customer_id: stale.id.clone(),
                product_ids: vec![widget.id.clone()],
                order_date: Some(now - chrono::Duration::days(400)),
            })
            .await
            .unwrap();
        mutations
            .create_order(CreateOrderInput {
                customer_id: fresh.id.clone(),
                product_ids: vec![widget.id.clone()],
                order_date: Some(now - chrono::Duration::days(10)),
            })
            .await
            .unwrap();

        let deleted = mutations
            .clean_inactive_customers(now - chrono::Duration::days(365))
            .await
            .unwrap();
        assert_eq!(deleted, 1);

        let remaining = queries.customers(&[], &[]).await.unwrap();
        let emails: Vec<&str> = remaining.iter().map(|c| c.email.as_str()).collect();
        assert!(emails.contains(&fresh.email.as_str()));
        // Customers with no orders are never swept
        assert!(emails.contains(&orderless.email.as_str()));
        assert!(!emails.contains(&stale.email.as_str()));
    }
}
