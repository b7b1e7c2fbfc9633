//! # Query Service
//!
//! Read commands: each binds client filters against the entity's schema,
//! resolves an ordering, and returns fully-shaped results.
//!
//! ## Filter Contract
//! - Omitted filters impose no constraint; supplied ones are ANDed
//! - Unknown filter or sort fields are rejected, never silently ignored
//! - Ordering is total: an `id` tie-break makes repeated queries stable

use serde::{Deserialize, Serialize};
use tracing::debug;

use crm_core::filter::{Filter, CUSTOMER_FILTERS, ORDER_FILTERS, PRODUCT_FILTERS};
use crm_core::{Customer, OrderDetail, Product};
use crm_db::Database;

use crate::error::ApiResult;

/// Aggregate counters for the reporting job.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CrmReport {
    pub total_customers: i64,
    pub total_orders: i64,
    /// Sum of order snapshot totals, in cents.
    pub total_revenue_cents: i64,
}

/// Read-side commands over the entity store.
#[derive(Debug, Clone)]
pub struct QueryService {
    db: Database,
}

impl QueryService {
    pub fn new(db: Database) -> Self {
        QueryService { db }
    }

    /// Liveness probe; answers without touching the store.
    pub fn hello(&self) -> &'static str {
        "Hello, CRM!"
    }

    /// Lists customers matching the given filters, in the given order.
    pub async fn customers(
        &self,
        filters: &[Filter],
        order_by: &[String],
    ) -> ApiResult<Vec<Customer>> {
        debug!(filters = filters.len(), "customers query");

        let predicates = CUSTOMER_FILTERS.bind(filters)?;
        let sort = CUSTOMER_FILTERS.parse_order_by(order_by)?;

        Ok(self.db.customers().list(&predicates, &sort).await?)
    }

    /// Lists products matching the given filters, in the given order.
    pub async fn products(
        &self,
        filters: &[Filter],
        order_by: &[String],
    ) -> ApiResult<Vec<Product>> {
        debug!(filters = filters.len(), "products query");

        let predicates = PRODUCT_FILTERS.bind(filters)?;
        let sort = PRODUCT_FILTERS.parse_order_by(order_by)?;

        Ok(self.db.products().list(&predicates, &sort).await?)
    }

    /// Lists orders matching the given filters, with customer and products
    /// resolved on every result.
    pub async fn orders(
        &self,
        filters: &[Filter],
        order_by: &[String],
    ) -> ApiResult<Vec<OrderDetail>> {
        debug!(filters = filters.len(), "orders query");

        let predicates = ORDER_FILTERS.bind(filters)?;
        let sort = ORDER_FILTERS.parse_order_by(order_by)?;

        let orders = self.db.orders().list(&predicates, &sort).await?;

        let mut details = Vec::with_capacity(orders.len());
        for order in orders {
            let customer = self.db.customers().get_by_id(&order.customer_id).await?;
            let products = self.db.orders().products_for_order(&order.id).await?;
            details.push(OrderDetail {
                order,
                customer,
                products,
            });
        }

        Ok(details)
    }

    /// Orders placed on or after the cutoff, as (order id, customer email)
    /// pairs. Feeds the reminder job; ordered by order date, then id.
    pub async fn recent_orders(
        &self,
        cutoff: chrono::DateTime<chrono::Utc>,
    ) -> ApiResult<Vec<(String, String)>> {
        Ok(self.db.orders().recent_with_customer_email(cutoff).await?)
    }

    /// Whether the store answers queries.
    pub async fn is_alive(&self) -> bool {
        self.db.health_check().await
    }

    /// Aggregate counters: customer count, order count, total revenue.
    ///
    /// Revenue is the sum of snapshot totals, so price changes after an
    /// order was placed never move historical revenue.
    pub async fn report(&self) -> ApiResult<CrmReport> {
        Ok(CrmReport {
            total_customers: self.db.customers().count().await?,
            total_orders: self.db.orders().count().await?,
            total_revenue_cents: self.db.orders().total_revenue_cents().await?,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
