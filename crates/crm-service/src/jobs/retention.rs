//! # Retention Job
//!
//! Sweeps customers whose last order is more than a year old.

use std::io::Write;

use chrono::{Duration, Utc};
use tracing::info;

use crate::error::ApiResult;
use crate::jobs::sink_error;
use crate::mutation::MutationService;

/// Days of order silence after which a customer is considered inactive.
pub const INACTIVITY_DAYS: i64 = 365;

/// Deletes customers whose most recent order predates the inactivity
/// window, then logs `<YYYY-MM-DD HH:MM:SS>: Deleted <n> customers`.
///
/// Customers with no orders at all are kept; the sweep only targets
/// customers who once ordered and went quiet.
pub async fn clean_inactive_customers(
    mutations: &MutationService,
    sink: &mut impl Write,
) -> ApiResult<u64> {
    let now = Utc::now();
    let cutoff = now - Duration::days(INACTIVITY_DAYS);

    let deleted = mutations.clean_inactive_customers(cutoff).await?;

    writeln!(
        sink,
        "{}: Deleted {} customers",
        now.format("%Y-%m-%d %H:%M:%S"),
        deleted
    )
    .map_err(sink_error)?;

    info!(deleted, "Retention job complete");
    Ok(deleted)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mutation::{CreateCustomerInput, CreateOrderInput, CreateProductInput};
    use crm_db::{Database, DbConfig};

    #[tokio::test]
    async fn test_retention_sweeps_only_stale_customers() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let mutations = MutationService::new(db);

        let stale = mutations
            .create_customer(CreateCustomerInput {
                name: "Stale".to_string(),
                email: "stale@example.com".to_string(),
                phone: None,
            })
            .await
            .unwrap()
            .customer;
        mutations
            .create_customer(CreateCustomerInput {
                name: "Orderless".to_string(),
                email: "orderless@example.com".to_string(),
                phone: None,
            })
            .await
            .unwrap();
        let widget = mutations
            .create_product(CreateProductInput {
                name: "Widget".to_string(),
                price_cents: 100,
                stock: Some(5),
            })
            .await
            .unwrap();

        mutations
            .create_order(CreateOrderInput {
                customer_id: stale.id,
                product_ids: vec![widget.id],
                order_date: Some(Utc::now() - Duration::days(INACTIVITY_DAYS + 30)),
            })
            .await
            .unwrap();

        let mut sink = Vec::new();
        let deleted = clean_inactive_customers(&mutations, &mut sink).await.unwrap();

        assert_eq!(deleted, 1);
        let log = String::from_utf8(sink).unwrap();
        assert!(log.trim_end().ends_with("Deleted 1 customers"));
    }

    #[tokio::test]
    async fn test_retention_logs_zero_on_quiet_store() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let mutations = MutationService::new(db);

        let mut sink = Vec::new();
        let deleted = clean_inactive_customers(&mutations, &mut sink).await.unwrap();

        assert_eq!(deleted, 0);
        let log = String::from_utf8(sink).unwrap();
        assert!(log.contains("Deleted 0 customers"));
    }
}
